//! Expands `#[derive(DynamormModel)]` into an `impl Model` (a `'static`
//! `ModelSpec` the registry validates once) and an `impl Marshal` (per-field
//! encode/decode, generated directly rather than dispatched at runtime).

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident};

use crate::attrs::{self, FieldTags, IndexKind as AttrIndexKind};
use crate::kind::{self, FieldKind};

struct Field<'a> {
    ident: &'a Ident,
    name: String,
    ty: &'a syn::Type,
    tags: FieldTags,
    kind: FieldKind,
}

pub fn derive(input: DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input, "DynamormModel can only be derived for structs"));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(&input, "DynamormModel requires named fields"));
    };

    let container_tags = attrs::parse_container_tags(&input.attrs)?;

    let mut fields = Vec::new();
    for field in &named.named {
        let ident = field.ident.as_ref().expect("named field");
        let tags = attrs::parse_field_tags(&field.attrs)?;
        if tags.skip {
            continue;
        }
        let kind = kind::classify(&field.ty, tags.is_set).map_err(|msg| syn::Error::new_spanned(field, msg))?;
        fields.push(Field {
            ident,
            name: ident.to_string(),
            ty: &field.ty,
            tags,
            kind,
        });
    }

    let spec_ident = format_ident!("__DYNAMORM_SPEC_{}", struct_name);

    let field_specs = fields.iter().map(field_spec_tokens);
    let fields_len = fields.len();

    // A `naming = "..."` tag on any field sets the whole record's convention
    // just as the container-level tag does; the container tag wins if both
    // are present.
    let resolved_naming = container_tags
        .naming_override
        .clone()
        .or_else(|| fields.iter().find_map(|f| f.tags.naming_override.clone()));

    let naming_override = match resolved_naming.as_deref() {
        Some("camel_case") => quote! { Some(::dynamorm::naming::NamingConvention::CamelCase) },
        Some("snake_case") => quote! { Some(::dynamorm::naming::NamingConvention::SnakeCase) },
        _ => quote! { None },
    };
    let table_name_override = match &container_tags.table_name {
        Some(name) => quote! { Some(#name) },
        None => quote! { None },
    };
    let strict = container_tags.strict;
    let struct_name_str = struct_name.to_string();

    let convention = match resolved_naming.as_deref() {
        Some("snake_case") => Convention::SnakeCase,
        _ => Convention::CamelCase,
    };

    let to_item_arms = fields.iter().map(|f| to_item_tokens(f, convention));
    let from_item_fields = fields.iter().map(|f| from_item_tokens(f, convention));
    let field_idents: Vec<&Ident> = fields.iter().map(|f| f.ident).collect();

    Ok(quote! {
        #[doc(hidden)]
        static #spec_ident: ::dynamorm::registry::ModelSpec = ::dynamorm::registry::ModelSpec {
            type_name: #struct_name_str,
            table_name_override: #table_name_override,
            naming_override: #naming_override,
            strict: #strict,
            fields: &[ #(#field_specs),* ],
        };

        #[allow(clippy::all)]
        const _: [(); #fields_len] = [(); #fields_len];

        impl ::dynamorm::registry::Model for #struct_name {
            fn spec() -> &'static ::dynamorm::registry::ModelSpec {
                &#spec_ident
            }
        }

        impl ::dynamorm::marshal::Marshal for #struct_name {
            fn to_item(&self) -> ::dynamorm::marshal::Item {
                let mut item = ::std::collections::HashMap::new();
                #(#to_item_arms)*
                item
            }

            fn from_item(item: &::dynamorm::marshal::Item) -> ::std::result::Result<Self, ::dynamorm::error::Error> {
                #(#from_item_fields)*
                Ok(#struct_name { #(#field_idents),* })
            }
        }
    })
}

fn field_kind_tokens(kind: FieldKind) -> TokenStream {
    kind.to_tokens()
}

fn index_clauses_tokens(field: &Field) -> TokenStream {
    let clauses = field.tags.index_clauses.iter().map(|clause| {
        let name = &clause.name;
        let kind = match clause.kind {
            AttrIndexKind::Gsi => quote! { ::dynamorm::registry::IndexKind::Gsi },
            AttrIndexKind::Lsi => quote! { ::dynamorm::registry::IndexKind::Lsi },
        };
        let is_pk = clause.is_pk;
        let is_sk = clause.is_sk;
        let sparse = clause.sparse;
        quote! {
            ::dynamorm::registry::FieldIndexClause {
                index_name: #name,
                kind: #kind,
                is_pk: #is_pk,
                is_sk: #is_sk,
                sparse: #sparse,
            }
        }
    });
    quote! { &[ #(#clauses),* ] }
}

fn field_spec_tokens(field: &Field) -> TokenStream {
    let name = &field.name;
    let kind = field_kind_tokens(field.kind);
    let attr_override = match &field.tags.attr_override {
        Some(v) => quote! { Some(#v) },
        None => quote! { None },
    };
    let is_pk = field.tags.is_pk;
    let is_sk = field.tags.is_sk;
    let is_version = field.tags.is_version;
    let is_ttl = field.tags.is_ttl;
    let is_created_at = field.tags.is_created_at;
    let is_updated_at = field.tags.is_updated_at;
    let is_set = field.tags.is_set;
    let omit_empty = field.tags.omit_empty;
    let is_encrypted = field.tags.is_encrypted;
    let is_flatten = field.tags.is_flatten;
    let index_clauses = index_clauses_tokens(field);

    quote! {
        ::dynamorm::registry::FieldSpec {
            name: #name,
            attribute_name_override: #attr_override,
            kind: #kind,
            is_pk: #is_pk,
            is_sk: #is_sk,
            is_version: #is_version,
            is_ttl: #is_ttl,
            is_created_at: #is_created_at,
            is_updated_at: #is_updated_at,
            is_set: #is_set,
            omit_empty: #omit_empty,
            is_encrypted: #is_encrypted,
            is_flatten: #is_flatten,
            index_clauses: #index_clauses,
        }
    }
}

/// The record-wide naming convention, resolved from the container's
/// `naming = "..."` tag at macro-expansion time. Mirrors
/// `dynamorm::naming::NamingConvention`, duplicated here so this crate
/// doesn't need to depend back on the runtime crate's enum to pick a
/// branch during codegen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Convention {
    CamelCase,
    SnakeCase,
}

/// Attribute name used in the generated `to_item`/`from_item` bodies.
/// Mirrors `crate::naming::to_attribute_name` under the record's resolved
/// `convention` so hand-written code and macro-generated code agree
/// without needing to call back into the runtime crate at expansion time.
fn attribute_name_literal(field: &Field, convention: Convention) -> String {
    if let Some(attr) = &field.tags.attr_override {
        return attr.clone();
    }
    // PK/SK keep their literal casing under camelCase and are lowercased
    // under snake_case, matching `naming::to_attribute_name`'s reserved-name
    // handling.
    if field.name == "PK" || field.name == "SK" {
        return match convention {
            Convention::CamelCase => field.name.clone(),
            Convention::SnakeCase => field.name.to_lowercase(),
        };
    }
    match convention {
        Convention::CamelCase => to_camel_case(&field.name),
        Convention::SnakeCase => field.name.clone(),
    }
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize_next = false;
    for ch in name.chars() {
        if ch == '_' {
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn to_item_tokens(field: &Field, convention: Convention) -> TokenStream {
    let ident = field.ident;
    let attribute_name = attribute_name_literal(field, convention);
    let field_name_str = &field.name;
    let is_optional = matches!(field.ty, syn::Type::Path(p) if p.path.segments.last().map(|s| s.ident == "Option").unwrap_or(false));

    // A `flatten`-tagged field merges its own nested record's attributes
    // directly into the parent item instead of nesting them under its own
    // key, realized here by delegating to the nested type's own `Marshal`
    // impl rather than by walking its field list at macro-expansion time.
    if field.tags.is_flatten {
        return if is_optional {
            quote! {
                if let Some(inner) = &self.#ident {
                    item.extend(::dynamorm::marshal::Marshal::to_item(inner));
                }
            }
        } else {
            quote! {
                item.extend(::dynamorm::marshal::Marshal::to_item(&self.#ident));
            }
        };
    }

    let encode_expr = |value_expr: TokenStream| -> TokenStream {
        if field.tags.is_json {
            quote! { ::dynamorm::marshal::encode_json(#value_expr, #field_name_str).expect("json field encoding") }
        } else {
            match field.kind {
                FieldKind::String => quote! { ::dynamorm::marshal::encode_string(#value_expr) },
                FieldKind::Integer => quote! { ::dynamorm::marshal::encode_integer((*#value_expr) as i64) },
                FieldKind::Float => quote! { ::dynamorm::marshal::encode_float((*#value_expr) as f64) },
                FieldKind::Bool => quote! { ::dynamorm::marshal::encode_bool(*#value_expr) },
                FieldKind::Binary => quote! { ::dynamorm::marshal::encode_binary(#value_expr) },
                // A `ttl`-tagged timestamp field is projected to Unix seconds
                // (`N`) instead of the RFC 3339 `S` every other timestamp
                // field uses -- DynamoDB's TTL attribute only accepts the
                // former.
                FieldKind::Timestamp if field.tags.is_ttl => {
                    quote! { ::dynamorm::marshal::encode_ttl_timestamp(#value_expr) }
                }
                FieldKind::Timestamp => quote! { ::dynamorm::marshal::encode_timestamp(#value_expr) },
                // `set`-tagged fields may be a `Vec`, `HashSet`, or `BTreeSet`;
                // collecting through `.iter().cloned()` first, rather than
                // relying on the field's own type to coerce to a slice,
                // covers all three uniformly.
                FieldKind::StringSet => quote! {
                    ::dynamorm::marshal::encode_string_set(
                        &#value_expr.iter().cloned().collect::<::std::vec::Vec<_>>()
                    )
                },
                FieldKind::NumberSet => quote! {
                    ::dynamorm::marshal::encode_number_set(
                        &#value_expr.iter().map(|v| v.to_string()).collect::<::std::vec::Vec<_>>()
                    )
                },
                FieldKind::BinarySet => quote! {
                    ::dynamorm::marshal::encode_binary_set(
                        &#value_expr.iter().cloned().collect::<::std::vec::Vec<_>>()
                    )
                },
                FieldKind::Map | FieldKind::List | FieldKind::Nested => {
                    quote! { ::dynamorm::marshal::encode_generic(#value_expr, #field_name_str).expect("field encoding") }
                }
            }
        }
    };

    if is_optional {
        let encoded = encode_expr(quote! { inner });
        if field.tags.omit_empty {
            quote! {
                if let Some(inner) = &self.#ident {
                    item.insert(#attribute_name.to_string(), #encoded);
                }
            }
        } else {
            quote! {
                match &self.#ident {
                    Some(inner) => { item.insert(#attribute_name.to_string(), #encoded); }
                    None => { item.insert(#attribute_name.to_string(), ::dynamorm::marshal::AttributeValue::Null(true)); }
                }
            }
        }
    } else {
        let encoded = encode_expr(quote! { (&self.#ident) });
        quote! {
            item.insert(#attribute_name.to_string(), #encoded);
        }
    }
}

fn from_item_tokens(field: &Field, convention: Convention) -> TokenStream {
    let ident = field.ident;
    let ty = field.ty;
    let attribute_name = attribute_name_literal(field, convention);
    let field_name_str = &field.name;
    let is_optional = matches!(field.ty, syn::Type::Path(p) if p.path.segments.last().map(|s| s.ident == "Option").unwrap_or(false));

    if field.tags.is_flatten {
        return if is_optional {
            // No dedicated key marks presence; a nested record whose own
            // required fields aren't in the shared map is treated as absent
            // rather than a hard decode error.
            quote! {
                let #ident: #ty = ::dynamorm::marshal::Marshal::from_item(item).ok();
            }
        } else {
            quote! {
                let #ident: #ty = ::dynamorm::marshal::Marshal::from_item(item)?;
            }
        };
    }

    let decode_expr = |value_expr: TokenStream| -> TokenStream {
        if field.tags.is_json {
            quote! { ::dynamorm::marshal::decode_json(#value_expr, #field_name_str)? }
        } else {
            match field.kind {
                FieldKind::String => quote! { ::dynamorm::marshal::decode_string(#value_expr, #field_name_str)? },
                FieldKind::Integer => quote! { ::dynamorm::marshal::decode_integer(#value_expr, #field_name_str)?.try_into().map_err(|_| ::dynamorm::error::Error::UnsupportedType(format!("field `{}` integer out of range", #field_name_str)))? },
                FieldKind::Float => quote! { ::dynamorm::marshal::decode_float(#value_expr, #field_name_str)? as _ },
                FieldKind::Bool => quote! { ::dynamorm::marshal::decode_bool(#value_expr, #field_name_str)? },
                FieldKind::Binary => quote! { ::dynamorm::marshal::decode_binary(#value_expr, #field_name_str)? },
                FieldKind::Timestamp if field.tags.is_ttl => {
                    quote! { ::dynamorm::marshal::decode_ttl_timestamp(#value_expr, #field_name_str)? }
                }
                FieldKind::Timestamp => quote! { ::dynamorm::marshal::decode_timestamp(#value_expr, #field_name_str)? },
                // `.into_iter().collect()` rather than returning the `Vec`
                // the codec hands back directly, so this also typechecks
                // when the field itself is a `HashSet`/`BTreeSet`.
                FieldKind::StringSet => quote! {
                    ::dynamorm::marshal::decode_string_set(#value_expr, #field_name_str)?.into_iter().collect()
                },
                FieldKind::NumberSet => quote! {
                    ::dynamorm::marshal::decode_number_set(#value_expr, #field_name_str)?
                        .iter()
                        .map(|s| s.parse().map_err(|_| ::dynamorm::error::Error::UnsupportedType(format!("field `{}` has a non-numeric set member", #field_name_str))))
                        .collect::<::std::result::Result<_, _>>()?
                },
                FieldKind::BinarySet => quote! {
                    ::dynamorm::marshal::decode_binary_set(#value_expr, #field_name_str)?.into_iter().collect()
                },
                FieldKind::Map | FieldKind::List | FieldKind::Nested => {
                    quote! { ::dynamorm::marshal::decode_generic(#value_expr, #field_name_str)? }
                }
            }
        }
    };

    if is_optional {
        let decoded = decode_expr(quote! { found });
        quote! {
            let #ident: #ty = match item.get(#attribute_name) {
                Some(found) if !matches!(found, ::dynamorm::marshal::AttributeValue::Null(true)) => {
                    Some(#decoded)
                }
                _ => None,
            };
        }
    } else {
        let decoded = decode_expr(quote! { found });
        quote! {
            let #ident: #ty = {
                let found = item.get(#attribute_name).ok_or_else(|| {
                    ::dynamorm::error::Error::UnsupportedType(format!("missing required field `{}`", #field_name_str))
                })?;
                #decoded
            };
        }
    }
}

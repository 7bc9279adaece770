//! Classifies a field's Rust type into the wire-shape categories the
//! marshaler needs. This is the compile-time substitute for the
//! `reflectType` inspection a reflection-based mapper would perform at
//! runtime.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    String,
    Integer,
    Float,
    Bool,
    Binary,
    Timestamp,
    Map,
    List,
    StringSet,
    NumberSet,
    BinarySet,
    Nested,
}

impl FieldKind {
    pub(crate) fn to_tokens(self) -> TokenStream {
        match self {
            FieldKind::String => quote! { ::dynamorm::registry::FieldKind::String },
            FieldKind::Integer => quote! { ::dynamorm::registry::FieldKind::Integer },
            FieldKind::Float => quote! { ::dynamorm::registry::FieldKind::Float },
            FieldKind::Bool => quote! { ::dynamorm::registry::FieldKind::Bool },
            FieldKind::Binary => quote! { ::dynamorm::registry::FieldKind::Binary },
            FieldKind::Timestamp => quote! { ::dynamorm::registry::FieldKind::Timestamp },
            FieldKind::Map => quote! { ::dynamorm::registry::FieldKind::Map },
            FieldKind::List => quote! { ::dynamorm::registry::FieldKind::List },
            FieldKind::StringSet => quote! { ::dynamorm::registry::FieldKind::StringSet },
            FieldKind::NumberSet => quote! { ::dynamorm::registry::FieldKind::NumberSet },
            FieldKind::BinarySet => quote! { ::dynamorm::registry::FieldKind::BinarySet },
            FieldKind::Nested => quote! { ::dynamorm::registry::FieldKind::Nested },
        }
    }

    pub(crate) fn is_integer(self) -> bool {
        matches!(self, FieldKind::Integer)
    }

    pub(crate) fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }
}

/// Strips one layer of `Option<...>` if present, returning the inner type
/// and whether it was optional.
pub(crate) fn strip_option(ty: &Type) -> (&Type, bool) {
    if let Type::Path(p) = ty {
        if let Some(seg) = p.path.segments.last() {
            if seg.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &seg.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return (inner, true);
                    }
                }
            }
        }
    }
    (ty, false)
}

fn last_segment_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(p) => p.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

fn first_generic_arg(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(p) => {
            let seg = p.path.segments.last()?;
            if let PathArguments::AngleBracketed(args) = &seg.arguments {
                args.args.iter().find_map(|a| match a {
                    GenericArgument::Type(t) => Some(t),
                    _ => None,
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

const INTEGER_IDENTS: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

/// Classify a (possibly `Option`-wrapped) Rust type into a [`FieldKind`],
/// given whether the field was tagged `set` (sequence maps to a DynamoDB
/// `SS`/`NS`/`BS` rather than a plain `L`).
pub(crate) fn classify(ty: &Type, is_set: bool) -> Result<FieldKind, String> {
    let (ty, _) = strip_option(ty);

    if ty == &syn::parse_quote!(Vec<u8>) {
        return Ok(FieldKind::Binary);
    }

    let Some(ident) = last_segment_ident(ty) else {
        return Ok(FieldKind::Nested);
    };

    match ident.as_str() {
        "String" | "str" => Ok(FieldKind::String),
        i if INTEGER_IDENTS.contains(&i) => Ok(FieldKind::Integer),
        "f32" | "f64" => Ok(FieldKind::Float),
        "bool" => Ok(FieldKind::Bool),
        "DateTime" | "SystemTime" => Ok(FieldKind::Timestamp),
        "HashMap" | "BTreeMap" => Ok(FieldKind::Map),
        "Vec" | "VecDeque" => {
            if is_set {
                let inner = first_generic_arg(ty)
                    .ok_or_else(|| "`set` fields must be a sequence of a concrete type".to_string())?;
                let (inner, _) = strip_option(inner);
                if inner == &syn::parse_quote!(Vec<u8>) {
                    return Ok(FieldKind::BinarySet);
                }
                match last_segment_ident(inner).as_deref() {
                    Some("String") => Ok(FieldKind::StringSet),
                    Some(i) if INTEGER_IDENTS.contains(&i) => Ok(FieldKind::NumberSet),
                    Some("f32") | Some("f64") => Ok(FieldKind::NumberSet),
                    _ => Err("`set` fields must contain String, an integer/float, or Vec<u8>".to_string()),
                }
            } else {
                Ok(FieldKind::List)
            }
        }
        "HashSet" | "BTreeSet" => {
            let inner = first_generic_arg(ty)
                .ok_or_else(|| "set fields must be generic over a concrete type".to_string())?;
            match last_segment_ident(inner).as_deref() {
                Some("String") => Ok(FieldKind::StringSet),
                Some(i) if INTEGER_IDENTS.contains(&i) => Ok(FieldKind::NumberSet),
                Some("f32") | Some("f64") => Ok(FieldKind::NumberSet),
                _ => Err("set fields must contain String, an integer/float, or Vec<u8>".to_string()),
            }
        }
        _ => Ok(FieldKind::Nested),
    }
}

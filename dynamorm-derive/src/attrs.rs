//! Parses the `dynamorm` tag grammar out of `#[dynamorm(...)]` container
//! and field attributes.
//!
//! The grammar is comma-separated tokens, mirroring a struct-tag string:
//! bare modifiers (`pk`, `sk`, `version`, ...) and `key = "value"` pairs
//! (`attr = "customName"`, `index = "by-email"`, ...). A token following
//! `index`/`lsi` greedily consumes the bare modifiers `pk`/`sk`/`sparse`
//! that follow it until a non-modifier token appears.

use syn::{punctuated::Punctuated, Attribute, Meta, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexKind {
    Gsi,
    Lsi,
}

#[derive(Debug, Clone)]
pub(crate) struct IndexClause {
    pub name: String,
    pub kind: IndexKind,
    pub is_pk: bool,
    pub is_sk: bool,
    pub sparse: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FieldTags {
    pub is_pk: bool,
    pub is_sk: bool,
    pub is_version: bool,
    pub is_ttl: bool,
    pub is_created_at: bool,
    pub is_updated_at: bool,
    pub is_set: bool,
    pub omit_empty: bool,
    pub is_binary: bool,
    pub is_json: bool,
    pub is_encrypted: bool,
    pub is_flatten: bool,
    pub skip: bool,
    pub attr_override: Option<String>,
    pub naming_override: Option<String>,
    pub index_clauses: Vec<IndexClause>,
    pub project_into: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct ContainerTags {
    pub table_name: Option<String>,
    pub naming_override: Option<String>,
    pub strict: bool,
}

/// A single flattened token: `pk` becomes `("pk", None)`, `attr = "x"`
/// becomes `("attr", Some("x"))`.
struct RawToken {
    key: String,
    value: Option<String>,
    span: proc_macro2::Span,
}

fn flatten(attrs: &[Attribute]) -> syn::Result<Vec<RawToken>> {
    let mut tokens = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("dynamorm") {
            continue;
        }

        // `#[dynamorm]` with no parens is a no-op; only `#[dynamorm(-)]`-style
        // (no args at all) shouldn't happen in practice but tolerate it.
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }

        let nested = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;

        for meta in nested {
            match meta {
                Meta::Path(path) => {
                    let ident = path
                        .get_ident()
                        .ok_or_else(|| syn::Error::new_spanned(&path, "expected a bare ident"))?;
                    tokens.push(RawToken {
                        key: ident.to_string(),
                        value: None,
                        span: ident.span(),
                    });
                }
                Meta::NameValue(nv) => {
                    let ident = nv.path.get_ident().ok_or_else(|| {
                        syn::Error::new_spanned(&nv.path, "expected a bare ident")
                    })?;
                    let value = match &nv.value {
                        syn::Expr::Lit(syn::ExprLit {
                            lit: syn::Lit::Str(s),
                            ..
                        }) => s.value(),
                        other => {
                            return Err(syn::Error::new_spanned(
                                other,
                                "expected a string literal, e.g. `attr = \"name\"`",
                            ))
                        }
                    };
                    tokens.push(RawToken {
                        key: ident.to_string(),
                        value: Some(value),
                        span: ident.span(),
                    });
                }
                Meta::List(list) => {
                    return Err(syn::Error::new_spanned(
                        list,
                        "dynamorm does not support nested attribute lists here",
                    ));
                }
            }
        }
    }

    Ok(tokens)
}

const CLAUSE_MODIFIERS: &[&str] = &["pk", "sk", "sparse"];

pub(crate) fn parse_field_tags(attrs: &[Attribute]) -> syn::Result<FieldTags> {
    let tokens = flatten(attrs)?;
    let mut tags = FieldTags::default();

    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];

        match tok.key.as_str() {
            "-" => {
                tags.skip = true;
                i += 1;
            }
            "pk" => {
                tags.is_pk = true;
                i += 1;
            }
            "sk" => {
                tags.is_sk = true;
                i += 1;
            }
            "version" => {
                tags.is_version = true;
                i += 1;
            }
            "ttl" => {
                tags.is_ttl = true;
                i += 1;
            }
            "created_at" => {
                tags.is_created_at = true;
                i += 1;
            }
            "updated_at" => {
                tags.is_updated_at = true;
                i += 1;
            }
            "set" => {
                tags.is_set = true;
                i += 1;
            }
            "omitempty" => {
                tags.omit_empty = true;
                i += 1;
            }
            "binary" => {
                tags.is_binary = true;
                i += 1;
            }
            "json" => {
                tags.is_json = true;
                i += 1;
            }
            "encrypted" => {
                tags.is_encrypted = true;
                i += 1;
            }
            "flatten" => {
                tags.is_flatten = true;
                i += 1;
            }
            "attr" => {
                tags.attr_override = Some(tok.value.clone().ok_or_else(|| {
                    syn::Error::new(tok.span, "`attr` requires a value, e.g. `attr = \"name\"`")
                })?);
                i += 1;
            }
            "naming" => {
                let v = tok.value.clone().ok_or_else(|| {
                    syn::Error::new(tok.span, "`naming` requires a value")
                })?;
                validate_naming(&v, tok.span)?;
                tags.naming_override = Some(v);
                i += 1;
            }
            "project" => {
                let v = tok.value.clone().ok_or_else(|| {
                    syn::Error::new(tok.span, "`project` requires a value")
                })?;
                tags.project_into = v.split(',').map(|s| s.trim().to_string()).collect();
                i += 1;
            }
            "index" | "lsi" => {
                let kind = if tok.key == "index" {
                    IndexKind::Gsi
                } else {
                    IndexKind::Lsi
                };
                let name = tok.value.clone().ok_or_else(|| {
                    syn::Error::new(
                        tok.span,
                        format!("`{}` requires a name, e.g. `{}= \"by-email\"`", tok.key, tok.key),
                    )
                })?;
                i += 1;

                let mut clause = IndexClause {
                    name,
                    kind,
                    is_pk: false,
                    is_sk: false,
                    sparse: false,
                };

                while i < tokens.len()
                    && tokens[i].value.is_none()
                    && CLAUSE_MODIFIERS.contains(&tokens[i].key.as_str())
                {
                    match tokens[i].key.as_str() {
                        "pk" => clause.is_pk = true,
                        "sk" => clause.is_sk = true,
                        "sparse" => clause.sparse = true,
                        _ => unreachable!(),
                    }
                    i += 1;
                }

                if kind == IndexKind::Lsi && clause.is_pk {
                    return Err(syn::Error::new(
                        tok.span,
                        "an `lsi` clause cannot declare a partition key: LSIs share the base table's partition key",
                    ));
                }

                tags.index_clauses.push(clause);
            }
            other => {
                return Err(syn::Error::new(
                    tok.span,
                    format!("unrecognized dynamorm token `{other}`"),
                ))
            }
        }
    }

    Ok(tags)
}

pub(crate) fn parse_container_tags(attrs: &[Attribute]) -> syn::Result<ContainerTags> {
    let tokens = flatten(attrs)?;
    let mut tags = ContainerTags::default();

    for tok in tokens {
        match tok.key.as_str() {
            "table" => {
                tags.table_name = Some(tok.value.ok_or_else(|| {
                    syn::Error::new(tok.span, "`table` requires a value")
                })?);
            }
            "naming" => {
                let v = tok
                    .value
                    .ok_or_else(|| syn::Error::new(tok.span, "`naming` requires a value"))?;
                validate_naming(&v, tok.span)?;
                tags.naming_override = Some(v);
            }
            "strict" => {
                tags.strict = true;
            }
            other => {
                return Err(syn::Error::new(
                    tok.span,
                    format!("unrecognized container-level dynamorm token `{other}`"),
                ))
            }
        }
    }

    Ok(tags)
}

fn validate_naming(value: &str, span: proc_macro2::Span) -> syn::Result<()> {
    if matches!(value, "camel_case" | "snake_case") {
        Ok(())
    } else {
        Err(syn::Error::new(
            span,
            format!("unknown naming convention `{value}`, expected `camel_case` or `snake_case`"),
        ))
    }
}

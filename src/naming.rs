//! Converts record field names to DynamoDB attribute names (C1).
//!
//! A [`Metadata`](crate::registry::Metadata) picks one [`NamingConvention`]
//! for the whole record; individual fields can still escape it with an
//! explicit `attr = "..."` override, handled by the registry rather than
//! here.

use std::fmt;

/// The casing convention used to turn a Rust field name into a DynamoDB
/// attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingConvention {
    /// `created_at` -> `createdAt`.
    CamelCase,
    /// `created_at` -> `created_at`.
    SnakeCase,
}

impl Default for NamingConvention {
    fn default() -> Self {
        NamingConvention::CamelCase
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingConvention::CamelCase => f.write_str("camelCase"),
            NamingConvention::SnakeCase => f.write_str("snake_case"),
        }
    }
}

/// `PK`/`SK` are a reserved pair of field names that get special handling:
/// verbatim under camelCase, normalized under snake_case.
const RESERVED_KEY_NAMES: &[&str] = &["PK", "SK"];

/// Apply `convention` to a Rust field name (always written in `snake_case`
/// by Rust idiom) to produce the wire attribute name.
pub fn to_attribute_name(field_name: &str, convention: NamingConvention) -> String {
    if RESERVED_KEY_NAMES.contains(&field_name) {
        return match convention {
            NamingConvention::CamelCase => field_name.to_string(),
            NamingConvention::SnakeCase => field_name.to_lowercase(),
        };
    }

    match convention {
        NamingConvention::CamelCase => to_camel_case(field_name),
        NamingConvention::SnakeCase => field_name.to_string(),
    }
}

fn to_camel_case(field_name: &str) -> String {
    let mut out = String::with_capacity(field_name.len());
    let mut capitalize_next = false;

    for ch in field_name.chars() {
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

/// Validate that `attribute_name` actually conforms to `convention`. Used
/// by the registry to reject attribute names that were neither generated
/// by [`to_attribute_name`] nor explicitly overridden with `attr:`.
pub fn validate_attribute_name(attribute_name: &str, convention: NamingConvention) -> bool {
    if attribute_name.is_empty() {
        return false;
    }

    if RESERVED_KEY_NAMES.contains(&attribute_name) {
        return true;
    }

    match convention {
        NamingConvention::CamelCase => {
            let mut chars = attribute_name.chars();
            let Some(first) = chars.next() else {
                return false;
            };
            !first.is_uppercase()
                && !attribute_name.contains('_')
                && attribute_name.chars().all(|c| c.is_alphanumeric())
        }
        NamingConvention::SnakeCase => attribute_name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_conversion() {
        assert_eq!(to_attribute_name("created_at", NamingConvention::CamelCase), "createdAt");
        assert_eq!(to_attribute_name("email", NamingConvention::CamelCase), "email");
        assert_eq!(to_attribute_name("user_id", NamingConvention::CamelCase), "userId");
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_attribute_name("created_at", NamingConvention::SnakeCase), "created_at");
    }

    #[test]
    fn reserved_pk_sk_names() {
        assert_eq!(to_attribute_name("PK", NamingConvention::CamelCase), "PK");
        assert_eq!(to_attribute_name("PK", NamingConvention::SnakeCase), "pk");
        assert_eq!(to_attribute_name("SK", NamingConvention::CamelCase), "SK");
    }

    #[test]
    fn validation_rejects_mismatched_casing() {
        assert!(validate_attribute_name("createdAt", NamingConvention::CamelCase));
        assert!(!validate_attribute_name("created_at", NamingConvention::CamelCase));
        assert!(validate_attribute_name("created_at", NamingConvention::SnakeCase));
        assert!(!validate_attribute_name("createdAt", NamingConvention::SnakeCase));
    }
}

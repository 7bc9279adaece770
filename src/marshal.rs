//! The marshaler (C4): converts between a Rust value and DynamoDB's
//! `AttributeValue` wire shape.
//!
//! Primitive fields (string, integer, float, bool, binary, timestamp, and
//! the three set kinds) go through the hand-rolled codecs below, which
//! round-trip exactly -- an integer field always comes back as the same
//! integer type, never shuffled through a lossy intermediate. `List`,
//! `Map`, and plain nested structs fall back to [`serde_dynamo`], which the
//! derive macro reaches for only when a field's classified kind doesn't
//! have a dedicated codec here.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::{DateTime as SmithyDateTime, DateTimeFormat};
pub use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::Error;

pub type Item = HashMap<String, AttributeValue>;

/// Implemented by every `#[derive(DynamormModel)]` type. The derive macro
/// emits the body; callers normally go through [`crate::executor::Executor`]
/// rather than calling these directly.
pub trait Marshal: Sized {
    fn to_item(&self) -> Item;
    fn from_item(item: &Item) -> Result<Self, Error>;
}

pub fn encode_string(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

pub fn decode_string(value: &AttributeValue, field: &str) -> Result<String, Error> {
    value
        .as_s()
        .cloned()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a string attribute")))
}

pub fn encode_integer(value: i64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

pub fn decode_integer(value: &AttributeValue, field: &str) -> Result<i64, Error> {
    let n = value
        .as_n()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a numeric attribute")))?;
    n.parse()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` numeric attribute `{n}` is not a valid integer")))
}

pub fn encode_float(value: f64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

pub fn decode_float(value: &AttributeValue, field: &str) -> Result<f64, Error> {
    let n = value
        .as_n()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a numeric attribute")))?;
    n.parse()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` numeric attribute `{n}` is not a valid float")))
}

pub fn encode_bool(value: bool) -> AttributeValue {
    AttributeValue::Bool(value)
}

pub fn decode_bool(value: &AttributeValue, field: &str) -> Result<bool, Error> {
    value
        .as_bool()
        .copied()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a boolean attribute")))
}

pub fn encode_binary(value: &[u8]) -> AttributeValue {
    AttributeValue::B(aws_sdk_dynamodb::primitives::Blob::new(value.to_vec()))
}

pub fn decode_binary(value: &AttributeValue, field: &str) -> Result<Vec<u8>, Error> {
    value
        .as_b()
        .map(|b| b.clone().into_inner())
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a binary attribute")))
}

pub fn encode_timestamp(value: &SmithyDateTime) -> AttributeValue {
    AttributeValue::S(
        value
            .fmt(DateTimeFormat::DateTime)
            .unwrap_or_else(|_| value.secs().to_string()),
    )
}

pub fn decode_timestamp(value: &AttributeValue, field: &str) -> Result<SmithyDateTime, Error> {
    let s = value
        .as_s()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a timestamp attribute")))?;
    SmithyDateTime::from_str(s, DateTimeFormat::DateTime)
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` timestamp `{s}` is not RFC3339")))
}

/// TTL-role timestamp fields serialize as Unix-seconds `N` rather than the
/// RFC 3339 `S` every other timestamp field uses, since that's the only
/// shape DynamoDB's own TTL attribute accepts.
pub fn encode_ttl_timestamp(value: &SmithyDateTime) -> AttributeValue {
    AttributeValue::N(value.secs().to_string())
}

pub fn decode_ttl_timestamp(value: &AttributeValue, field: &str) -> Result<SmithyDateTime, Error> {
    let n = value
        .as_n()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a unix-seconds ttl attribute")))?;
    let secs: i64 = n
        .parse()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` ttl attribute `{n}` is not a valid integer")))?;
    Ok(SmithyDateTime::from_secs(secs))
}

pub fn encode_string_set(values: &[String]) -> AttributeValue {
    AttributeValue::Ss(values.to_vec())
}

pub fn decode_string_set(value: &AttributeValue, field: &str) -> Result<Vec<String>, Error> {
    value
        .as_ss()
        .cloned()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a string set attribute")))
}

pub fn encode_number_set(values: &[String]) -> AttributeValue {
    AttributeValue::Ns(values.to_vec())
}

pub fn decode_number_set(value: &AttributeValue, field: &str) -> Result<Vec<String>, Error> {
    value
        .as_ns()
        .cloned()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a number set attribute")))
}

pub fn encode_binary_set(values: &[Vec<u8>]) -> AttributeValue {
    AttributeValue::Bs(
        values
            .iter()
            .cloned()
            .map(aws_sdk_dynamodb::primitives::Blob::new)
            .collect(),
    )
}

pub fn decode_binary_set(value: &AttributeValue, field: &str) -> Result<Vec<Vec<u8>>, Error> {
    value
        .as_bs()
        .map(|bs| bs.iter().map(|b| b.clone().into_inner()).collect())
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a binary set attribute")))
}

/// Serializes any `Serialize` value to a single `S` attribute via
/// `serde_json`. Used for fields tagged `json`.
pub fn encode_json<T: serde::Serialize>(value: &T, field: &str) -> Result<AttributeValue, Error> {
    serde_json::to_string(value)
        .map(AttributeValue::S)
        .map_err(|e| Error::UnsupportedType(format!("field `{field}` failed to serialize as json: {e}")))
}

pub fn decode_json<T: serde::de::DeserializeOwned>(value: &AttributeValue, field: &str) -> Result<T, Error> {
    let s = value
        .as_s()
        .map_err(|_| Error::UnsupportedType(format!("field `{field}` expected a json string attribute")))?;
    serde_json::from_str(s)
        .map_err(|e| Error::UnsupportedType(format!("field `{field}` failed to deserialize json: {e}")))
}

/// Generic fallback for `List`/`Map`/plain nested struct fields (anything
/// that isn't `flatten`- or `json`-tagged): goes through `serde_dynamo`'s
/// own `AttributeValue` representation. `flatten`-tagged fields bypass this
/// entirely -- the derive macro calls the nested type's own `Marshal` impl
/// and merges its item map into the parent's instead.
pub fn encode_generic<T: serde::Serialize>(value: &T, field: &str) -> Result<AttributeValue, Error> {
    serde_dynamo::to_attribute_value(value)
        .map(Into::into)
        .map_err(|e| Error::UnsupportedType(format!("field `{field}` failed to serialize: {e}")))
}

pub fn decode_generic<T: serde::de::DeserializeOwned>(value: &AttributeValue, field: &str) -> Result<T, Error> {
    serde_dynamo::from_attribute_value(serde_dynamo::AttributeValue::from(value.clone()))
        .map_err(|e| Error::UnsupportedType(format!("field `{field}` failed to deserialize: {e}")))
}

use std::str::FromStr;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_round_trips_exactly() {
        let encoded = encode_integer(-42);
        assert_eq!(decode_integer(&encoded, "n").unwrap(), -42);
    }

    #[test]
    fn binary_round_trips_exactly() {
        let bytes = vec![0u8, 1, 2, 255];
        let encoded = encode_binary(&bytes);
        assert_eq!(decode_binary(&encoded, "b").unwrap(), bytes);
    }

    #[test]
    fn string_set_round_trips() {
        let values = vec!["a".to_string(), "b".to_string()];
        let encoded = encode_string_set(&values);
        assert_eq!(decode_string_set(&encoded, "s").unwrap(), values);
    }

    #[test]
    fn ttl_timestamp_round_trips_as_unix_seconds() {
        let now = SmithyDateTime::from_secs(1_700_000_000);
        let encoded = encode_ttl_timestamp(&now);
        assert_eq!(encoded, AttributeValue::N("1700000000".to_string()));
        assert_eq!(decode_ttl_timestamp(&encoded, "expires_at").unwrap().secs(), now.secs());
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let wrong = AttributeValue::Bool(true);
        assert!(decode_string(&wrong, "name").is_err());
    }
}

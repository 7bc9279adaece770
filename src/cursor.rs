//! The cursor codec (C8): a stable, opaque continuation token wrapping
//! DynamoDB's `LastEvaluatedKey` plus the query-shape guards that produced
//! it, so a cursor minted against one index/sort order can't silently be
//! replayed against another.

use std::collections::BTreeMap;

use aws_sdk_dynamodb::types::AttributeValue;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("cursor is not valid base64url: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("cursor is not valid UTF-8")]
    InvalidUtf8,
    #[error("cursor is not valid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cursor has an empty lastKey")]
    EmptyLastKey,
    #[error("cursor has an unknown sort direction `{0}`")]
    UnknownSort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub last_key: BTreeMap<String, AttributeValue>,
    pub index: Option<String>,
    pub sort: Option<SortDirection>,
}

/// JSON-serializable mirror of [`AttributeValue`]'s shape used only for the
/// wire form of a cursor. `aws-sdk-dynamodb`'s own type doesn't implement
/// `serde::Serialize`, so the cursor keeps its own minimal encoding of the
/// handful of variants a key attribute can actually take.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum WireValue {
    S(String),
    N(String),
    B(String),
}

#[derive(Serialize, Deserialize)]
struct WireCursor {
    #[serde(rename = "lastKey")]
    last_key: BTreeMap<String, WireValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<SortDirection>,
}

impl Cursor {
    pub fn encode(&self) -> Result<String, CursorError> {
        if self.last_key.is_empty() {
            return Err(CursorError::EmptyLastKey);
        }

        let last_key = self
            .last_key
            .iter()
            .map(|(k, v)| Ok((k.clone(), to_wire_value(v)?)))
            .collect::<Result<BTreeMap<_, _>, CursorError>>()?;

        let wire = WireCursor { last_key, index: self.index.clone(), sort: self.sort };
        let json = serde_json::to_vec(&wire)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD.decode(token)?;
        let text = String::from_utf8(bytes).map_err(|_| CursorError::InvalidUtf8)?;
        let wire: WireCursor = serde_json::from_str(&text)?;

        if wire.last_key.is_empty() {
            return Err(CursorError::EmptyLastKey);
        }

        let last_key = wire
            .last_key
            .into_iter()
            .map(|(k, v)| (k, from_wire_value(v)))
            .collect();

        Ok(Cursor { last_key, index: wire.index, sort: wire.sort })
    }
}

fn to_wire_value(value: &AttributeValue) -> Result<WireValue, CursorError> {
    match value {
        AttributeValue::S(s) => Ok(WireValue::S(s.clone())),
        AttributeValue::N(n) => Ok(WireValue::N(n.clone())),
        AttributeValue::B(b) => Ok(WireValue::B(URL_SAFE_NO_PAD.encode(b.as_ref()))),
        other => Err(CursorError::InvalidJson(serde_json::Error::custom(format!(
            "cursor key attributes must be S, N, or B (got {other:?})"
        )))),
    }
}

fn from_wire_value(value: WireValue) -> AttributeValue {
    match value {
        WireValue::S(s) => AttributeValue::S(s),
        WireValue::N(n) => AttributeValue::N(n),
        WireValue::B(b) => {
            let bytes = URL_SAFE_NO_PAD.decode(b).unwrap_or_default();
            AttributeValue::B(aws_sdk_dynamodb::primitives::Blob::new(bytes))
        }
    }
}

use serde::de::Error as _;

//! Taxonomy of domain errors (C2).
//!
//! Every fallible operation in this crate ultimately produces an
//! [`Error`], a `thiserror`-derived enum aggregating per-operation error
//! detail (`InvalidModel`, `InvalidOperator`, ...) behind one type.
//! Callers that only care about *which* failure occurred rather than its
//! message can match on [`Error::kind`], which returns a small `Copy`,
//! `PartialEq` [`ErrorKind`] as a stable identity independent of the
//! human-readable message.

use std::fmt;

use thiserror::Error;

/// A stable, equality-comparable identity for every error this crate can
/// return. `Error::kind()` maps any variant down to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ItemNotFound,
    InvalidModel,
    MissingPrimaryKey,
    InvalidPrimaryKey,
    ConditionFailed,
    IndexNotFound,
    TransactionFailed,
    BatchOperationFailed,
    UnsupportedType,
    InvalidTag,
    TableNotFound,
    DuplicatePrimaryKey,
    EmptyValue,
    InvalidOperator,
    EncryptionNotConfigured,
    EncryptedFieldNotQueryable,
    InvalidEncryptedEnvelope,
    ResourceProtection,
    /// The caller's serverless invocation deadline left insufficient
    /// budget to issue the request at all.
    DeadlineExceeded,
    /// Catch-all for transport/SDK failures that don't map to a domain
    /// condition above (e.g. a network error, a throttling exception the
    /// SDK's own retryer gave up on).
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Raised by [`crate::registry::Registry::register`] when a model's
/// `#[derive(DynamormModel)]` metadata violates a structural invariant.
#[derive(Debug, Clone, Error)]
pub enum InvalidModel {
    #[error("model `{type_name}` has no partition key; every model needs exactly one field tagged `pk`")]
    MissingPrimaryKey { type_name: &'static str },

    #[error("model `{type_name}` declares more than one partition key field")]
    DuplicatePrimaryKey { type_name: &'static str },

    #[error("model `{type_name}` declares more than one sort key field")]
    DuplicateSortKey { type_name: &'static str },

    #[error("model `{type_name}` field `{field}` is tagged `version` but is not an integer type")]
    VersionNotInteger { type_name: &'static str, field: &'static str },

    #[error("model `{type_name}` field `{field}` is tagged `ttl` but is not a 64-bit-range integer or timestamp type")]
    TtlNotSupported { type_name: &'static str, field: &'static str },

    #[error("model `{type_name}` field `{field}` is tagged `{role}` but is not a timestamp type")]
    TimestampRoleMismatch {
        type_name: &'static str,
        field: &'static str,
        role: &'static str,
    },

    #[error("model `{type_name}` declares more than one `{role}` field")]
    DuplicateLifecycleRole { type_name: &'static str, role: &'static str },

    #[error("model `{type_name}` field `{field}` is tagged `set` but is not a sequence type")]
    SetOnNonSequence { type_name: &'static str, field: &'static str },

    #[error("model `{type_name}` field `{field}` attribute name `{attribute_name}` does not validate under the record's naming convention and has no `attr` override")]
    InvalidAttributeName {
        type_name: &'static str,
        field: &'static str,
        attribute_name: &'static str,
    },

    #[error("model `{type_name}` index `{index_name}` is missing a partition key field")]
    IndexMissingPartitionKey { type_name: &'static str, index_name: String },

    #[error("model `{type_name}` index `{index_name}` declares more than one `{role}` field")]
    IndexDuplicateKeyRole {
        type_name: &'static str,
        index_name: String,
        role: &'static str,
    },
}

/// A reference to a (field, operator, value) condition that could not be
/// accepted by the expression builder or query compiler.
#[derive(Debug, Clone, Error)]
#[error("invalid operator `{operator}` on field `{field}`: {reason}")]
pub struct InvalidOperator {
    pub field: String,
    pub operator: String,
    pub reason: String,
}

/// The crate-wide error type. Every fallible public entry point returns
/// `Result<T, Error>`; `?` conversions are provided from every narrower
/// error type produced by an individual component.
#[derive(Debug, Error)]
pub enum Error {
    #[error("item not found")]
    ItemNotFound,

    #[error("invalid model: {0}")]
    InvalidModel(#[from] InvalidModel),

    #[error("missing primary key: {0}")]
    MissingPrimaryKey(String),

    #[error("invalid primary key: {0}")]
    InvalidPrimaryKey(String),

    #[error("condition failed: {0}")]
    ConditionFailed(String),

    #[error("index not found: {0}")]
    IndexNotFound(String),

    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    #[error("batch operation failed: {succeeded} succeeded, {failed} failed")]
    BatchOperationFailed {
        succeeded: usize,
        failed: usize,
        unprocessed: usize,
    },

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("invalid tag: {0}")]
    InvalidTag(String),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("duplicate primary key: {0}")]
    DuplicatePrimaryKey(String),

    #[error("empty value for field: {0}")]
    EmptyValue(String),

    #[error("invalid operator: {0}")]
    InvalidOperator(#[from] InvalidOperator),

    #[error("encryption not configured for field: {0}")]
    EncryptionNotConfigured(String),

    #[error("field `{0}` is encrypted and cannot be used in a query or filter condition")]
    EncryptedFieldNotQueryable(String),

    #[error("invalid encrypted envelope: {0}")]
    InvalidEncryptedEnvelope(String),

    #[error("resource protection: {0}")]
    ResourceProtection(String),

    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("dynamodb request failed: {0}")]
    Dynamo(String),
}

impl Error {
    /// Stable identity for this error, independent of its message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ItemNotFound => ErrorKind::ItemNotFound,
            Error::InvalidModel(_) => ErrorKind::InvalidModel,
            Error::MissingPrimaryKey(_) => ErrorKind::MissingPrimaryKey,
            Error::InvalidPrimaryKey(_) => ErrorKind::InvalidPrimaryKey,
            Error::ConditionFailed(_) => ErrorKind::ConditionFailed,
            Error::IndexNotFound(_) => ErrorKind::IndexNotFound,
            Error::TransactionFailed(_) => ErrorKind::TransactionFailed,
            Error::BatchOperationFailed { .. } => ErrorKind::BatchOperationFailed,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::InvalidTag(_) => ErrorKind::InvalidTag,
            Error::TableNotFound(_) => ErrorKind::TableNotFound,
            Error::DuplicatePrimaryKey(_) => ErrorKind::DuplicatePrimaryKey,
            Error::EmptyValue(_) => ErrorKind::EmptyValue,
            Error::InvalidOperator(_) => ErrorKind::InvalidOperator,
            Error::EncryptionNotConfigured(_) => ErrorKind::EncryptionNotConfigured,
            Error::EncryptedFieldNotQueryable(_) => ErrorKind::EncryptedFieldNotQueryable,
            Error::InvalidEncryptedEnvelope(_) => ErrorKind::InvalidEncryptedEnvelope,
            Error::ResourceProtection(_) => ErrorKind::ResourceProtection,
            Error::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
            Error::Dynamo(_) => ErrorKind::Internal,
        }
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

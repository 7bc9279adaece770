//! The `'static`, `Copy`-friendly shapes `#[derive(DynamormModel)]` emits
//! as a literal `const`. These are the macro's output -- see
//! `dynamorm-derive`'s `codegen` module -- and the registry's input.

use crate::naming::NamingConvention;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Gsi,
    Lsi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    All,
    KeysOnly,
    Include,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Partition,
    Sort,
}

/// One `index = "name"` / `lsi = "name"` clause attached to a field.
#[derive(Debug, Clone, Copy)]
pub struct FieldIndexClause {
    pub index_name: &'static str,
    pub kind: IndexKind,
    pub is_pk: bool,
    pub is_sk: bool,
    pub sparse: bool,
}

/// One field of a `#[derive(DynamormModel)]` record, as captured by the
/// derive macro at compile time.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub attribute_name_override: Option<&'static str>,
    pub kind: FieldKind,
    pub is_pk: bool,
    pub is_sk: bool,
    pub is_version: bool,
    pub is_ttl: bool,
    pub is_created_at: bool,
    pub is_updated_at: bool,
    pub is_set: bool,
    pub omit_empty: bool,
    pub is_encrypted: bool,
    pub is_flatten: bool,
    pub index_clauses: &'static [FieldIndexClause],
}

/// A whole `#[derive(DynamormModel)]` record, as captured by the derive
/// macro at compile time.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub type_name: &'static str,
    pub table_name_override: Option<&'static str>,
    pub naming_override: Option<NamingConvention>,
    /// Disables implicit `CreatedAt`/`UpdatedAt` role detection by field
    /// name alone.
    pub strict: bool,
    pub fields: &'static [FieldSpec],
}

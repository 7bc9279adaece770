//! The model registry (C3).
//!
//! `#[derive(DynamormModel)]` expands into a `const SPEC: ModelSpec` plus an
//! `impl Model for T` that exposes it. [`Registry::register`] walks that
//! spec exactly once per type -- applying the naming convention, resolving
//! attribute names, and enforcing the model's structural invariants --
//! and caches the resulting [`Metadata`] for the lifetime of the process:
//! created on first model registration, it then lives for the process.

mod build;
mod raw;

pub use raw::{FieldIndexClause, FieldKind, FieldSpec, IndexKind, KeyRole, ModelSpec, ProjectionType};

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::InvalidModel;
use crate::naming::NamingConvention;

/// Per-field metadata resolved by the registry.
#[derive(Debug, Clone)]
pub struct FieldMetadata {
    pub name: &'static str,
    pub attribute_name: String,
    pub kind: FieldKind,
    /// Dotted path for attributes promoted from a `flatten`-tagged nested
    /// model; empty for top-level fields.
    pub index_path: Vec<&'static str>,
    pub is_pk: bool,
    pub is_sk: bool,
    pub is_version: bool,
    pub is_ttl: bool,
    pub is_created_at: bool,
    pub is_updated_at: bool,
    pub is_set: bool,
    pub omit_empty: bool,
    pub is_encrypted: bool,
    pub index_roles: HashMap<String, KeyRole>,
}

/// A single global or local secondary index.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    pub name: String,
    pub kind: IndexKind,
    pub partition_key: String,
    pub sort_key: Option<String>,
    pub projection_type: ProjectionType,
    pub projected_fields: Vec<String>,
    pub sparse: bool,
}

/// The base table's key schema.
#[derive(Debug, Clone)]
pub struct PrimaryKeySchema {
    pub partition_key: String,
    pub sort_key: Option<String>,
}

/// Canonical, immutable metadata for a registered model. Produced once by
/// [`Registry::register`] and shared thereafter behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub type_name: &'static str,
    pub table_name: String,
    pub naming_convention: NamingConvention,
    pub fields: HashMap<&'static str, FieldMetadata>,
    pub fields_by_attribute_name: HashMap<String, FieldMetadata>,
    pub primary_key: PrimaryKeySchema,
    pub indexes: Vec<IndexSchema>,
    pub version_field: Option<String>,
    pub ttl_field: Option<String>,
    pub created_at_field: Option<String>,
    pub updated_at_field: Option<String>,
}

impl Metadata {
    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.get(name)
    }

    pub fn field_by_attribute(&self, attribute_name: &str) -> Option<&FieldMetadata> {
        self.fields_by_attribute_name.get(attribute_name)
    }

    pub fn index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes.iter().find(|idx| idx.name == name)
    }

    pub fn build(spec: &ModelSpec) -> Result<Metadata, InvalidModel> {
        build::build(spec)
    }
}

/// Implemented by every `#[derive(DynamormModel)]` type. The derive macro
/// supplies [`Model::spec`]; [`Model::metadata`] is a default method that
/// goes through the process-wide [`Registry`].
pub trait Model: Sized + 'static {
    fn spec() -> &'static ModelSpec;

    /// The registered, validated metadata for this model, building and
    /// caching it on first access.
    ///
    /// # Panics
    ///
    /// Panics if the model's annotations violate a structural invariant.
    /// Prefer [`Registry::register`] in contexts where that should be a
    /// recoverable `Result` instead.
    fn metadata() -> Arc<Metadata> {
        Registry::register::<Self>().unwrap_or_else(|err| {
            panic!("invalid dynamorm model `{}`: {err}", Self::spec().type_name)
        })
    }
}

fn global_cache() -> &'static RwLock<HashMap<TypeId, Arc<Metadata>>> {
    static CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<Metadata>>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Process-wide cache of every [`Model`] that has been registered.
///
/// Registration is idempotent: the second call for a given `T` returns the
/// same `Arc<Metadata>` as the first. Every `T` is keyed by its `TypeId` in
/// one shared `RwLock<HashMap<TypeId, _>>` -- there is no per-type fast path
/// here, since a `static` declared inside a generic function is not
/// monomorphized per type parameter (its type never mentions `T`, so the
/// compiler emits a single instance shared by every instantiation); keying
/// explicitly by `TypeId` is what actually distinguishes one model from
/// another. The read lock is taken on every call, but it's uncontended in
/// the common case (no writer holds it once every registered type is
/// installed).
pub struct Registry;

impl Registry {
    /// Parse and validate `T`'s metadata, or return the cached value from a
    /// prior call. This is the Rust realization of `register(recordType) ->
    /// Metadata | InvalidModel`.
    pub fn register<T: Model>() -> Result<Arc<Metadata>, InvalidModel> {
        let type_id = TypeId::of::<T>();

        if let Some(existing) = global_cache().read().expect("dynamorm registry lock poisoned").get(&type_id) {
            return Ok(existing.clone());
        }

        let metadata = Arc::new(Metadata::build(T::spec())?);
        log::debug!(
            "registered dynamorm model `{}` -> table `{}`",
            T::spec().type_name,
            metadata.table_name
        );

        let mut cache = global_cache().write().expect("dynamorm registry lock poisoned");
        let metadata = cache.entry(type_id).or_insert(metadata).clone();
        Ok(metadata)
    }

    /// Every model registered so far, in no particular order.
    pub fn registered() -> Vec<Arc<Metadata>> {
        global_cache()
            .read()
            .expect("dynamorm registry lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Look up a previously registered model's metadata by its `TypeId`,
    /// without triggering registration.
    pub fn get(type_id: TypeId) -> Option<Arc<Metadata>> {
        global_cache()
            .read()
            .expect("dynamorm registry lock poisoned")
            .get(&type_id)
            .cloned()
    }

    /// Convenience wrapper over [`Registry::get`] for a concrete `T`.
    pub fn get_for<T: Any + 'static>() -> Option<Arc<Metadata>> {
        Self::get(TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use crate::DynamormModel;

    #[derive(DynamormModel)]
    #[dynamorm(table = "registry_test_widgets")]
    struct RegistryTestWidget {
        #[dynamorm(pk)]
        id: String,
    }

    #[derive(DynamormModel)]
    #[dynamorm(table = "registry_test_accounts")]
    struct RegistryTestAccount {
        #[dynamorm(pk)]
        id: String,
        #[dynamorm(encrypted)]
        ssn: String,
    }

    /// Guards against the registry's per-type cache collapsing distinct
    /// models onto the same metadata -- every `T` must get its own
    /// `Metadata`, keyed by its `TypeId`, not whichever type happened to
    /// register first in the process.
    #[test]
    fn distinct_models_get_distinct_metadata() {
        let widget = super::Registry::register::<RegistryTestWidget>().unwrap();
        let account = super::Registry::register::<RegistryTestAccount>().unwrap();

        assert_eq!(widget.table_name, "registry_test_widgets");
        assert_eq!(account.table_name, "registry_test_accounts");
        assert!(account.field("ssn").is_some_and(|f| f.is_encrypted));
        assert!(widget.field("ssn").is_none());
    }

    #[test]
    fn repeat_registration_is_idempotent() {
        let first = super::Registry::register::<RegistryTestWidget>().unwrap();
        let second = super::Registry::register::<RegistryTestWidget>().unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }
}

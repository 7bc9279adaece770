//! Turns a macro-emitted [`ModelSpec`] into validated [`Metadata`],
//! enforcing every structural invariant a record must satisfy before it
//! can be registered.

use std::collections::HashMap;

use super::raw::{FieldIndexClause, FieldKind, FieldSpec, IndexKind, KeyRole, ModelSpec, ProjectionType};
use super::{FieldMetadata, IndexSchema, Metadata, PrimaryKeySchema};
use crate::error::InvalidModel;
use crate::naming::{self, NamingConvention};

pub(super) fn build(spec: &ModelSpec) -> Result<Metadata, InvalidModel> {
    let naming_convention = spec.naming_override.unwrap_or_default();

    let mut fields: HashMap<&'static str, FieldMetadata> = HashMap::with_capacity(spec.fields.len());
    let mut fields_by_attribute_name: HashMap<String, FieldMetadata> = HashMap::with_capacity(spec.fields.len());

    let mut pk_field: Option<&'static str> = None;
    let mut sk_field: Option<&'static str> = None;
    let mut version_field: Option<&'static str> = None;
    let mut ttl_field: Option<&'static str> = None;
    let mut created_at_field: Option<&'static str> = None;
    let mut updated_at_field: Option<&'static str> = None;

    for field in spec.fields {
        check_role_types(spec.type_name, field)?;

        if field.is_pk {
            ensure_unique(pk_field, spec.type_name, "pk", || InvalidModel::DuplicatePrimaryKey {
                type_name: spec.type_name,
            })?;
            pk_field = Some(field.name);
        }
        if field.is_sk {
            ensure_unique(sk_field, spec.type_name, "sk", || InvalidModel::DuplicateSortKey {
                type_name: spec.type_name,
            })?;
            sk_field = Some(field.name);
        }
        if field.is_version {
            ensure_unique(version_field, spec.type_name, "version", || InvalidModel::DuplicateLifecycleRole {
                type_name: spec.type_name,
                role: "version",
            })?;
            version_field = Some(field.name);
        }
        if field.is_ttl {
            ensure_unique(ttl_field, spec.type_name, "ttl", || InvalidModel::DuplicateLifecycleRole {
                type_name: spec.type_name,
                role: "ttl",
            })?;
            ttl_field = Some(field.name);
        }
        if field.is_created_at {
            ensure_unique(created_at_field, spec.type_name, "created_at", || InvalidModel::DuplicateLifecycleRole {
                type_name: spec.type_name,
                role: "created_at",
            })?;
            created_at_field = Some(field.name);
        }
        if field.is_updated_at {
            ensure_unique(updated_at_field, spec.type_name, "updated_at", || InvalidModel::DuplicateLifecycleRole {
                type_name: spec.type_name,
                role: "updated_at",
            })?;
            updated_at_field = Some(field.name);
        }
    }

    // Fall back to detecting lifecycle roles by field name when the record
    // isn't `strict` and nothing was explicitly tagged.
    if !spec.strict {
        if created_at_field.is_none() {
            created_at_field = spec
                .fields
                .iter()
                .find(|f| f.name == "created_at" && f.kind == FieldKind::Timestamp)
                .map(|f| f.name);
        }
        if updated_at_field.is_none() {
            updated_at_field = spec
                .fields
                .iter()
                .find(|f| f.name == "updated_at" && f.kind == FieldKind::Timestamp)
                .map(|f| f.name);
        }
    }

    let Some(pk_field) = pk_field else {
        return Err(InvalidModel::MissingPrimaryKey { type_name: spec.type_name });
    };

    for field in spec.fields {
        let attribute_name = resolve_attribute_name(field, naming_convention);

        if field.attribute_name_override.is_none()
            && !naming::validate_attribute_name(&attribute_name, naming_convention)
        {
            return Err(InvalidModel::InvalidAttributeName {
                type_name: spec.type_name,
                field: field.name,
                attribute_name: field.name,
            });
        }

        let index_roles = index_roles_for(field);

        let metadata = FieldMetadata {
            name: field.name,
            attribute_name: attribute_name.clone(),
            kind: field.kind,
            index_path: Vec::new(),
            is_pk: field.is_pk,
            is_sk: field.is_sk,
            is_version: field.is_version,
            is_ttl: field.is_ttl,
            is_created_at: created_at_field == Some(field.name),
            is_updated_at: updated_at_field == Some(field.name),
            is_set: field.is_set,
            omit_empty: field.omit_empty,
            is_encrypted: field.is_encrypted,
            index_roles,
        };

        fields.insert(field.name, metadata.clone());
        fields_by_attribute_name.insert(attribute_name, metadata);
    }

    let primary_key = PrimaryKeySchema {
        partition_key: fields[pk_field].attribute_name.clone(),
        sort_key: sk_field.map(|name| fields[name].attribute_name.clone()),
    };

    let indexes = build_indexes(spec, &fields, &primary_key)?;

    let table_name = spec
        .table_name_override
        .map(str::to_string)
        .unwrap_or_else(|| default_table_name(spec.type_name));

    Ok(Metadata {
        type_name: spec.type_name,
        table_name,
        naming_convention,
        fields,
        fields_by_attribute_name,
        primary_key,
        indexes,
        version_field: version_field.map(|n| n.to_string()),
        ttl_field: ttl_field.map(|n| n.to_string()),
        created_at_field: created_at_field.map(|n| n.to_string()),
        updated_at_field: updated_at_field.map(|n| n.to_string()),
    })
}

fn ensure_unique<F>(existing: Option<&'static str>, _type_name: &'static str, _role: &str, err: F) -> Result<(), InvalidModel>
where
    F: FnOnce() -> InvalidModel,
{
    if existing.is_some() {
        Err(err())
    } else {
        Ok(())
    }
}

fn check_role_types(type_name: &'static str, field: &FieldSpec) -> Result<(), InvalidModel> {
    if field.is_version && field.kind != FieldKind::Integer {
        return Err(InvalidModel::VersionNotInteger { type_name, field: field.name });
    }
    if field.is_ttl && !matches!(field.kind, FieldKind::Integer | FieldKind::Timestamp) {
        return Err(InvalidModel::TtlNotSupported { type_name, field: field.name });
    }
    if field.is_created_at && field.kind != FieldKind::Timestamp {
        return Err(InvalidModel::TimestampRoleMismatch { type_name, field: field.name, role: "created_at" });
    }
    if field.is_updated_at && field.kind != FieldKind::Timestamp {
        return Err(InvalidModel::TimestampRoleMismatch { type_name, field: field.name, role: "updated_at" });
    }
    if field.is_set
        && !matches!(
            field.kind,
            FieldKind::StringSet | FieldKind::NumberSet | FieldKind::BinarySet
        )
    {
        return Err(InvalidModel::SetOnNonSequence { type_name, field: field.name });
    }
    Ok(())
}

fn resolve_attribute_name(field: &FieldSpec, convention: NamingConvention) -> String {
    field
        .attribute_name_override
        .map(str::to_string)
        .unwrap_or_else(|| naming::to_attribute_name(field.name, convention))
}

fn index_roles_for(field: &FieldSpec) -> HashMap<String, KeyRole> {
    field
        .index_clauses
        .iter()
        .filter_map(|clause| {
            if clause.is_pk {
                Some((clause.index_name.to_string(), KeyRole::Partition))
            } else if clause.is_sk {
                Some((clause.index_name.to_string(), KeyRole::Sort))
            } else {
                None
            }
        })
        .collect()
}

fn build_indexes(
    spec: &ModelSpec,
    fields: &HashMap<&'static str, FieldMetadata>,
    primary_key: &PrimaryKeySchema,
) -> Result<Vec<IndexSchema>, InvalidModel> {
    struct Accum {
        kind: IndexKind,
        pk: Option<String>,
        sk: Option<String>,
    }

    let mut accum: HashMap<&'static str, Accum> = HashMap::new();

    for field in spec.fields {
        for clause in field.index_clauses {
            let attribute_name = fields[field.name].attribute_name.clone();

            let entry = accum.entry(clause.index_name).or_insert_with(|| Accum {
                kind: clause.kind,
                pk: None,
                sk: None,
            });

            if clause.is_pk {
                if entry.pk.is_some() {
                    return Err(InvalidModel::IndexDuplicateKeyRole {
                        type_name: spec.type_name,
                        index_name: clause.index_name.to_string(),
                        role: "pk",
                    });
                }
                entry.pk = Some(attribute_name);
            }
            if clause.is_sk {
                if entry.sk.is_some() {
                    return Err(InvalidModel::IndexDuplicateKeyRole {
                        type_name: spec.type_name,
                        index_name: clause.index_name.to_string(),
                        role: "sk",
                    });
                }
                entry.sk = Some(attribute_name);
            }
        }
    }

    let mut indexes = Vec::with_capacity(accum.len());
    for (name, entry) in accum {
        let partition_key = match entry.kind {
            // LSIs share the base table's partition key by definition; the
            // derive macro's parser already rejects `lsi = "..." pk` for
            // this reason.
            IndexKind::Lsi => primary_key.partition_key.clone(),
            IndexKind::Gsi => entry.pk.clone().ok_or_else(|| InvalidModel::IndexMissingPartitionKey {
                type_name: spec.type_name,
                index_name: name.to_string(),
            })?,
        };

        indexes.push(IndexSchema {
            name: name.to_string(),
            kind: entry.kind,
            partition_key,
            sort_key: entry.sk,
            projection_type: ProjectionType::All,
            projected_fields: Vec::new(),
            sparse: false,
        });
    }

    indexes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(indexes)
}

/// Naive English pluralization: `User` -> `users`, `Category` -> `categories`,
/// `Box` -> `boxes`. Good enough for the common cases; anything else should
/// use an explicit `table = "..."` override.
fn default_table_name(type_name: &'static str) -> String {
    let snake = to_snake_case(type_name);
    if let Some(stem) = snake.strip_suffix('y') {
        if !stem.ends_with(|c: char| "aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }
    if snake.ends_with('s') || snake.ends_with('x') || snake.ends_with("ch") || snake.ends_with("sh") {
        return format!("{snake}es");
    }
    format!("{snake}s")
}

fn to_snake_case(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len() + 4);
    for (i, ch) in type_name.chars().enumerate() {
        if ch.is_uppercase() && i != 0 {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

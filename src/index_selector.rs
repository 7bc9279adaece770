//! The index selector (C6): scores every candidate index (including the
//! base table) against the key conditions a query actually supplied, and
//! picks the best access path for a `Query` -- or signals that none of
//! them qualify, in which case the caller falls back to `Scan`.

use crate::expr::Operator;
use crate::registry::{IndexKind, IndexSchema, Metadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCondition<'a> {
    pub field: &'a str,
    pub operator: Operator,
}

/// `None`: no index (including the base table) has its partition key
/// satisfied by an `=` condition -- the caller must `Scan`.
/// `Some(None)`: use the base table.
/// `Some(Some(name))`: use the named secondary index.
pub fn select_optimal<'a>(
    required: &[KeyCondition<'_>],
    metadata: &'a Metadata,
) -> Option<Option<&'a str>> {
    let mut best: Option<(i32, Option<&'a str>)> = None;

    let candidates = std::iter::once((None, &metadata.primary_key.partition_key, &metadata.primary_key.sort_key, false, true))
        .chain(metadata.indexes.iter().map(|idx: &'a IndexSchema| {
            (
                Some(idx.name.as_str()),
                &idx.partition_key,
                &idx.sort_key,
                idx.kind == IndexKind::Gsi,
                idx.projection_type == crate::registry::ProjectionType::All,
            )
        }));

    for (name, pk, sk, is_gsi, is_all_projection) in candidates {
        let Some(score) = score_candidate(required, pk, sk.as_deref(), is_gsi, is_all_projection) else {
            continue;
        };

        let better = match &best {
            None => true,
            Some((best_score, best_name)) => {
                score > *best_score
                    || (score == *best_score && tie_break_wins(name, *best_name))
            }
        };
        if better {
            best = Some((score, name));
        }
    }

    best.map(|(_, name)| name)
}

fn score_candidate(
    required: &[KeyCondition<'_>],
    partition_key: &str,
    sort_key: Option<&str>,
    is_gsi: bool,
    is_all_projection: bool,
) -> Option<i32> {
    let pk_matches = required
        .iter()
        .any(|c| c.field == partition_key && c.operator == Operator::Eq);
    if !pk_matches {
        return None;
    }

    let mut score = 100;

    if let Some(sk) = sort_key {
        if let Some(sk_condition) = required.iter().find(|c| c.field == sk) {
            score += match sk_condition.operator {
                Operator::Eq => 50,
                Operator::BeginsWith => 40,
                Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge | Operator::Between => 30,
                _ => 0,
            };
        }
    }

    if is_gsi {
        score += 10;
    }
    if is_all_projection {
        score += 5;
    }

    Some(score)
}

/// Ties break toward the base table (`None`), then alphabetically by index
/// name.
fn tie_break_wins(candidate: Option<&str>, current_best: Option<&str>) -> bool {
    match (candidate, current_best) {
        (None, Some(_)) => true,
        (Some(_), None) => false,
        (Some(a), Some(b)) => a < b,
        (None, None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NamingConvention;
    use crate::registry::{IndexSchema, PrimaryKeySchema, ProjectionType};
    use std::collections::HashMap;

    fn metadata_with_gsi() -> Metadata {
        Metadata {
            type_name: "User",
            table_name: "users".into(),
            naming_convention: NamingConvention::CamelCase,
            fields: HashMap::new(),
            fields_by_attribute_name: HashMap::new(),
            primary_key: PrimaryKeySchema { partition_key: "userId".into(), sort_key: None },
            indexes: vec![IndexSchema {
                name: "by-email".into(),
                kind: IndexKind::Gsi,
                partition_key: "email".into(),
                sort_key: Some("createdAt".into()),
                projection_type: ProjectionType::All,
                projected_fields: Vec::new(),
                sparse: false,
            }],
            version_field: None,
            ttl_field: None,
            created_at_field: None,
            updated_at_field: None,
        }
    }

    #[test]
    fn gsi_beats_base_table_when_it_matches_more() {
        let metadata = metadata_with_gsi();
        let required = [
            KeyCondition { field: "email", operator: Operator::Eq },
            KeyCondition { field: "createdAt", operator: Operator::Gt },
        ];
        assert_eq!(select_optimal(&required, &metadata), Some(Some("by-email")));
    }

    #[test]
    fn no_pk_equality_forces_scan() {
        let metadata = metadata_with_gsi();
        let required = [KeyCondition { field: "createdAt", operator: Operator::Gt }];
        assert_eq!(select_optimal(&required, &metadata), None);
    }

    #[test]
    fn base_table_used_when_only_its_pk_matches() {
        let metadata = metadata_with_gsi();
        let required = [KeyCondition { field: "userId", operator: Operator::Eq }];
        assert_eq!(select_optimal(&required, &metadata), Some(None));
    }
}

//! A single field participating in more than one secondary index, and the
//! GSI/LSI schema the registry builds from those clauses.

use dynamorm::index_selector::{self, KeyCondition};
use dynamorm::Model;
use dynamorm::DynamormModel;
use dynamorm::Operator;

#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "users")]
struct User {
    #[dynamorm(pk)]
    email: String,

    #[dynamorm(index = "by-name", pk)]
    #[dynamorm(index = "by-name-created", pk)]
    name: String,

    #[dynamorm(index = "by-name-created", sk)]
    created_at: aws_smithy_types::DateTime,

    #[dynamorm(lsi = "by-status", sk)]
    status: String,
}

#[test]
fn a_field_can_be_the_partition_key_of_more_than_one_index() {
    let metadata = User::metadata();
    let by_name = metadata.index("by-name").expect("by-name index");
    let by_name_created = metadata.index("by-name-created").expect("by-name-created index");
    assert_eq!(by_name.partition_key, "name");
    assert_eq!(by_name_created.partition_key, "name");
    assert_eq!(by_name_created.sort_key.as_deref(), Some("createdAt"));
}

#[test]
fn an_lsi_shares_the_base_tables_partition_key() {
    let metadata = User::metadata();
    let by_status = metadata.index("by-status").expect("by-status index");
    assert_eq!(by_status.partition_key, metadata.primary_key.partition_key);
    assert_eq!(by_status.sort_key.as_deref(), Some("status"));
    assert_eq!(by_status.kind, dynamorm::registry::IndexKind::Lsi);
}

#[test]
fn index_selection_prefers_the_most_specific_match() {
    let metadata = User::metadata();

    // Equality on `name` plus a range on `createdAt` satisfies both
    // `by-name` (pk only) and `by-name-created` (pk + sk); the latter
    // scores higher because its sort key condition also matches.
    let conditions = vec![
        KeyCondition { field: "name", operator: Operator::Eq },
        KeyCondition { field: "createdAt", operator: Operator::Gt },
    ];
    let chosen = index_selector::select_optimal(&conditions, &metadata);
    assert_eq!(chosen, Some(Some("by-name-created")));
}

#[test]
fn index_selection_falls_back_to_the_single_field_index() {
    let metadata = User::metadata();
    let conditions = vec![KeyCondition { field: "name", operator: Operator::Eq }];
    let chosen = index_selector::select_optimal(&conditions, &metadata);
    assert_eq!(chosen, Some(Some("by-name")));
}

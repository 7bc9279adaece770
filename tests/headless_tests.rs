//! Partition-key-only models (no sort key) and the naming-convention
//! machinery: default camelCase derivation, an explicit `attr` override,
//! and a field-level `naming = "..."` tag setting the whole record's
//! convention.

use dynamorm::marshal::AttributeValue;
use dynamorm::{Marshal, Model};
use dynamorm::DynamormModel;

#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "accounts")]
struct Account {
    #[dynamorm(pk)]
    account_id: String,
    display_name: String,
    is_active: bool,
}

#[test]
fn a_partition_key_only_model_has_no_sort_key() {
    let metadata = Account::metadata();
    assert_eq!(metadata.primary_key.partition_key, "accountId");
    assert!(metadata.primary_key.sort_key.is_none());
}

#[test]
fn field_names_derive_camel_case_attribute_names_by_default() {
    let account = Account { account_id: "a1".to_string(), display_name: "Ada".to_string(), is_active: true };
    let item = account.to_item();
    assert!(item.contains_key("accountId"));
    assert!(item.contains_key("displayName"));
    assert!(item.contains_key("isActive"));
    assert_eq!(Account::from_item(&item).unwrap(), account);
}

#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "accounts")]
struct AccountWithOverride {
    #[dynamorm(pk, attr = "id")]
    account_id: String,
}

#[test]
fn attr_override_wins_over_the_derived_name() {
    let metadata = AccountWithOverride::metadata();
    assert_eq!(metadata.primary_key.partition_key, "id");
    let value = AccountWithOverride { account_id: "a1".to_string() };
    let item = value.to_item();
    assert!(item.contains_key("id"));
    assert!(!item.contains_key("accountId"));
}

#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "accounts")]
struct FieldLevelSnakeCase {
    #[dynamorm(pk)]
    account_id: String,
    #[dynamorm(naming = "snake_case")]
    display_name: String,
}

#[test]
fn a_field_level_naming_tag_sets_the_whole_records_convention() {
    // A `naming = "..."` tag on any field, not just the container, picks
    // the convention for every field in the record.
    let metadata = FieldLevelSnakeCase::metadata();
    assert_eq!(metadata.primary_key.partition_key, "account_id");

    let value = FieldLevelSnakeCase { account_id: "a1".to_string(), display_name: "Ada".to_string() };
    let item = value.to_item();
    assert!(item.contains_key("account_id"));
    assert!(item.contains_key("display_name"));
    assert!(!item.contains_key("accountId"));
    assert_eq!(FieldLevelSnakeCase::from_item(&item).unwrap(), value);
}

#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "widgets", naming = "snake_case")]
struct ContainerWinsOverField {
    #[dynamorm(pk)]
    id: String,
    #[dynamorm(naming = "camel_case")]
    display_name: String,
}

#[test]
fn the_container_level_tag_wins_when_both_are_present() {
    let value = ContainerWinsOverField { id: "w1".to_string(), display_name: "Widget".to_string() };
    let item = value.to_item();
    assert!(item.contains_key("display_name"));
    assert!(!item.contains_key("displayName"));
}

#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "optional_widgets")]
struct OptionalFields {
    #[dynamorm(pk)]
    id: String,
    nickname: Option<String>,
}

#[test]
fn a_present_optional_field_round_trips() {
    let value = OptionalFields { id: "w1".to_string(), nickname: Some("Woody".to_string()) };
    let item = value.to_item();
    assert_eq!(item.get("nickname"), Some(&AttributeValue::S("Woody".to_string())));
    assert_eq!(OptionalFields::from_item(&item).unwrap(), value);
}

#[test]
fn an_absent_optional_field_is_stored_as_a_null_attribute_by_default() {
    let value = OptionalFields { id: "w1".to_string(), nickname: None };
    let item = value.to_item();
    assert_eq!(item.get("nickname"), Some(&AttributeValue::Null(true)));
    assert_eq!(OptionalFields::from_item(&item).unwrap(), value);
}

#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "sparse_widgets")]
struct OmitEmptyField {
    #[dynamorm(pk)]
    id: String,
    #[dynamorm(omitempty)]
    nickname: Option<String>,
}

#[test]
fn omitempty_drops_the_attribute_entirely_when_absent() {
    let value = OmitEmptyField { id: "w1".to_string(), nickname: None };
    let item = value.to_item();
    assert!(!item.contains_key("nickname"));
    assert_eq!(OmitEmptyField::from_item(&item).unwrap(), value);
}

//! `Marshal`/`Model` identity: `to_item`/`from_item` round-trips and the
//! reserved `PK`/`SK` field-name casing rules.

use std::collections::HashMap;

use dynamorm::marshal::AttributeValue;
use dynamorm::{Marshal, Model};
use dynamorm::DynamormModel;

#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "users")]
struct User {
    #[dynamorm(pk)]
    email: String,
    #[dynamorm(sk)]
    name: String,
    age: u32,
}

#[test]
fn round_trips_through_to_item_and_from_item() {
    let user = User { email: "dan@example.com".to_string(), name: "Dan Draper".to_string(), age: 41 };
    let item = user.to_item();
    assert_eq!(item.get("email"), Some(&AttributeValue::S("dan@example.com".to_string())));
    assert_eq!(item.get("name"), Some(&AttributeValue::S("Dan Draper".to_string())));
    assert_eq!(item.get("age"), Some(&AttributeValue::N("41".to_string())));

    let decoded = User::from_item(&item).unwrap();
    assert_eq!(decoded, user);
}

#[test]
fn from_item_rejects_a_missing_required_field() {
    let mut item: HashMap<String, AttributeValue> = HashMap::new();
    item.insert("email".to_string(), AttributeValue::S("dan@example.com".to_string()));
    item.insert("name".to_string(), AttributeValue::S("Dan Draper".to_string()));
    // `age` missing entirely.
    assert!(User::from_item(&item).is_err());
}

#[test]
fn metadata_records_the_chosen_primary_key() {
    let metadata = User::metadata();
    assert_eq!(metadata.primary_key.partition_key, "email");
    assert_eq!(metadata.primary_key.sort_key.as_deref(), Some("name"));
    assert_eq!(metadata.table_name, "users");
}

#[allow(non_snake_case)]
#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "sessions")]
struct Session {
    #[dynamorm(pk)]
    PK: String,
    #[dynamorm(sk)]
    SK: String,
}

#[test]
fn reserved_pk_sk_names_keep_their_casing_under_camel_case() {
    let session = Session { PK: "USER#1".to_string(), SK: "SESSION#1".to_string() };
    let item = session.to_item();
    // `PK`/`SK` are reserved and kept verbatim rather than lowercased, even
    // though the record's (default) naming convention is camelCase.
    assert!(item.contains_key("PK"));
    assert!(item.contains_key("SK"));
    assert_eq!(Session::from_item(&item).unwrap(), session);
}

#[allow(non_snake_case)]
#[derive(DynamormModel, Debug, PartialEq)]
#[dynamorm(table = "sessions", naming = "snake_case")]
struct SnakeSession {
    #[dynamorm(pk)]
    PK: String,
    #[dynamorm(sk)]
    SK: String,
}

#[test]
fn reserved_pk_sk_names_are_lowercased_under_snake_case() {
    let session = SnakeSession { PK: "USER#1".to_string(), SK: "SESSION#1".to_string() };
    let item = session.to_item();
    assert!(item.contains_key("pk"));
    assert!(item.contains_key("sk"));
    assert_eq!(SnakeSession::from_item(&item).unwrap(), session);
}

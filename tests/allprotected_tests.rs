//! A model whose every non-key attribute is `encrypted`: every field the
//! marshaler produces besides the primary key must round-trip through the
//! provider, and a batch write protects each item independently.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use aws_sdk_dynamodb::types::AttributeValue;

use dynamorm::{batch_create, create, get, DynamormModel, EncryptionProvider, Error};

struct ReverseProvider;

impl EncryptionProvider for ReverseProvider {
    fn encrypt(&self, _field: &str, value: AttributeValue) -> Result<AttributeValue, Error> {
        match value {
            AttributeValue::S(s) => Ok(AttributeValue::S(s.chars().rev().collect())),
            other => Ok(other),
        }
    }

    fn decrypt(&self, field: &str, value: AttributeValue) -> Result<AttributeValue, Error> {
        self.encrypt(field, value)
    }
}

#[derive(DynamormModel, Debug, Clone, PartialEq)]
#[dynamorm(table = "users")]
struct User {
    #[dynamorm(pk)]
    email: String,
    #[dynamorm(encrypted)]
    name: String,
    #[dynamorm(encrypted)]
    dob: String,
}

impl User {
    fn new(email: impl Into<String>, name: impl Into<String>, dob: impl Into<String>) -> Self {
        Self { email: email.into(), name: name.into(), dob: dob.into() }
    }
}

fn executor() -> dynamorm::Executor<common::FakeDynamoDb> {
    common::test_executor(common::FakeDynamoDb::new(&["email"])).with_encryption_provider(Arc::new(ReverseProvider))
}

#[tokio::test]
async fn every_encrypted_field_round_trips_through_the_provider() {
    let executor = executor();
    let value = User::new("dan@coderdan.co", "Dan Draper", "2000-01-10");
    create(&executor, &value).await.unwrap();

    let key: HashMap<String, AttributeValue> = HashMap::from([("email".to_string(), AttributeValue::S("dan@coderdan.co".to_string()))]);
    let loaded: User = get(&executor, key, true).await.unwrap();
    assert_eq!(loaded, value);
}

#[tokio::test]
async fn batch_create_protects_each_item_independently() {
    let executor = executor();
    let values = vec![
        User::new("dan@coderdan.co", "Dan Draper", "2000-01-10"),
        User::new("jane@smith.org", "Jane Smith", "1990-02-20"),
    ];

    let result = batch_create(&executor, &values).await.unwrap();
    assert_eq!(result.succeeded, 2);
    assert!(result.unprocessed.is_empty());

    for value in &values {
        let key: HashMap<String, AttributeValue> = HashMap::from([("email".to_string(), AttributeValue::S(value.email.clone()))]);
        let loaded: User = get(&executor, key, true).await.unwrap();
        assert_eq!(&loaded, value);
    }
}

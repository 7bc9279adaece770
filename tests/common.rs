//! Shared test harness: an in-memory stand-in for DynamoDB behind the
//! `DynamoDbOps` trait, following the same pattern the executor's own
//! unit tests use internally (`FakeOps`) so integration tests don't need
//! a live table or localstack.
//!
//! Query/Scan/Update/BatchGet/TransactWrite aren't exercised through this
//! fake -- faithfully reproducing DynamoDB's expression-string semantics
//! client-side would just be a second implementation of the expression
//! builder, and those paths already have direct unit coverage. Tests that
//! need those verbs exercise `Query::compile()` / `UpdateBuilder::compile()`
//! directly instead of running them through an `Executor`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use aws_sdk_dynamodb::operation::batch_get_item::{BatchGetItemError, BatchGetItemOutput};
use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemError, BatchWriteItemOutput};
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemError, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemError, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryError, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanError, ScanOutput};
use aws_sdk_dynamodb::operation::transact_write_items::{TransactWriteItemsError, TransactWriteItemsOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
use aws_sdk_dynamodb::types::{AttributeValue, KeysAndAttributes, TransactWriteItem, WriteRequest};

use dynamorm::{DynamoDbOps, Executor, ResourceGuard, ResourceGuardConfig, RetryPolicy};

pub type Item = HashMap<String, AttributeValue>;

fn attr_repr(value: &AttributeValue) -> String {
    match value {
        AttributeValue::S(s) => format!("S:{s}"),
        AttributeValue::N(n) => format!("N:{n}"),
        AttributeValue::Bool(b) => format!("BOOL:{b}"),
        AttributeValue::B(b) => format!("B:{:?}", b.as_ref()),
        other => format!("{other:?}"),
    }
}

/// Backs a fake table keyed by whichever attributes `key_attrs` names --
/// e.g. `&["id"]` for a single partition key, `&["pk", "sk"]` for a
/// composite one. Lookups for `get_item`/`delete_item` build the same
/// representation from the key map the Executor passes in.
pub struct FakeDynamoDb {
    key_attrs: Vec<String>,
    items: Mutex<HashMap<String, Item>>,
    put_conditions: Mutex<Vec<Option<String>>>,
    delete_conditions: Mutex<Vec<Option<String>>>,
    batch_write_calls: std::sync::atomic::AtomicUsize,
    /// Requests to echo back as `UnprocessedItems` exactly once, so a test
    /// can exercise the executor's batch-write retry loop.
    unprocessed_once: Mutex<Vec<WriteRequest>>,
}

impl FakeDynamoDb {
    pub fn new(key_attrs: &[&str]) -> Self {
        Self {
            key_attrs: key_attrs.iter().map(|s| s.to_string()).collect(),
            items: Mutex::new(HashMap::new()),
            put_conditions: Mutex::new(Vec::new()),
            delete_conditions: Mutex::new(Vec::new()),
            batch_write_calls: std::sync::atomic::AtomicUsize::new(0),
            unprocessed_once: Mutex::new(Vec::new()),
        }
    }

    /// Makes the next `batch_write_item` call report `count` unprocessed
    /// placeholder requests, so the caller's retry loop has something to
    /// resubmit.
    pub fn fail_next_batch_write(&self, count: usize) {
        *self.unprocessed_once.lock().unwrap() =
            (0..count).map(|_| WriteRequest::builder().build()).collect();
    }

    fn key_of(&self, item: &Item) -> String {
        self.key_attrs
            .iter()
            .map(|attr| format!("{attr}={}", item.get(attr).map(attr_repr).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn seed(&self, item: Item) {
        let key = self.key_of(&item);
        self.items.lock().unwrap().insert(key, item);
    }

    pub fn get(&self, key: &Item) -> Option<Item> {
        self.items.lock().unwrap().get(&self.key_of(key)).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn last_put_condition(&self) -> Option<String> {
        self.put_conditions.lock().unwrap().last().cloned().flatten()
    }

    pub fn last_delete_condition(&self) -> Option<String> {
        self.delete_conditions.lock().unwrap().last().cloned().flatten()
    }

    pub fn batch_write_call_count(&self) -> usize {
        self.batch_write_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DynamoDbOps for FakeDynamoDb {
    async fn get_item(
        &self,
        _table_name: &str,
        key: Item,
        _consistent_read: bool,
    ) -> Result<GetItemOutput, aws_sdk_dynamodb::error::SdkError<GetItemError>> {
        Ok(GetItemOutput::builder().set_item(self.get(&key)).build())
    }

    async fn put_item(
        &self,
        _table_name: &str,
        item: Item,
        condition_expression: Option<String>,
        _names: Option<HashMap<String, String>>,
        _values: Option<HashMap<String, AttributeValue>>,
    ) -> Result<PutItemOutput, aws_sdk_dynamodb::error::SdkError<PutItemError>> {
        self.put_conditions.lock().unwrap().push(condition_expression);
        let key = self.key_of(&item);
        self.items.lock().unwrap().insert(key, item);
        Ok(PutItemOutput::builder().build())
    }

    async fn update_item(
        &self,
        _table_name: &str,
        _key: Item,
        _update_expression: String,
        _condition_expression: Option<String>,
        _names: Option<HashMap<String, String>>,
        _values: Option<HashMap<String, AttributeValue>>,
        _return_values: Option<aws_sdk_dynamodb::types::ReturnValue>,
    ) -> Result<UpdateItemOutput, aws_sdk_dynamodb::error::SdkError<UpdateItemError>> {
        unimplemented!("not exercised by this fake; see the module doc comment")
    }

    async fn delete_item(
        &self,
        _table_name: &str,
        key: Item,
        condition_expression: Option<String>,
        _names: Option<HashMap<String, String>>,
        _values: Option<HashMap<String, AttributeValue>>,
    ) -> Result<DeleteItemOutput, aws_sdk_dynamodb::error::SdkError<DeleteItemError>> {
        self.delete_conditions.lock().unwrap().push(condition_expression);
        self.items.lock().unwrap().remove(&self.key_of(&key));
        Ok(DeleteItemOutput::builder().build())
    }

    async fn query(
        &self,
        _table_name: &str,
        _index_name: Option<String>,
        _key_condition_expression: String,
        _filter_expression: Option<String>,
        _projection_expression: Option<String>,
        _names: Option<HashMap<String, String>>,
        _values: Option<HashMap<String, AttributeValue>>,
        _exclusive_start_key: Option<Item>,
        _limit: Option<i32>,
        _scan_index_forward: Option<bool>,
    ) -> Result<QueryOutput, aws_sdk_dynamodb::error::SdkError<QueryError>> {
        unimplemented!("not exercised by this fake; see the module doc comment")
    }

    async fn scan(
        &self,
        _table_name: &str,
        _index_name: Option<String>,
        _filter_expression: Option<String>,
        _projection_expression: Option<String>,
        _names: Option<HashMap<String, String>>,
        _values: Option<HashMap<String, AttributeValue>>,
        _exclusive_start_key: Option<Item>,
        _limit: Option<i32>,
        _segment: Option<i32>,
        _total_segments: Option<i32>,
    ) -> Result<ScanOutput, aws_sdk_dynamodb::error::SdkError<ScanError>> {
        unimplemented!("not exercised by this fake; see the module doc comment")
    }

    async fn batch_get_item(
        &self,
        _table_name: &str,
        _keys_and_attributes: KeysAndAttributes,
    ) -> Result<BatchGetItemOutput, aws_sdk_dynamodb::error::SdkError<BatchGetItemError>> {
        unimplemented!("not exercised by this fake; see the module doc comment")
    }

    async fn batch_write_item(
        &self,
        table_name: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<BatchWriteItemOutput, aws_sdk_dynamodb::error::SdkError<BatchWriteItemError>> {
        self.batch_write_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut unprocessed_once = self.unprocessed_once.lock().unwrap();
        let carry_over: Vec<WriteRequest> = requests.iter().take(unprocessed_once.len()).cloned().collect();
        unprocessed_once.clear();
        Ok(BatchWriteItemOutput::builder().unprocessed_items(table_name, carry_over).build())
    }

    async fn transact_write_items(
        &self,
        _items: Vec<TransactWriteItem>,
    ) -> Result<TransactWriteItemsOutput, aws_sdk_dynamodb::error::SdkError<TransactWriteItemsError>> {
        unimplemented!("not exercised by this fake; see the module doc comment")
    }
}

pub fn test_executor(ops: FakeDynamoDb) -> Executor<FakeDynamoDb> {
    Executor::with_ops(ops, RetryPolicy::default(), ResourceGuard::new(ResourceGuardConfig::default()))
}

//! The small surface the Executor needs from a DynamoDB client, abstracted
//! behind a trait so tests can run against an in-crate fake instead of a
//! live table.

use aws_sdk_dynamodb::operation::batch_get_item::{BatchGetItemError, BatchGetItemOutput};
use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemError, BatchWriteItemOutput};
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemError, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemError, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryError, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanError, ScanOutput};
use aws_sdk_dynamodb::operation::transact_write_items::{TransactWriteItemsError, TransactWriteItemsOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
use aws_sdk_dynamodb::types::{KeysAndAttributes, TransactWriteItem, WriteRequest};
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

use crate::marshal::Item;

/// Request/response shapes are the real SDK types; only the transport is
/// abstracted, so callers building requests still use the real
/// `aws-sdk-dynamodb` builders end to end.
#[async_trait::async_trait]
pub trait DynamoDbOps: Send + Sync {
    async fn get_item(
        &self,
        table_name: &str,
        key: Item,
        consistent_read: bool,
    ) -> Result<GetItemOutput, aws_sdk_dynamodb::error::SdkError<GetItemError>>;

    async fn put_item(
        &self,
        table_name: &str,
        item: Item,
        condition_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
    ) -> Result<PutItemOutput, aws_sdk_dynamodb::error::SdkError<PutItemError>>;

    #[allow(clippy::too_many_arguments)]
    async fn update_item(
        &self,
        table_name: &str,
        key: Item,
        update_expression: String,
        condition_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
        return_values: Option<aws_sdk_dynamodb::types::ReturnValue>,
    ) -> Result<UpdateItemOutput, aws_sdk_dynamodb::error::SdkError<UpdateItemError>>;

    async fn delete_item(
        &self,
        table_name: &str,
        key: Item,
        condition_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
    ) -> Result<DeleteItemOutput, aws_sdk_dynamodb::error::SdkError<DeleteItemError>>;

    #[allow(clippy::too_many_arguments)]
    async fn query(
        &self,
        table_name: &str,
        index_name: Option<String>,
        key_condition_expression: String,
        filter_expression: Option<String>,
        projection_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
        exclusive_start_key: Option<Item>,
        limit: Option<i32>,
        scan_index_forward: Option<bool>,
    ) -> Result<QueryOutput, aws_sdk_dynamodb::error::SdkError<QueryError>>;

    #[allow(clippy::too_many_arguments)]
    async fn scan(
        &self,
        table_name: &str,
        index_name: Option<String>,
        filter_expression: Option<String>,
        projection_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
        exclusive_start_key: Option<Item>,
        limit: Option<i32>,
        segment: Option<i32>,
        total_segments: Option<i32>,
    ) -> Result<ScanOutput, aws_sdk_dynamodb::error::SdkError<ScanError>>;

    async fn batch_get_item(
        &self,
        table_name: &str,
        keys_and_attributes: KeysAndAttributes,
    ) -> Result<BatchGetItemOutput, aws_sdk_dynamodb::error::SdkError<BatchGetItemError>>;

    async fn batch_write_item(
        &self,
        table_name: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<BatchWriteItemOutput, aws_sdk_dynamodb::error::SdkError<BatchWriteItemError>>;

    async fn transact_write_items(
        &self,
        items: Vec<TransactWriteItem>,
    ) -> Result<TransactWriteItemsOutput, aws_sdk_dynamodb::error::SdkError<TransactWriteItemsError>>;
}

pub struct LiveDynamoDb {
    pub client: Client,
}

#[async_trait::async_trait]
impl DynamoDbOps for LiveDynamoDb {
    async fn get_item(
        &self,
        table_name: &str,
        key: Item,
        consistent_read: bool,
    ) -> Result<GetItemOutput, aws_sdk_dynamodb::error::SdkError<GetItemError>> {
        self.client
            .get_item()
            .table_name(table_name)
            .set_key(Some(key))
            .consistent_read(consistent_read)
            .send()
            .await
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: Item,
        condition_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
    ) -> Result<PutItemOutput, aws_sdk_dynamodb::error::SdkError<PutItemError>> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .send()
            .await
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: Item,
        update_expression: String,
        condition_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
        return_values: Option<aws_sdk_dynamodb::types::ReturnValue>,
    ) -> Result<UpdateItemOutput, aws_sdk_dynamodb::error::SdkError<UpdateItemError>> {
        self.client
            .update_item()
            .table_name(table_name)
            .set_key(Some(key))
            .update_expression(update_expression)
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .set_return_values(return_values)
            .send()
            .await
    }

    async fn delete_item(
        &self,
        table_name: &str,
        key: Item,
        condition_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
    ) -> Result<DeleteItemOutput, aws_sdk_dynamodb::error::SdkError<DeleteItemError>> {
        self.client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(key))
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .send()
            .await
    }

    async fn query(
        &self,
        table_name: &str,
        index_name: Option<String>,
        key_condition_expression: String,
        filter_expression: Option<String>,
        projection_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
        exclusive_start_key: Option<Item>,
        limit: Option<i32>,
        scan_index_forward: Option<bool>,
    ) -> Result<QueryOutput, aws_sdk_dynamodb::error::SdkError<QueryError>> {
        self.client
            .query()
            .table_name(table_name)
            .set_index_name(index_name)
            .key_condition_expression(key_condition_expression)
            .set_filter_expression(filter_expression)
            .set_projection_expression(projection_expression)
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .set_exclusive_start_key(exclusive_start_key)
            .set_limit(limit)
            .set_scan_index_forward(scan_index_forward)
            .send()
            .await
    }

    async fn scan(
        &self,
        table_name: &str,
        index_name: Option<String>,
        filter_expression: Option<String>,
        projection_expression: Option<String>,
        expression_attribute_names: Option<HashMap<String, String>>,
        expression_attribute_values: Option<HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
        exclusive_start_key: Option<Item>,
        limit: Option<i32>,
        segment: Option<i32>,
        total_segments: Option<i32>,
    ) -> Result<ScanOutput, aws_sdk_dynamodb::error::SdkError<ScanError>> {
        self.client
            .scan()
            .table_name(table_name)
            .set_index_name(index_name)
            .set_filter_expression(filter_expression)
            .set_projection_expression(projection_expression)
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .set_exclusive_start_key(exclusive_start_key)
            .set_limit(limit)
            .set_segment(segment)
            .set_total_segments(total_segments)
            .send()
            .await
    }

    async fn batch_get_item(
        &self,
        table_name: &str,
        keys_and_attributes: KeysAndAttributes,
    ) -> Result<BatchGetItemOutput, aws_sdk_dynamodb::error::SdkError<BatchGetItemError>> {
        self.client
            .batch_get_item()
            .request_items(table_name, keys_and_attributes)
            .send()
            .await
    }

    async fn batch_write_item(
        &self,
        table_name: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<BatchWriteItemOutput, aws_sdk_dynamodb::error::SdkError<BatchWriteItemError>> {
        self.client
            .batch_write_item()
            .request_items(table_name, requests)
            .send()
            .await
    }

    async fn transact_write_items(
        &self,
        items: Vec<TransactWriteItem>,
    ) -> Result<TransactWriteItemsOutput, aws_sdk_dynamodb::error::SdkError<TransactWriteItemsError>> {
        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
    }
}

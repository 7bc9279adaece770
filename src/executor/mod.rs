//! The executor (C9): the only component in this crate that issues
//! DynamoDB requests. Every verb takes compiled input from the Query
//! Compiler (C7) or Update Builder (C10), threads it through the
//! [`ResourceGuard`](crate::resource_guard::ResourceGuard), and maps the
//! SDK's own error shapes down to this crate's [`Error`] taxonomy.

mod dynamo_ops;
mod retry;

pub use dynamo_ops::{DynamoDbOps, LiveDynamoDb};
pub use retry::RetryPolicy;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use aws_sdk_dynamodb::types::{
    AttributeValue, ConditionCheck, Delete, Put, TransactWriteItem, Update, WriteRequest,
};
use aws_sdk_dynamodb::Client;

use crate::encryption::EncryptionProvider;
use crate::error::Error;
use crate::marshal::{Item, Marshal};
use crate::query::{CompiledQuery, Operation, Select};
use crate::registry::Model;
use crate::resource_guard::{ResourceGuard, ResourceGuardConfig};
use crate::update::CompiledUpdate;

const BATCH_GET_CHUNK: usize = 100;
const BATCH_WRITE_CHUNK: usize = 25;

/// One page of a `Query`/`Scan`, matching `allPaginated`'s contract:
/// `{items, count, scannedCount, lastEvaluatedKey, nextCursor, hasMore}`.
#[derive(Debug)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub scanned_count: usize,
    pub last_evaluated_key: Option<HashMap<String, AttributeValue>>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Result of a `batchGet`: items that resolved, plus any keys DynamoDB
/// never got to within the configured retry budget.
#[derive(Debug)]
pub struct BatchGetResult<T> {
    pub items: Vec<T>,
    pub unprocessed_keys: Vec<HashMap<String, AttributeValue>>,
}

/// Result of a `batchWrite`. `BatchOperationFailed` is only returned (as
/// an `Err`) when items remain unprocessed after exhausting the retry
/// budget; a partial success within budget is not an error.
#[derive(Debug, Default)]
pub struct BatchWriteResult {
    pub succeeded: usize,
    pub unprocessed: Vec<WriteRequest>,
}

#[derive(Debug, Clone)]
pub enum WriteOp {
    Put(Item),
    Delete(HashMap<String, AttributeValue>),
}

/// One item of a `TransactWriteItems` call.
pub enum TransactOp {
    Put { table_name: String, item: Item, if_not_exists_on: Option<String> },
    Update { table_name: String, update: CompiledUpdate },
    Delete { table_name: String, key: HashMap<String, AttributeValue>, condition: Option<String> },
    ConditionCheck { table_name: String, key: HashMap<String, AttributeValue>, condition: String },
}

/// Orchestrates Get/Put/Update/Delete/Query/Scan/BatchGet/BatchWrite/
/// TransactWriteItems. Generic over the transport (`D: DynamoDbOps`) so
/// tests can substitute an in-crate fake; `Executor<LiveDynamoDb>` is what
/// application code actually constructs.
#[derive(Clone)]
pub struct Executor<D: DynamoDbOps = LiveDynamoDb> {
    ops: Arc<D>,
    retry: RetryPolicy,
    guard: ResourceGuard,
    encryption: Option<Arc<dyn EncryptionProvider>>,
    deadline: Option<Instant>,
    safety_margin: Duration,
}

impl Executor<LiveDynamoDb> {
    pub fn new(client: Client) -> Self {
        Self::with_ops(LiveDynamoDb { client }, RetryPolicy::default(), ResourceGuard::new(ResourceGuardConfig::default()))
    }
}

impl<D: DynamoDbOps> Executor<D> {
    pub fn with_ops(ops: D, retry: RetryPolicy, guard: ResourceGuard) -> Self {
        Self {
            ops: Arc::new(ops),
            retry,
            guard,
            encryption: None,
            deadline: None,
            safety_margin: Duration::from_millis(25),
        }
    }

    /// Attaches the encryption provider consulted for `encrypted`-tagged
    /// fields. Without one, models carrying such a field fail closed with
    /// `EncryptionNotConfigured` rather than storing plaintext.
    pub fn with_encryption_provider(mut self, provider: Arc<dyn EncryptionProvider>) -> Self {
        self.encryption = Some(provider);
        self
    }

    /// Attaches the remaining budget of a serverless invocation:
    /// every verb checks this before issuing its request and returns
    /// `DeadlineExceeded` early rather than dispatching with essentially no
    /// time left to complete. `margin` is subtracted from `deadline` up
    /// front so the check itself has a safety buffer.
    pub fn with_deadline(mut self, deadline: Instant, margin: Duration) -> Self {
        self.deadline = Some(deadline);
        self.safety_margin = margin;
        self
    }

    /// Returns `DeadlineExceeded` if a deadline is attached and the
    /// remaining budget (after subtracting the safety margin) has already
    /// run out. Called at the top of every verb, before the resource guard
    /// is consulted or any request is built.
    fn check_deadline(&self) -> Result<(), Error> {
        match crate::resource_guard::remaining_budget(self.deadline, self.safety_margin) {
            Some(remaining) if remaining.is_zero() => Err(Error::DeadlineExceeded(
                "insufficient time remaining in the caller's invocation budget".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Encrypts every `encrypted`-tagged attribute present in `item`,
    /// in place. Exposed so callers assembling an item outside of
    /// [`Self::put_item`] (batch writes, transactions) can apply the same
    /// protection before handing it to the executor.
    pub fn protect<T: Model>(&self, item: &mut Item) -> Result<(), Error> {
        crate::encryption::protect_item(item, &T::metadata(), self.encryption.as_deref())
    }

    fn reveal<T: Model>(&self, item: &mut Item) -> Result<(), Error> {
        crate::encryption::reveal_item(item, &T::metadata(), self.encryption.as_deref())
    }

    /// GetItem: strongly consistent by default for primary-table lookups.
    /// `ItemNotFound` on an empty response.
    pub async fn get_item<T: Marshal + Model>(
        &self,
        table_name: &str,
        key: HashMap<String, AttributeValue>,
        consistent_read: bool,
    ) -> Result<T, Error> {
        self.check_deadline()?;
        let _permit = self.guard.admit_request(item_size(&key)).await?;
        let output = self
            .ops
            .get_item(table_name, key, consistent_read)
            .await
            .map_err(map_sdk_error)?;
        let mut item = output.item.ok_or(Error::ItemNotFound)?;
        self.reveal::<T>(&mut item)?;
        T::from_item(&item)
    }

    /// PutItem. `create_only` adds `attribute_not_exists(pk)` as the
    /// condition; a version field is started at 0 unless already present
    /// in `item` (it never is, on create -- the derive-generated
    /// `to_item` always emits it, so this only guards hand-built items).
    pub async fn put_item(
        &self,
        table_name: &str,
        mut item: Item,
        pk_attribute: &str,
        version_field: Option<&str>,
        created_at_field: Option<&str>,
        updated_at_field: Option<&str>,
        create_only: bool,
    ) -> Result<(), Error> {
        self.check_deadline()?;
        let now = crate::marshal::encode_timestamp(&aws_sdk_dynamodb::primitives::DateTime::from(
            std::time::SystemTime::now(),
        ));

        if let Some(field) = version_field {
            item.entry(field.to_string()).or_insert(AttributeValue::N("0".to_string()));
        }
        if let Some(field) = created_at_field {
            item.insert(field.to_string(), now.clone());
        }
        if let Some(field) = updated_at_field {
            item.insert(field.to_string(), now);
        }

        let (condition_expression, attribute_names) = if create_only {
            let placeholder = "#pk_guard".to_string();
            (
                Some(format!("attribute_not_exists({placeholder})")),
                Some(HashMap::from([(placeholder, pk_attribute.to_string())])),
            )
        } else {
            (None, None)
        };

        let _permit = self.guard.admit_request(item_size(&item)).await?;
        self.ops
            .put_item(table_name, item, condition_expression, attribute_names, None)
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    /// UpdateItem from a compiled [`CompiledUpdate`]. Maps
    /// `ConditionalCheckFailedException` (version mismatch or an explicit
    /// `conditionExists`/`conditionNotExists`) to `ConditionFailed`.
    pub async fn update_item<T: Marshal + Model>(&self, compiled: CompiledUpdate) -> Result<Option<T>, Error> {
        self.check_deadline()?;
        let _permit = self.guard.admit_request(item_size(&compiled.key)).await?;
        let output = self
            .ops
            .update_item(
                &compiled.table_name,
                compiled.key,
                compiled.update_expression,
                compiled.condition_expression,
                Some(compiled.attribute_names),
                Some(compiled.attribute_values),
                Some(compiled.return_values),
            )
            .await
            .map_err(map_sdk_error)?;

        match output.attributes {
            Some(mut attrs) if !attrs.is_empty() => {
                self.reveal::<T>(&mut attrs)?;
                Ok(Some(T::from_item(&attrs)?))
            }
            _ => Ok(None),
        }
    }

    pub async fn delete_item(
        &self,
        table_name: &str,
        key: HashMap<String, AttributeValue>,
        condition_expression: Option<String>,
        attribute_names: Option<HashMap<String, String>>,
        attribute_values: Option<HashMap<String, AttributeValue>>,
    ) -> Result<(), Error> {
        self.check_deadline()?;
        let _permit = self.guard.admit_request(item_size(&key)).await?;
        self.ops
            .delete_item(table_name, key, condition_expression, attribute_names, attribute_values)
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    /// Executes one `CompiledQuery`, dispatching to `Query` or `Scan`
    /// (`GetItem` is handled by callers directly through [`Self::get_item`]
    /// since it needs a typed target, not a page). Offset is honored
    /// client-side, skipping results beyond the requested key bounds.
    pub async fn run<T: Marshal + Model>(&self, compiled: CompiledQuery) -> Result<PageResult<T>, Error> {
        self.check_deadline()?;
        let _permit = self.guard.admit_request(1).await?;

        let (items, returned_count, scanned_count, last_evaluated_key) = match compiled.operation {
            Operation::Scan => {
                let output = self
                    .ops
                    .scan(
                        &compiled.table_name,
                        compiled.index_name.clone(),
                        compiled.filter.clone(),
                        compiled.projection.clone(),
                        Some(compiled.attribute_names.clone()),
                        Some(compiled.attribute_values.clone()),
                        compiled.exclusive_start_key.clone(),
                        compiled.limit,
                        compiled.segment,
                        compiled.total_segments,
                    )
                    .await
                    .map_err(map_sdk_error)?;
                (
                    output.items.unwrap_or_default(),
                    output.count as usize,
                    output.scanned_count as usize,
                    output.last_evaluated_key,
                )
            }
            Operation::Query => {
                let output = self
                    .ops
                    .query(
                        &compiled.table_name,
                        compiled.index_name.clone(),
                        compiled.key_condition.clone().ok_or_else(|| {
                            Error::InvalidOperator(crate::error::InvalidOperator {
                                field: String::new(),
                                operator: "Query".to_string(),
                                reason: "a Query requires a key condition expression".to_string(),
                            })
                        })?,
                        compiled.filter.clone(),
                        compiled.projection.clone(),
                        Some(compiled.attribute_names.clone()),
                        Some(compiled.attribute_values.clone()),
                        compiled.exclusive_start_key.clone(),
                        compiled.limit,
                        compiled.scan_index_forward,
                    )
                    .await
                    .map_err(map_sdk_error)?;
                (
                    output.items.unwrap_or_default(),
                    output.count as usize,
                    output.scanned_count as usize,
                    output.last_evaluated_key,
                )
            }
            Operation::GetItem => {
                return Err(Error::InvalidOperator(crate::error::InvalidOperator {
                    field: String::new(),
                    operator: "GetItem".to_string(),
                    reason: "GetItem is not a paginated operation; use Executor::get_item".to_string(),
                }))
            }
        };

        let skip = compiled.offset;
        let mut decoded = Vec::with_capacity(items.len().saturating_sub(skip));
        for (i, item) in items.into_iter().enumerate() {
            if i < skip {
                continue;
            }
            if compiled.select == Select::Count {
                continue;
            }
            let mut item = item;
            self.reveal::<T>(&mut item)?;
            decoded.push(T::from_item(&item)?);
        }

        let next_cursor = match &last_evaluated_key {
            Some(key) if !key.is_empty() => Some(
                crate::cursor::Cursor {
                    last_key: key.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                    index: compiled.index_name.clone(),
                    sort: compiled.scan_index_forward.map(|asc| {
                        if asc {
                            crate::cursor::SortDirection::Ascending
                        } else {
                            crate::cursor::SortDirection::Descending
                        }
                    }),
                }
                .encode()
                .map_err(|e| Error::InvalidTag(e.to_string()))?,
            ),
            _ => None,
        };

        let has_more = next_cursor.is_some();
        let count = if compiled.select == Select::Count { returned_count } else { decoded.len() };

        Ok(PageResult {
            count,
            items: decoded,
            scanned_count,
            last_evaluated_key,
            next_cursor,
            has_more,
        })
    }

    /// Fans a `Scan` out across `total_segments` cooperative tasks -- one
    /// `CompiledQuery` per segment -- and merges results deterministically
    /// by concatenating per-segment streams in segment order.
    pub async fn scan_all_segments<T: Marshal + Model>(
        &self,
        base: CompiledQuery,
        total_segments: i32,
    ) -> Result<Vec<T>, Error> {
        let futures = (0..total_segments).map(|segment| {
            let mut compiled = clone_query(&base);
            compiled.segment = Some(segment);
            compiled.total_segments = Some(total_segments);
            self.run::<T>(compiled)
        });

        let mut all_items = Vec::new();
        for page in futures::future::join_all(futures).await {
            all_items.extend(page?.items);
        }
        Ok(all_items)
    }

    /// Chunks `keys` into `<=100`-item `BatchGetItem` requests, retrying
    /// `UnprocessedKeys` with the configured [`RetryPolicy`].
    pub async fn batch_get_item<T: Marshal + Model>(
        &self,
        table_name: &str,
        keys: Vec<HashMap<String, AttributeValue>>,
        projection_expression: Option<String>,
        attribute_names: Option<HashMap<String, String>>,
        consistent_read: bool,
    ) -> Result<BatchGetResult<T>, Error> {
        self.check_deadline()?;
        let chunks: Vec<_> = keys.chunks(BATCH_GET_CHUNK).map(|c| c.to_vec()).collect();
        let _batch_permit = self.guard.admit_batch(chunks.len() as u64)?;

        let mut items = Vec::new();
        let mut unprocessed_keys = Vec::new();

        for chunk in chunks {
            let mut pending = chunk;
            let mut attempt = 0;

            loop {
                if pending.is_empty() {
                    break;
                }

                let request = aws_sdk_dynamodb::types::KeysAndAttributes::builder()
                    .set_keys(Some(pending.clone()))
                    .set_projection_expression(projection_expression.clone())
                    .set_expression_attribute_names(attribute_names.clone())
                    .consistent_read(consistent_read)
                    .build()
                    .map_err(|e| Error::Dynamo(e.to_string()))?;

                let output = self
                    .ops
                    .batch_get_item(table_name, request)
                    .await
                    .map_err(map_sdk_error)?;

                if let Some(mut responses) = output.responses {
                    if let Some(returned) = responses.remove(table_name) {
                        for mut raw in returned {
                            self.reveal::<T>(&mut raw)?;
                            items.push(T::from_item(&raw)?);
                        }
                    }
                }

                pending = output
                    .unprocessed_keys
                    .and_then(|mut m| m.remove(table_name))
                    .map(|k| k.keys)
                    .unwrap_or_default();

                if pending.is_empty() {
                    break;
                }
                attempt += 1;
                if attempt >= self.retry.max_attempts {
                    unprocessed_keys.extend(pending);
                    break;
                }
                tokio::time::sleep(self.retry.delay_for(attempt)).await;
            }
        }

        Ok(BatchGetResult { items, unprocessed_keys })
    }

    /// Chunks `ops` into `<=25`-item `BatchWriteItem` requests (mixed puts
    /// and deletes allowed in one chunk), retrying `UnprocessedItems`.
    /// Surfaces `BatchOperationFailed` only if items remain unprocessed
    /// after exhausting the retry budget.
    pub async fn batch_write_item(&self, table_name: &str, ops: Vec<WriteOp>) -> Result<BatchWriteResult, Error> {
        self.check_deadline()?;
        let total = ops.len();
        let requests: Vec<WriteRequest> = ops.into_iter().map(to_write_request).collect();
        let chunks: Vec<_> = requests.chunks(BATCH_WRITE_CHUNK).map(|c| c.to_vec()).collect();
        let _batch_permit = self.guard.admit_batch(chunks.len() as u64)?;

        let mut result = BatchWriteResult::default();

        for chunk in chunks {
            let mut pending = chunk;
            let mut attempt = 0;

            loop {
                if pending.is_empty() {
                    break;
                }

                let output = self
                    .ops
                    .batch_write_item(table_name, pending.clone())
                    .await
                    .map_err(map_sdk_error)?;

                let still_unprocessed = output
                    .unprocessed_items
                    .and_then(|mut m| m.remove(table_name))
                    .unwrap_or_default();

                result.succeeded += pending.len() - still_unprocessed.len();
                pending = still_unprocessed;

                if pending.is_empty() {
                    break;
                }
                attempt += 1;
                if attempt >= self.retry.max_attempts {
                    result.unprocessed.extend(pending);
                    break;
                }
                tokio::time::sleep(self.retry.delay_for(attempt)).await;
            }
        }

        if !result.unprocessed.is_empty() {
            return Err(Error::BatchOperationFailed {
                succeeded: result.succeeded,
                failed: result.unprocessed.len(),
                unprocessed: result.unprocessed.len(),
            });
        }

        debug_assert_eq!(result.succeeded, total);
        Ok(result)
    }

    /// TransactWriteItems: up to 100 operations, atomic. A
    /// `TransactionCanceled` response (any check failed) is mapped to
    /// `ConditionFailed`, naming the first failing operation's index.
    pub async fn transact_write_items(&self, ops: Vec<TransactOp>) -> Result<(), Error> {
        self.check_deadline()?;
        let _batch_permit = self.guard.admit_batch(1)?;

        let items = ops
            .into_iter()
            .map(to_transact_item)
            .collect::<Result<Vec<_>, Error>>()?;

        self.ops.transact_write_items(items).await.map_err(|err| match err {
            aws_sdk_dynamodb::error::SdkError::ServiceError(service_err) => {
                let transact_err = service_err.into_err();
                if let aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError::TransactionCanceledException(e) = &transact_err {
                    let reasons = e
                        .cancellation_reasons
                        .as_deref()
                        .unwrap_or_default()
                        .iter()
                        .enumerate()
                        .filter(|(_, r)| r.code.as_deref() != Some("None"))
                        .map(|(i, r)| format!("[{i}] {}", r.message.clone().unwrap_or_default()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Error::ConditionFailed(format!("transaction canceled: {reasons}"));
                }
                Error::TransactionFailed(transact_err.to_string())
            }
            other => Error::Dynamo(other.to_string()),
        })?;

        Ok(())
    }
}

fn to_write_request(op: WriteOp) -> WriteRequest {
    match op {
        WriteOp::Put(item) => WriteRequest::builder()
            .put_request(aws_sdk_dynamodb::types::PutRequest::builder().set_item(Some(item)).build().expect("item"))
            .build(),
        WriteOp::Delete(key) => WriteRequest::builder()
            .delete_request(aws_sdk_dynamodb::types::DeleteRequest::builder().set_key(Some(key)).build().expect("key"))
            .build(),
    }
}

fn to_transact_item(op: TransactOp) -> Result<TransactWriteItem, Error> {
    Ok(match op {
        TransactOp::Put { table_name, item, if_not_exists_on } => {
            let mut builder = Put::builder().table_name(table_name).set_item(Some(item));
            if let Some(pk) = if_not_exists_on {
                builder = builder
                    .condition_expression("attribute_not_exists(#pk_guard)")
                    .expression_attribute_names("#pk_guard", pk);
            }
            TransactWriteItem::builder()
                .put(builder.build().map_err(|e| Error::Dynamo(e.to_string()))?)
                .build()
        }
        TransactOp::Update { table_name, update } => TransactWriteItem::builder()
            .update(
                Update::builder()
                    .table_name(table_name)
                    .set_key(Some(update.key))
                    .update_expression(update.update_expression)
                    .set_condition_expression(update.condition_expression)
                    .set_expression_attribute_names(Some(update.attribute_names))
                    .set_expression_attribute_values(Some(update.attribute_values))
                    .build()
                    .map_err(|e| Error::Dynamo(e.to_string()))?,
            )
            .build(),
        TransactOp::Delete { table_name, key, condition } => TransactWriteItem::builder()
            .delete(
                Delete::builder()
                    .table_name(table_name)
                    .set_key(Some(key))
                    .set_condition_expression(condition)
                    .build()
                    .map_err(|e| Error::Dynamo(e.to_string()))?,
            )
            .build(),
        TransactOp::ConditionCheck { table_name, key, condition } => TransactWriteItem::builder()
            .condition_check(
                ConditionCheck::builder()
                    .table_name(table_name)
                    .set_key(Some(key))
                    .condition_expression(condition)
                    .build()
                    .map_err(|e| Error::Dynamo(e.to_string()))?,
            )
            .build(),
    })
}

fn clone_query(query: &CompiledQuery) -> CompiledQuery {
    CompiledQuery {
        operation: query.operation,
        table_name: query.table_name.clone(),
        index_name: query.index_name.clone(),
        key_condition: query.key_condition.clone(),
        filter: query.filter.clone(),
        projection: query.projection.clone(),
        attribute_names: query.attribute_names.clone(),
        attribute_values: query.attribute_values.clone(),
        limit: query.limit,
        exclusive_start_key: query.exclusive_start_key.clone(),
        scan_index_forward: query.scan_index_forward,
        select: query.select,
        offset: query.offset,
        segment: query.segment,
        total_segments: query.total_segments,
    }
}

/// Rough per-request body size used by the resource guard: the `N`/`S`/`B`
/// payload bytes of every attribute value, ignoring wire framing -- good
/// enough for a guard meant to catch gross oversize, not to bill bytes.
fn item_size(item: &HashMap<String, AttributeValue>) -> usize {
    item.iter().map(|(k, v)| k.len() + attribute_value_size(v)).sum()
}

fn attribute_value_size(value: &AttributeValue) -> usize {
    match value {
        AttributeValue::S(s) => s.len(),
        AttributeValue::N(n) => n.len(),
        AttributeValue::B(b) => b.as_ref().len(),
        AttributeValue::Bool(_) => 1,
        AttributeValue::Null(_) => 1,
        AttributeValue::Ss(v) => v.iter().map(String::len).sum(),
        AttributeValue::Ns(v) => v.iter().map(String::len).sum(),
        AttributeValue::Bs(v) => v.iter().map(|b| b.as_ref().len()).sum(),
        AttributeValue::L(v) => v.iter().map(attribute_value_size).sum(),
        AttributeValue::M(m) => m.iter().map(|(k, v)| k.len() + attribute_value_size(v)).sum(),
        _ => 0,
    }
}

/// Collapses any `SdkError<E>` down to this crate's `Error`, recognizing
/// `ConditionalCheckFailedException` and `ResourceNotFoundException`
/// specially since callers distinguish those from a generic transport
/// failure.
fn map_sdk_error<E>(err: aws_sdk_dynamodb::error::SdkError<E>) -> Error
where
    E: std::error::Error + ProvideErrorName,
{
    match err.as_service_error().map(|e| e.error_name()) {
        Some(name) if name.contains("ConditionalCheckFailed") => {
            Error::ConditionFailed("the condition expression evaluated to false".to_string())
        }
        Some(name) if name.contains("ResourceNotFound") => Error::TableNotFound(name.to_string()),
        _ => Error::Dynamo(err.to_string()),
    }
}

/// Minimal shim so [`map_sdk_error`] can ask any DynamoDB operation error
/// for its exception name without listing every `*Error` type by hand.
trait ProvideErrorName {
    fn error_name(&self) -> String;
}

macro_rules! impl_provide_error_name {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ProvideErrorName for $ty {
                fn error_name(&self) -> String {
                    self.meta().code().unwrap_or("Unknown").to_string()
                }
            }
        )*
    };
}

use aws_sdk_dynamodb::error::ProvideErrorMetadata;

impl_provide_error_name!(
    aws_sdk_dynamodb::operation::get_item::GetItemError,
    aws_sdk_dynamodb::operation::put_item::PutItemError,
    aws_sdk_dynamodb::operation::update_item::UpdateItemError,
    aws_sdk_dynamodb::operation::delete_item::DeleteItemError,
    aws_sdk_dynamodb::operation::query::QueryError,
    aws_sdk_dynamodb::operation::scan::ScanError,
    aws_sdk_dynamodb::operation::batch_get_item::BatchGetItemError,
    aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError,
);

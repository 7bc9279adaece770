//! Model-level entry points that tie the Marshaler (C4), Executor (C9),
//! and Encryption Provider together for the single-item verbs the query
//! compiler's fluent chain doesn't itself cover: `create`, `save`, `get`,
//! and `batch_create`. These are thin: each one resolves `T::metadata()`
//! for the attribute names the Executor needs and otherwise just calls
//! through.

use std::collections::HashMap;

use crate::error::Error;
use crate::executor::{BatchWriteResult, DynamoDbOps, Executor, WriteOp};
use crate::marshal::{AttributeValue, Marshal};
use crate::registry::Model;

/// Inserts `value`, failing with `ConditionFailed` if an item with the
/// same primary key already exists.
pub async fn create<T: Marshal + Model, D: DynamoDbOps>(executor: &Executor<D>, value: &T) -> Result<(), Error> {
    put(executor, value, true).await
}

/// Inserts or overwrites `value` unconditionally.
pub async fn save<T: Marshal + Model, D: DynamoDbOps>(executor: &Executor<D>, value: &T) -> Result<(), Error> {
    put(executor, value, false).await
}

async fn put<T: Marshal + Model, D: DynamoDbOps>(
    executor: &Executor<D>,
    value: &T,
    create_only: bool,
) -> Result<(), Error> {
    let metadata = T::metadata();
    let mut item = value.to_item();
    executor.protect::<T>(&mut item)?;

    executor
        .put_item(
            &metadata.table_name,
            item,
            &metadata.primary_key.partition_key,
            metadata.version_field.as_deref(),
            metadata.created_at_field.as_deref(),
            metadata.updated_at_field.as_deref(),
            create_only,
        )
        .await
}

/// Fetches a single item by its full primary key.
pub async fn get<T: Marshal + Model, D: DynamoDbOps>(
    executor: &Executor<D>,
    key: HashMap<String, AttributeValue>,
    consistent_read: bool,
) -> Result<T, Error> {
    let metadata = T::metadata();
    executor.get_item::<T>(&metadata.table_name, key, consistent_read).await
}

/// Batch-inserts `values` via `BatchWriteItem`, chunked and retried the
/// same way a hand-built `batch_write_item` call would be.
pub async fn batch_create<T: Marshal + Model, D: DynamoDbOps>(
    executor: &Executor<D>,
    values: &[T],
) -> Result<BatchWriteResult, Error> {
    let metadata = T::metadata();
    let mut ops = Vec::with_capacity(values.len());
    for value in values {
        let mut item = value.to_item();
        executor.protect::<T>(&mut item)?;
        ops.push(WriteOp::Put(item));
    }
    executor.batch_write_item(&metadata.table_name, ops).await
}

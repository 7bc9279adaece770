//! The query compiler (C7): a fluent chain that accumulates conditions,
//! ordering, projection, and pagination, then emits one [`CompiledQuery`]
//! consumed exactly once by the [`crate::executor::Executor`].

use std::collections::HashMap;
use std::marker::PhantomData;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::cursor::Cursor;
use crate::error::Error;
use crate::executor::{DynamoDbOps, Executor, PageResult};
use crate::expr::{Condition, ExpressionBuilder, FilterExpr, Joiner, Operator};
use crate::index_selector::{self, KeyCondition};
use crate::marshal::Marshal;
use crate::registry::Model;
use crate::update::UpdateBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetItem,
    Query,
    Scan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Select {
    All,
    Count,
}

/// Emitted once per fluent chain; everything the Executor needs to issue
/// exactly one DynamoDB request (or one request per page).
#[derive(Debug)]
pub struct CompiledQuery {
    pub operation: Operation,
    pub table_name: String,
    pub index_name: Option<String>,
    pub key_condition: Option<String>,
    pub filter: Option<String>,
    pub projection: Option<String>,
    pub attribute_names: HashMap<String, String>,
    pub attribute_values: HashMap<String, AttributeValue>,
    pub limit: Option<i32>,
    pub exclusive_start_key: Option<HashMap<String, AttributeValue>>,
    pub scan_index_forward: Option<bool>,
    pub select: Select,
    pub offset: usize,
    pub segment: Option<i32>,
    pub total_segments: Option<i32>,
}

pub struct Query<T: Model> {
    conditions: Vec<(&'static str, Operator, ConditionInput)>,
    filters: Vec<(Joiner, FilterExpr)>,
    index_override: Option<String>,
    order: Option<(String, bool)>,
    limit: Option<i32>,
    offset: usize,
    cursor_token: Option<String>,
    select: Vec<String>,
    want_count: bool,
    force_scan: bool,
    _marker: PhantomData<T>,
}

enum ConditionInput {
    One(AttributeValue),
    Many(Vec<AttributeValue>),
}

impl<T: Model> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Model> Query<T> {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            filters: Vec::new(),
            index_override: None,
            order: None,
            limit: None,
            offset: 0,
            cursor_token: None,
            select: Vec::new(),
            want_count: false,
            force_scan: false,
            _marker: PhantomData,
        }
    }

    /// Forces a `Scan` even when the conditions accumulated so far would
    /// otherwise select a `Query`-capable index -- the fluent chain's
    /// `scan(target)` terminal.
    pub fn as_scan(mut self) -> Self {
        self.force_scan = true;
        self
    }

    pub fn where_eq(mut self, field: &'static str, value: AttributeValue) -> Self {
        self.conditions.push((field, Operator::Eq, ConditionInput::One(value)));
        self
    }

    pub fn where_cond(mut self, field: &'static str, op: Operator, value: AttributeValue) -> Self {
        self.conditions.push((field, op, ConditionInput::One(value)));
        self
    }

    pub fn where_between(mut self, field: &'static str, lo: AttributeValue, hi: AttributeValue) -> Self {
        self.conditions
            .push((field, Operator::Between, ConditionInput::Many(vec![lo, hi])));
        self
    }

    pub fn filter(mut self, joiner: Joiner, expr: FilterExpr) -> Self {
        self.filters.push((joiner, expr));
        self
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_override = Some(name.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order = Some((field.into(), ascending));
        self
    }

    pub fn limit(mut self, n: i32) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: usize) -> Self {
        self.offset = n;
        self
    }

    pub fn cursor(mut self, token: impl Into<String>) -> Self {
        self.cursor_token = Some(token.into());
        self
    }

    pub fn select(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn count(mut self) -> Self {
        self.want_count = true;
        self
    }

    /// Compiles the accumulated chain into a [`CompiledQuery`], choosing
    /// `Query` when the index selector finds a viable access path and
    /// `Scan` otherwise; `GetItem` is chosen by [`crate::executor::Executor`]
    /// itself when a full key is supplied directly.
    pub fn compile(self) -> Result<CompiledQuery, Error> {
        let metadata = T::metadata();

        for (field, _, _) in &self.conditions {
            reject_encrypted_field(&metadata, field)?;
        }
        for (_, expr) in &self.filters {
            reject_encrypted_in_expr(&metadata, expr)?;
        }

        let key_conditions: Vec<KeyCondition> = self
            .conditions
            .iter()
            .map(|(field, op, _)| KeyCondition { field, operator: *op })
            .collect();

        let chosen_index = if self.force_scan {
            None
        } else if let Some(name) = &self.index_override {
            Some(Some(name.clone()))
        } else {
            index_selector::select_optimal(&key_conditions, &metadata).map(|i| i.map(str::to_string))
        };

        let key_field_names: Vec<String> = match &chosen_index {
            Some(index_name) => {
                let (pk, sk) = match index_name {
                    None => (metadata.primary_key.partition_key.clone(), metadata.primary_key.sort_key.clone()),
                    Some(name) => {
                        let idx = metadata
                            .index(name)
                            .ok_or_else(|| Error::IndexNotFound(name.to_string()))?;
                        (idx.partition_key.clone(), idx.sort_key.clone())
                    }
                };
                std::iter::once(pk).chain(sk).collect()
            }
            None => Vec::new(),
        };

        let mut builder = ExpressionBuilder::new();

        for (field, op, value) in &self.conditions {
            let is_key_field = key_field_names.iter().any(|k| k == field);
            let condition_value = match value {
                ConditionInput::One(v) => crate::expr::ConditionValue::One(v.clone()),
                ConditionInput::Many(vs) => crate::expr::ConditionValue::Many(vs.clone()),
            };
            let condition = Condition::new(*field, *op, condition_value);

            if is_key_field && chosen_index.is_some() {
                builder.key_condition(&condition)?;
            } else {
                builder.filter(Joiner::And, &FilterExpr::Leaf(condition))?;
            }
        }

        for (joiner, expr) in &self.filters {
            builder.filter(*joiner, expr)?;
        }

        if !self.select.is_empty() {
            builder.projection(&self.select)?;
        }

        let compiled_expr = builder.build();

        let exclusive_start_key = match &self.cursor_token {
            Some(token) => {
                let cursor = Cursor::decode(token).map_err(|e| Error::InvalidTag(e.to_string()))?;
                let expected_index = chosen_index.clone().and_then(|i| i);
                if cursor.index != expected_index {
                    return Err(Error::InvalidOperator(crate::error::InvalidOperator {
                        field: "cursor".to_string(),
                        operator: "cursor".to_string(),
                        reason: "cursor was minted against a different index".to_string(),
                    }));
                }
                Some(cursor.last_key.into_iter().collect())
            }
            None => None,
        };

        let operation = if chosen_index.is_none() { Operation::Scan } else { Operation::Query };

        Ok(CompiledQuery {
            operation,
            table_name: metadata.table_name.clone(),
            index_name: chosen_index.and_then(|i| i),
            key_condition: compiled_expr.key_condition,
            filter: compiled_expr.filter,
            projection: compiled_expr.projection,
            attribute_names: compiled_expr.attribute_names,
            attribute_values: compiled_expr.attribute_values,
            limit: self.limit,
            exclusive_start_key,
            scan_index_forward: self.order.map(|(_, asc)| asc),
            select: if self.want_count { Select::Count } else { Select::All },
            offset: self.offset,
            segment: None,
            total_segments: None,
        })
    }
}

/// `EncryptedFieldNotQueryable`: a field
/// marked `encrypted` in the registry can't appear in a key condition or
/// filter, since the stored value is ciphertext and no longer comparable
/// the way the caller's literal expects.
fn reject_encrypted_field(metadata: &crate::registry::Metadata, field: &str) -> Result<(), Error> {
    let top_level = field.split('.').next().unwrap_or(field);
    if metadata.field(top_level).is_some_and(|f| f.is_encrypted) {
        return Err(Error::EncryptedFieldNotQueryable(field.to_string()));
    }
    Ok(())
}

fn reject_encrypted_in_expr(metadata: &crate::registry::Metadata, expr: &FilterExpr) -> Result<(), Error> {
    match expr {
        FilterExpr::Leaf(condition) => reject_encrypted_field(metadata, &condition.field),
        FilterExpr::Group(nodes) => {
            for (_, node) in nodes {
                reject_encrypted_in_expr(metadata, node)?;
            }
            Ok(())
        }
    }
}

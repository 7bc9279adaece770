//! The update builder (C10): a second-level fluent DSL for
//! SET/ADD/REMOVE/DELETE/list operations, conditions, and return-value
//! selection, compiled through the same [`ExpressionBuilder`] the query
//! compiler uses.

use std::marker::PhantomData;

use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};

use crate::error::Error;
use crate::expr::{Condition, ExpressionBuilder, FilterExpr, Joiner, Operator};
use crate::registry::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnValues {
    None,
    AllOld,
    UpdatedOld,
    AllNew,
    UpdatedNew,
}

impl From<ReturnValues> for ReturnValue {
    fn from(value: ReturnValues) -> Self {
        match value {
            ReturnValues::None => ReturnValue::None,
            ReturnValues::AllOld => ReturnValue::AllOld,
            ReturnValues::UpdatedOld => ReturnValue::UpdatedOld,
            ReturnValues::AllNew => ReturnValue::AllNew,
            ReturnValues::UpdatedNew => ReturnValue::UpdatedNew,
        }
    }
}

enum Action {
    Set(String, AttributeValue),
    SetIfNotExists(String, AttributeValue),
    AppendToList(String, AttributeValue),
    PrependToList(String, AttributeValue),
    SetListElement(String, usize, AttributeValue),
    RemoveListElement(String, usize),
    Add(String, AttributeValue),
    Remove(String),
    Delete(String, AttributeValue),
}

/// Compiled output of an [`UpdateBuilder`] chain: the `UpdateItem` shape
/// the Executor issues, distinct from [`CompiledQuery`] but sharing its
/// placeholder representation.
#[derive(Debug)]
pub struct CompiledUpdate {
    pub table_name: String,
    pub key: std::collections::HashMap<String, AttributeValue>,
    pub update_expression: String,
    pub condition_expression: Option<String>,
    pub attribute_names: std::collections::HashMap<String, String>,
    pub attribute_values: std::collections::HashMap<String, AttributeValue>,
    pub return_values: ReturnValue,
}

pub struct UpdateBuilder<T: Model> {
    key: std::collections::HashMap<String, AttributeValue>,
    actions: Vec<Action>,
    conditions: Vec<(Joiner, FilterExpr)>,
    expected_version: Option<i64>,
    return_values: ReturnValues,
    _marker: PhantomData<T>,
}

impl<T: Model> UpdateBuilder<T> {
    pub fn new(key: std::collections::HashMap<String, AttributeValue>) -> Self {
        Self {
            key,
            actions: Vec::new(),
            conditions: Vec::new(),
            expected_version: None,
            return_values: ReturnValues::None,
            _marker: PhantomData,
        }
    }

    pub fn set(mut self, field: impl Into<String>, value: AttributeValue) -> Self {
        self.actions.push(Action::Set(field.into(), value));
        self
    }

    pub fn set_if_not_exists(mut self, field: impl Into<String>, value: AttributeValue) -> Self {
        self.actions.push(Action::SetIfNotExists(field.into(), value));
        self
    }

    pub fn add(mut self, field: impl Into<String>, value: AttributeValue) -> Self {
        self.actions.push(Action::Add(field.into(), value));
        self
    }

    pub fn increment(self, field: impl Into<String>, by: i64) -> Self {
        self.add(field, AttributeValue::N(by.to_string()))
    }

    pub fn decrement(self, field: impl Into<String>, by: i64) -> Self {
        self.add(field, AttributeValue::N((-by).to_string()))
    }

    pub fn remove(mut self, field: impl Into<String>) -> Self {
        self.actions.push(Action::Remove(field.into()));
        self
    }

    pub fn delete(mut self, field: impl Into<String>, value: AttributeValue) -> Self {
        self.actions.push(Action::Delete(field.into(), value));
        self
    }

    pub fn append_to_list(mut self, field: impl Into<String>, value: AttributeValue) -> Self {
        self.actions.push(Action::AppendToList(field.into(), value));
        self
    }

    pub fn prepend_to_list(mut self, field: impl Into<String>, value: AttributeValue) -> Self {
        self.actions.push(Action::PrependToList(field.into(), value));
        self
    }

    pub fn set_list_element(mut self, field: impl Into<String>, index: usize, value: AttributeValue) -> Self {
        self.actions.push(Action::SetListElement(field.into(), index, value));
        self
    }

    pub fn remove_from_list_at(mut self, field: impl Into<String>, index: usize) -> Self {
        self.actions.push(Action::RemoveListElement(field.into(), index));
        self
    }

    pub fn condition(mut self, field: &'static str, op: Operator, value: AttributeValue) -> Self {
        self.conditions
            .push((Joiner::And, FilterExpr::Leaf(Condition::new(field, op, crate::expr::ConditionValue::One(value)))));
        self
    }

    pub fn condition_exists(mut self, field: &'static str) -> Self {
        self.conditions.push((
            Joiner::And,
            FilterExpr::Leaf(Condition::new(field, Operator::AttributeExists, crate::expr::ConditionValue::None)),
        ));
        self
    }

    pub fn condition_not_exists(mut self, field: &'static str) -> Self {
        self.conditions.push((
            Joiner::And,
            FilterExpr::Leaf(Condition::new(field, Operator::AttributeNotExists, crate::expr::ConditionValue::None)),
        ));
        self
    }

    pub fn condition_version(mut self, expected: i64) -> Self {
        self.expected_version = Some(expected);
        self
    }

    pub fn return_values(mut self, rv: ReturnValues) -> Self {
        self.return_values = rv;
        self
    }

    pub fn compile(self) -> Result<CompiledUpdate, Error> {
        let metadata = T::metadata();
        let mut builder = ExpressionBuilder::new();

        for action in &self.actions {
            match action {
                Action::Set(field, value) => builder.update_set(field, value.clone())?,
                Action::SetIfNotExists(field, value) => builder.update_set_if_not_exists(field, value.clone())?,
                Action::AppendToList(field, value) => builder.update_append_to_list(field, value.clone())?,
                Action::PrependToList(field, value) => builder.update_prepend_to_list(field, value.clone())?,
                Action::SetListElement(field, index, value) => {
                    builder.update_set_list_index(field, *index, value.clone())?
                }
                Action::RemoveListElement(field, index) => builder.update_remove_list_index(field, *index)?,
                Action::Add(field, value) => builder.update_add(field, value.clone())?,
                Action::Remove(field) => builder.update_remove(field)?,
                Action::Delete(field, value) => builder.update_delete(field, value.clone())?,
            }
        }

        if let Some(updated_at_field) = &metadata.updated_at_field {
            let now = aws_sdk_dynamodb::primitives::DateTime::from(std::time::SystemTime::now());
            builder.update_set(updated_at_field, crate::marshal::encode_timestamp(&now))?;
        }

        if let Some(version_field) = &metadata.version_field {
            if let Some(expected) = self.expected_version {
                builder.update_add(version_field, AttributeValue::N("1".to_string()))?;
                builder.condition(
                    Joiner::And,
                    &FilterExpr::Leaf(Condition::new(
                        version_field.clone(),
                        Operator::Eq,
                        crate::expr::ConditionValue::One(AttributeValue::N(expected.to_string())),
                    )),
                )?;
            }
        }

        for (joiner, expr) in &self.conditions {
            builder.condition(*joiner, expr)?;
        }

        let compiled = builder.build();

        Ok(CompiledUpdate {
            table_name: metadata.table_name.clone(),
            key: self.key,
            update_expression: compiled.update.ok_or_else(|| Error::InvalidTag("update builder produced no actions".to_string()))?,
            condition_expression: compiled.condition,
            attribute_names: compiled.attribute_names,
            attribute_values: compiled.attribute_values,
            return_values: self.return_values.into(),
        })
    }
}

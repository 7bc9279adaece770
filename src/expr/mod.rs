//! The expression builder (C5): turns `(field, operator, value)` triples
//! and groupings into DynamoDB expression strings plus the two placeholder
//! maps every DynamoDB API call needs (`ExpressionAttributeNames`,
//! `ExpressionAttributeValues`).
//!
//! Every attribute name gets a `#nN` placeholder regardless of whether it's
//! actually reserved -- simpler and uniformly safe, and it sidesteps having
//! to keep the reserved-word list perfectly in sync with DynamoDB's own.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use indexmap::IndexMap;

use crate::error::{Error, InvalidOperator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Between,
    In,
    BeginsWith,
    Contains,
    AttributeExists,
    AttributeNotExists,
    /// `attribute_type(field, :t)`; `value` carries the one-letter DynamoDB
    /// type code (`"S"`, `"N"`, `"B"`, `"BOOL"`, `"NULL"`, `"L"`, `"M"`, ...)
    /// as an `AttributeValue::S`.
    AttributeType,
}

impl Operator {
    fn symbol(self) -> Option<&'static str> {
        match self {
            Operator::Eq => Some("="),
            Operator::Ne => Some("<>"),
            Operator::Lt => Some("<"),
            Operator::Le => Some("<="),
            Operator::Gt => Some(">"),
            Operator::Ge => Some(">="),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    And,
    Or,
}

impl Joiner {
    fn as_str(self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConditionValue {
    One(AttributeValue),
    Many(Vec<AttributeValue>),
    None,
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: ConditionValue,
    /// Wraps the field's name placeholder in `size(...)` before applying
    /// `operator` (e.g. `size(#n0) > :v0`) without a separate `Operator`
    /// variant per size-comparator pair.
    pub size_of: bool,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: ConditionValue) -> Self {
        Self { field: field.into(), operator, value, size_of: false }
    }

    /// `size(field) <operator> value`, e.g. `size(tags) > :v0`. Only
    /// meaningful with a comparator operator (`Eq`/`Ne`/`Lt`/`Le`/`Gt`/`Ge`);
    /// any other operator is rejected at render time.
    pub fn on_size(field: impl Into<String>, operator: Operator, value: AttributeValue) -> Self {
        Self { field: field.into(), operator, value: ConditionValue::One(value), size_of: true }
    }
}

/// A leaf condition or a parenthesized group of conditions joined
/// pairwise by their own recorded [`Joiner`].
#[derive(Debug, Clone)]
pub enum FilterExpr {
    Leaf(Condition),
    /// `(node0 joiner1 node1 joiner2 node2 ...)`. The first entry's joiner
    /// is never rendered; it exists only so a single-element group is
    /// representable uniformly.
    Group(Vec<(Joiner, FilterExpr)>),
}

#[derive(Debug, Default)]
pub struct CompiledExpressions {
    pub key_condition: Option<String>,
    pub filter: Option<String>,
    pub projection: Option<String>,
    pub update: Option<String>,
    pub condition: Option<String>,
    pub attribute_names: HashMap<String, String>,
    pub attribute_values: HashMap<String, AttributeValue>,
}

pub struct ExpressionBuilder {
    names: IndexMap<String, String>,
    values: Vec<(String, AttributeValue)>,
    name_counter: usize,
    value_counter: usize,

    key_condition: Vec<String>,
    filter: Vec<(Joiner, String)>,
    projection: Vec<String>,
    update_set: Vec<String>,
    update_add: Vec<String>,
    update_remove: Vec<String>,
    update_delete: Vec<String>,
    condition: Vec<(Joiner, String)>,
}

impl Default for ExpressionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self {
            names: IndexMap::new(),
            values: Vec::new(),
            name_counter: 0,
            value_counter: 0,
            key_condition: Vec::new(),
            filter: Vec::new(),
            projection: Vec::new(),
            update_set: Vec::new(),
            update_add: Vec::new(),
            update_remove: Vec::new(),
            update_delete: Vec::new(),
            condition: Vec::new(),
        }
    }

    /// Allocates (or reuses) a `#nN` placeholder for `attribute_name`.
    pub fn name_placeholder(&mut self, attribute_name: &str) -> String {
        if let Some(existing) = self.names.get(attribute_name) {
            return existing.clone();
        }
        let placeholder = format!("#n{}", self.name_counter);
        self.name_counter += 1;
        self.names.insert(attribute_name.to_string(), placeholder.clone());
        placeholder
    }

    /// Allocates a fresh `:vN` placeholder for `value`. Values are not
    /// deduplicated: two conditions with the same literal value are
    /// logically independent and may diverge if one is later rewritten.
    pub fn value_placeholder(&mut self, value: AttributeValue) -> String {
        let placeholder = format!(":v{}", self.value_counter);
        self.value_counter += 1;
        self.values.push((placeholder.clone(), value));
        placeholder
    }

    fn render_leaf(&mut self, condition: &Condition) -> Result<String, Error> {
        validate_field_name(&condition.field)?;
        let raw_name = self.name_placeholder(&condition.field);
        let name = if condition.size_of { format!("size({raw_name})") } else { raw_name };

        if condition.size_of && !matches!(condition.operator, Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge) {
            return Err(InvalidOperator {
                field: condition.field.clone(),
                operator: format!("{:?}", condition.operator),
                reason: "size(f) only supports the comparator operators".to_string(),
            }
            .into());
        }

        Ok(match (condition.operator, &condition.value) {
            (Operator::AttributeExists, _) => format!("attribute_exists({name})"),
            (Operator::AttributeNotExists, _) => format!("attribute_not_exists({name})"),
            (Operator::AttributeType, ConditionValue::One(v)) => {
                let vp = self.value_placeholder(v.clone());
                format!("attribute_type({name}, {vp})")
            }
            (Operator::BeginsWith, ConditionValue::One(v)) => {
                let vp = self.value_placeholder(v.clone());
                format!("begins_with({name}, {vp})")
            }
            (Operator::Contains, ConditionValue::One(v)) => {
                let vp = self.value_placeholder(v.clone());
                format!("contains({name}, {vp})")
            }
            (Operator::Between, ConditionValue::Many(values)) if values.len() == 2 => {
                let lo = self.value_placeholder(values[0].clone());
                let hi = self.value_placeholder(values[1].clone());
                format!("{name} BETWEEN {lo} AND {hi}")
            }
            (Operator::In, ConditionValue::Many(values)) => {
                if values.is_empty() || values.len() > 100 {
                    return Err(InvalidOperator {
                        field: condition.field.clone(),
                        operator: "IN".to_string(),
                        reason: format!("IN requires 1-100 values, got {}", values.len()),
                    }
                    .into());
                }
                let placeholders: Vec<String> =
                    values.iter().cloned().map(|v| self.value_placeholder(v)).collect();
                format!("{name} IN ({})", placeholders.join(", "))
            }
            (op, ConditionValue::One(v)) if op.symbol().is_some() => {
                let vp = self.value_placeholder(v.clone());
                format!("{name} {} {vp}", op.symbol().unwrap())
            }
            _ => {
                return Err(InvalidOperator {
                    field: condition.field.clone(),
                    operator: format!("{:?}", condition.operator),
                    reason: "operator/value shape mismatch".to_string(),
                }
                .into())
            }
        })
    }

    fn render_expr(&mut self, expr: &FilterExpr) -> Result<String, Error> {
        match expr {
            FilterExpr::Leaf(cond) => self.render_leaf(cond),
            FilterExpr::Group(nodes) => {
                let mut rendered = String::new();
                for (i, (joiner, node)) in nodes.iter().enumerate() {
                    if i > 0 {
                        rendered.push(' ');
                        rendered.push_str(joiner.as_str());
                        rendered.push(' ');
                    }
                    rendered.push_str(&self.render_expr(node)?);
                }
                Ok(format!("({rendered})"))
            }
        }
    }

    pub fn key_condition(&mut self, condition: &Condition) -> Result<(), Error> {
        let rendered = self.render_leaf(condition)?;
        self.key_condition.push(rendered);
        Ok(())
    }

    pub fn filter(&mut self, joiner: Joiner, expr: &FilterExpr) -> Result<(), Error> {
        let rendered = self.render_expr(expr)?;
        self.filter.push((joiner, rendered));
        Ok(())
    }

    pub fn condition(&mut self, joiner: Joiner, expr: &FilterExpr) -> Result<(), Error> {
        let rendered = self.render_expr(expr)?;
        self.condition.push((joiner, rendered));
        Ok(())
    }

    pub fn projection(&mut self, fields: &[String]) -> Result<(), Error> {
        for field in fields {
            validate_field_name(field)?;
            self.projection.push(self.name_placeholder_for_path(field));
        }
        Ok(())
    }

    fn name_placeholder_for_path(&mut self, field: &str) -> String {
        field
            .split('.')
            .map(|seg| self.name_placeholder(seg))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn update_set(&mut self, field: &str, value: AttributeValue) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        let vp = self.value_placeholder(value);
        self.update_set.push(format!("{name} = {vp}"));
        Ok(())
    }

    pub fn update_set_if_not_exists(&mut self, field: &str, value: AttributeValue) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        let vp = self.value_placeholder(value);
        self.update_set.push(format!("{name} = if_not_exists({name}, {vp})"));
        Ok(())
    }

    pub fn update_append_to_list(&mut self, field: &str, value: AttributeValue) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        let empty = self.value_placeholder(AttributeValue::L(Vec::new()));
        let vp = self.value_placeholder(value);
        self.update_set
            .push(format!("{name} = list_append(if_not_exists({name}, {empty}), {vp})"));
        Ok(())
    }

    pub fn update_prepend_to_list(&mut self, field: &str, value: AttributeValue) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        let empty = self.value_placeholder(AttributeValue::L(Vec::new()));
        let vp = self.value_placeholder(value);
        self.update_set
            .push(format!("{name} = list_append({vp}, if_not_exists({name}, {empty}))"));
        Ok(())
    }

    pub fn update_add(&mut self, field: &str, value: AttributeValue) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        let vp = self.value_placeholder(value);
        self.update_add.push(format!("{name} {vp}"));
        Ok(())
    }

    pub fn update_remove(&mut self, field: &str) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        self.update_remove.push(name);
        Ok(())
    }

    pub fn update_remove_list_index(&mut self, field: &str, index: usize) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        self.update_remove.push(format!("{name}[{index}]"));
        Ok(())
    }

    pub fn update_set_list_index(&mut self, field: &str, index: usize, value: AttributeValue) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        let vp = self.value_placeholder(value);
        self.update_set.push(format!("{name}[{index}] = {vp}"));
        Ok(())
    }

    pub fn update_delete(&mut self, field: &str, value: AttributeValue) -> Result<(), Error> {
        validate_field_name(field)?;
        let name = self.name_placeholder(field);
        let vp = self.value_placeholder(value);
        self.update_delete.push(format!("{name} {vp}"));
        Ok(())
    }

    pub fn build(mut self) -> CompiledExpressions {
        let key_condition = join_rendered(&self.key_condition, " AND ");
        let filter = join_joined(&self.filter);
        let condition = join_joined(&self.condition);
        let projection = if self.projection.is_empty() {
            None
        } else {
            Some(self.projection.join(", "))
        };

        let update = {
            let mut sections = Vec::new();
            if !self.update_set.is_empty() {
                sections.push(format!("SET {}", self.update_set.join(", ")));
            }
            if !self.update_add.is_empty() {
                sections.push(format!("ADD {}", self.update_add.join(", ")));
            }
            if !self.update_remove.is_empty() {
                sections.push(format!("REMOVE {}", self.update_remove.join(", ")));
            }
            if !self.update_delete.is_empty() {
                sections.push(format!("DELETE {}", self.update_delete.join(", ")));
            }
            if sections.is_empty() {
                None
            } else {
                Some(sections.join(" "))
            }
        };

        let attribute_names = self.names.drain(..).map(|(name, placeholder)| (placeholder, name)).collect();
        let attribute_values = self.values.drain(..).collect();

        CompiledExpressions {
            key_condition,
            filter,
            projection,
            update,
            condition,
            attribute_names,
            attribute_values,
        }
    }
}

fn join_rendered(parts: &[String], sep: &str) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(sep))
    }
}

fn join_joined(parts: &[(Joiner, String)]) -> Option<String> {
    if parts.is_empty() {
        return None;
    }
    let mut out = String::new();
    for (i, (joiner, rendered)) in parts.iter().enumerate() {
        if i > 0 {
            out.push(' ');
            out.push_str(joiner.as_str());
            out.push(' ');
        }
        out.push_str(rendered);
    }
    Some(out)
}

const MAX_FIELD_NAME_LEN: usize = 255;
const MAX_NESTING_DEPTH: usize = 32;

/// Rejects field names that could otherwise be used to smuggle arbitrary
/// expression syntax past the placeholder scheme (whitespace, angle
/// brackets, quotes), that exceed DynamoDB's own attribute-name length
/// bound, or that nest deeper than is ever legitimate for an actual model.
pub fn validate_field_name(field: &str) -> Result<(), Error> {
    if field.is_empty() || field.len() > MAX_FIELD_NAME_LEN {
        return Err(Error::InvalidTag(format!("field name `{field}` has an invalid length")));
    }
    if field.chars().any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '\'' | '"' | ';')) {
        return Err(Error::InvalidTag(format!("field name `{field}` contains disallowed characters")));
    }
    if field.split('.').count() > MAX_NESTING_DEPTH {
        return Err(Error::InvalidTag(format!("field name `{field}` nests too deeply")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_still_get_a_placeholder() {
        let mut builder = ExpressionBuilder::new();
        builder
            .key_condition(&Condition::new("Name", Operator::Eq, ConditionValue::One(AttributeValue::S("x".into()))))
            .unwrap();
        let compiled = builder.build();
        assert_eq!(compiled.key_condition.as_deref(), Some("#n0 = :v0"));
        assert_eq!(compiled.attribute_names.get("#n0").map(String::as_str), Some("Name"));
    }

    #[test]
    fn every_placeholder_resolves() {
        let mut builder = ExpressionBuilder::new();
        builder
            .filter(
                Joiner::And,
                &FilterExpr::Group(vec![
                    (
                        Joiner::And,
                        FilterExpr::Leaf(Condition::new(
                            "status",
                            Operator::Eq,
                            ConditionValue::One(AttributeValue::S("active".into())),
                        )),
                    ),
                    (
                        Joiner::Or,
                        FilterExpr::Leaf(Condition::new(
                            "status",
                            Operator::Eq,
                            ConditionValue::One(AttributeValue::S("pending".into())),
                        )),
                    ),
                ]),
            )
            .unwrap();
        let compiled = builder.build();
        let filter = compiled.filter.unwrap();
        assert!(filter.starts_with('(') && filter.ends_with(')'));
        for name_placeholder in compiled.attribute_names.keys() {
            assert!(filter.contains(name_placeholder));
        }
        for value_placeholder in compiled.attribute_values.keys() {
            assert!(filter.contains(value_placeholder));
        }
    }

    #[test]
    fn in_rejects_over_100_values() {
        let mut builder = ExpressionBuilder::new();
        let values = (0..101).map(|i| AttributeValue::N(i.to_string())).collect();
        let err = builder
            .key_condition(&Condition::new("id", Operator::In, ConditionValue::Many(values)))
            .unwrap_err();
        assert!(err.is_kind(crate::error::ErrorKind::InvalidOperator));
    }

    #[test]
    fn size_of_wraps_the_field_name_placeholder() {
        let mut builder = ExpressionBuilder::new();
        builder
            .filter(
                Joiner::And,
                &FilterExpr::Leaf(Condition::on_size("tags", Operator::Gt, AttributeValue::N("0".into()))),
            )
            .unwrap();
        let compiled = builder.build();
        assert_eq!(compiled.filter.as_deref(), Some("size(#n0) > :v0"));
    }

    #[test]
    fn attribute_type_renders_as_a_function_call() {
        let mut builder = ExpressionBuilder::new();
        builder
            .filter(
                Joiner::And,
                &FilterExpr::Leaf(Condition::new(
                    "payload",
                    Operator::AttributeType,
                    ConditionValue::One(AttributeValue::S("S".into())),
                )),
            )
            .unwrap();
        let compiled = builder.build();
        assert_eq!(compiled.filter.as_deref(), Some("attribute_type(#n0, :v0)"));
    }

    #[test]
    fn field_name_validation_rejects_whitespace_and_quotes() {
        assert!(validate_field_name("user name").is_err());
        assert!(validate_field_name("user\"name").is_err());
        assert!(validate_field_name("user.profile.name").is_ok());
    }
}

//! # Filter Expression AST
//!
//! Typed filter predicates produced by the query translator and evaluated by
//! document stores.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison kinds a filter may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// Equality (no operator token)
    #[serde(rename = "eq")]
    Eq,

    /// Greater than
    #[serde(rename = "gt")]
    GreaterThan,

    /// Greater than or equal
    #[serde(rename = "gte")]
    GreaterOrEqual,

    /// Less than
    #[serde(rename = "lt")]
    LessThan,

    /// Less than or equal
    #[serde(rename = "lte")]
    LessOrEqual,

    /// Value in set
    #[serde(rename = "in")]
    InSet,
}

impl ComparisonOp {
    /// Map an operator token to its comparison kind.
    ///
    /// `eq` is intentionally absent: equality is expressed by omitting the token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(ComparisonOp::GreaterThan),
            "gte" => Some(ComparisonOp::GreaterOrEqual),
            "lt" => Some(ComparisonOp::LessThan),
            "lte" => Some(ComparisonOp::LessOrEqual),
            "in" => Some(ComparisonOp::InSet),
            _ => None,
        }
    }

    /// Get the operator token
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::GreaterThan => "gt",
            ComparisonOp::GreaterOrEqual => "gte",
            ComparisonOp::LessThan => "lt",
            ComparisonOp::LessOrEqual => "lte",
            ComparisonOp::InSet => "in",
        }
    }
}

/// A single field predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Field to filter on; dots address nested fields
    pub field: String,

    /// Comparison kind
    pub op: ComparisonOp,

    /// Operand (an array for `InSet`).
    ///
    /// Equality and set operands from a query string stay as the text that
    /// was sent; they are read against the field's kind when matched.
    pub value: Value,
}

impl FilterExpr {
    pub fn new(field: impl Into<String>, op: ComparisonOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, ComparisonOp::Eq, value)
    }

    pub fn in_set(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, ComparisonOp::InSet, Value::Array(values))
    }

    /// Check if a document matches this predicate.
    ///
    /// Array fields match when any element matches, unless an equality
    /// operand is itself an array.
    pub fn matches(&self, doc: &Value) -> bool {
        let Some(field_value) = lookup_path(doc, &self.field) else {
            return self.op == ComparisonOp::Eq && reads_as_null(&self.value);
        };

        match field_value {
            Value::Array(items) if self.op != ComparisonOp::Eq || !self.value.is_array() => {
                items.iter().any(|item| self.matches_scalar(item))
            }
            other => self.matches_scalar(other),
        }
    }

    fn matches_scalar(&self, field_value: &Value) -> bool {
        match self.op {
            ComparisonOp::Eq => operand_eq(field_value, &self.value),
            ComparisonOp::InSet => self
                .value
                .as_array()
                .map(|set| set.iter().any(|candidate| operand_eq(field_value, candidate)))
                .unwrap_or(false),
            ComparisonOp::GreaterThan => self.ordering(field_value).is_some_and(Ordering::is_gt),
            ComparisonOp::GreaterOrEqual => self.ordering(field_value).is_some_and(Ordering::is_ge),
            ComparisonOp::LessThan => self.ordering(field_value).is_some_and(Ordering::is_lt),
            ComparisonOp::LessOrEqual => self.ordering(field_value).is_some_and(Ordering::is_le),
        }
    }

    fn ordering(&self, field_value: &Value) -> Option<Ordering> {
        compare_values(field_value, &self.value)
    }
}

/// A set of predicates combined with AND logic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if a document matches all predicates
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }
}

/// Resolve a dotted path inside a document
pub fn lookup_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| current.get(segment))
}

/// Equality between a field value and an operand.
///
/// String fields only ever match the operand text verbatim, so `02118` and
/// `2118` stay distinct. Number fields compare by value (`10` equals `10.0`),
/// and boolean and null fields match their literal text.
fn operand_eq(field: &Value, operand: &Value) -> bool {
    match (field, operand) {
        (Value::Number(x), Value::Number(y)) => numbers_eq(x.as_f64(), y.as_f64()),
        (Value::Number(x), Value::String(text)) => numbers_eq(x.as_f64(), read_number(text)),
        (Value::Bool(b), Value::String(text)) => text.parse::<bool>().is_ok_and(|t| t == *b),
        (Value::Null, Value::String(text)) => text == "null",
        _ => field == operand,
    }
}

fn numbers_eq(x: Option<f64>, y: Option<f64>) -> bool {
    matches!((x, y), (Some(x), Some(y)) if x == y)
}

fn read_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

fn reads_as_null(operand: &Value) -> bool {
    match operand {
        Value::Null => true,
        Value::String(text) => text == "null",
        _ => false,
    }
}

/// Order two values of the same kind; mixed kinds are incomparable
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

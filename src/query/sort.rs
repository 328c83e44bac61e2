//! # Sort Keys
//!
//! `sort=name,-averageCost` sorts by name ascending, then average cost
//! descending.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::CREATED_AT_FIELD;

use super::filter::lookup_path;

/// One key of a multi-key sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }

    /// Newest documents first
    pub fn default_order() -> Vec<SortKey> {
        vec![SortKey::desc(CREATED_AT_FIELD)]
    }

    /// Parse a comma-separated `sort` value, preserving precedence
    pub fn parse_list(value: &str) -> Vec<SortKey> {
        value
            .split(',')
            .map(str::trim)
            .filter_map(|part| match part.strip_prefix('-') {
                Some("") => None,
                Some(field) => Some(SortKey::desc(field)),
                None if part.is_empty() => None,
                None => Some(SortKey::asc(part)),
            })
            .collect()
    }
}

/// Compare two documents under a sort key list
pub fn compare_documents(a: &Value, b: &Value, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = compare_for_sort(lookup_path(a, &key.field), lookup_path(b, &key.field));
        let ordering = if key.ascending {
            ordering
        } else {
            ordering.reverse()
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Total order over JSON values: missing/null, numbers, strings, objects,
/// arrays, booleans.
fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank_a = type_rank(a);
    let rank_b = type_rank(b);
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

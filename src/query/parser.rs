//! # Query Translator
//!
//! Turns raw query-string parameters into a [`QueryDescriptor`].
//!
//! Operators may be written two ways, and a field may carry several of them:
//!
//! ```text
//! averageCost[lte]=10000          bracket key
//! averageCost=lte.10000           operator token prefix
//! careers[in]=Business,UI/UX      set membership
//! careers=in.(Business,UI/UX)
//! ```
//!
//! `select`, `sort`, `page` and `limit` are reserved and never become filters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::filter::{ComparisonOp, FilterExpr, FilterSet};
use super::pagination::PageRequest;
use super::projection::Projection;
use super::sort::SortKey;
use crate::store::ID_FIELD;

/// Keys that shape the output instead of filtering it
pub const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Raw client parameters of one listing request.
///
/// A repeated key keeps its last value. Keys starting with `$` are dropped so
/// clients cannot smuggle store operators in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    params: Vec<(String, String)>,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = Self::new();
        for (key, value) in pairs {
            request.insert(key, value);
        }
        request
    }

    /// Parse an URL-encoded query string (without the leading `?`)
    pub fn parse_query_string(query: &str) -> QueryResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| QueryError::InvalidQueryParam(format!("malformed query string: {e}")))?;
        Ok(Self::from_pairs(pairs))
    }

    /// Set a parameter, replacing an earlier value for the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key.starts_with('$') {
            tracing::debug!(key = %key, "dropping operator-like query key");
            return;
        }
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters that take part in filtering
    pub fn filter_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterRequest {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

/// Inline a referenced document into each result.
///
/// Supplied by the route, never by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionDirective {
    /// Field holding the referenced document's id
    pub path: String,

    /// Collection the reference points into
    pub collection: String,

    /// Fields of the referenced document to keep (empty keeps all)
    pub select: Vec<String>,
}

impl ExpansionDirective {
    pub fn new(path: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            collection: collection.into(),
            select: Vec::new(),
        }
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Projection applied to the referenced document
    pub fn projection(&self) -> Option<Projection> {
        (!self.select.is_empty()).then(|| Projection::include(self.select.iter().cloned()))
    }
}

/// Store-agnostic description of a listing query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub filter: FilterSet,
    pub projection: Option<Projection>,
    pub sort: Vec<SortKey>,
    pub skip: usize,
    pub limit: Option<usize>,
    pub expand: Option<ExpansionDirective>,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            filter: FilterSet::new(),
            projection: None,
            sort: SortKey::default_order(),
            skip: 0,
            limit: None,
            expand: None,
        }
    }
}

impl QueryDescriptor {
    /// Translate a filter request into an unpaginated descriptor
    pub fn translate(
        request: &FilterRequest,
        expand: Option<ExpansionDirective>,
    ) -> QueryResult<Self> {
        let mut filter = FilterSet::new();
        for (key, value) in request.filter_params() {
            filter = filter.and(parse_filter(key, value)?);
        }

        let projection = match request.get("select") {
            Some(select) => Projection::parse(select)?,
            None => None,
        };

        let sort = request
            .get("sort")
            .map(SortKey::parse_list)
            .filter(|keys| !keys.is_empty())
            .unwrap_or_else(SortKey::default_order);

        Ok(Self {
            filter,
            projection,
            sort,
            skip: 0,
            limit: None,
            expand,
        })
    }

    /// Fetch a single document by id, optionally expanded
    pub fn by_id(id: &str, expand: Option<ExpansionDirective>) -> Self {
        Self {
            filter: FilterSet::new().and(FilterExpr::eq(ID_FIELD, Value::String(id.to_string()))),
            limit: Some(1),
            expand,
            ..Self::default()
        }
    }

    /// Restrict the descriptor to one page
    pub fn paginate(mut self, page: PageRequest) -> Self {
        self.skip = page.start_index();
        self.limit = Some(page.limit);
        self
    }
}

/// Parse one filter parameter
fn parse_filter(key: &str, value: &str) -> QueryResult<FilterExpr> {
    if let Some((field, token)) = split_bracket_key(key) {
        let op = ComparisonOp::from_token(token).ok_or_else(|| QueryError::UnknownOperator {
            field: field.to_string(),
            operator: token.to_string(),
        })?;
        return build_filter(field, op, value);
    }

    if let Some((token, rest)) = value.split_once('.') {
        if let Some(op) = ComparisonOp::from_token(token) {
            return build_filter(key, op, rest);
        }
    }

    build_filter(key, ComparisonOp::Eq, value)
}

/// `field[op]` → (`field`, `op`)
fn split_bracket_key(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_suffix(']')?;
    let (field, token) = inner.split_once('[')?;
    Some((field, token))
}

fn build_filter(field: &str, op: ComparisonOp, raw: &str) -> QueryResult<FilterExpr> {
    if field.trim().is_empty() {
        return Err(QueryError::invalid_filter(field, "field name is empty"));
    }

    let value = match op {
        ComparisonOp::Eq => Value::String(raw.to_string()),
        ComparisonOp::InSet => {
            let inner = raw
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .unwrap_or(raw);
            let items: Vec<Value> = inner
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect();
            if items.is_empty() {
                return Err(QueryError::invalid_filter(field, "'in' requires at least one value"));
            }
            Value::Array(items)
        }
        op => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(QueryError::invalid_filter(field, "operand is empty"));
            }
            let operand = parse_operand(raw);
            if operand.is_null() || operand.is_boolean() {
                return Err(QueryError::invalid_filter(
                    field,
                    format!("'{}' cannot be compared with '{}'", op.as_str(), raw),
                ));
            }
            operand
        }
    };

    Ok(FilterExpr::new(field, op, value))
}

/// Parse an ordering operand: null, booleans, integers, floats, otherwise a string
fn parse_operand(value: &str) -> Value {
    match value {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(n) = value.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = value.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return Value::Number(num);
        }
    }

    Value::String(value.to_string())
}

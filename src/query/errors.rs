//! # Query Errors
//!
//! Error types for the advanced results pipeline.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query pipeline errors
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Filter operand could not be used as a comparison value
    #[error("Invalid filter on '{field}': {reason}")]
    InvalidFilter { field: String, reason: String },

    /// Operator token in a bracket key is not recognized
    #[error("Unknown filter operator '{operator}' on '{field}'")]
    UnknownOperator { field: String, operator: String },

    /// Malformed `select` or `sort` parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Backing store failed while executing the query
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl QueryError {
    pub(crate) fn invalid_filter(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::InvalidFilter { .. }
            | QueryError::UnknownOperator { .. }
            | QueryError::InvalidQueryParam(_) => 400,
            QueryError::Store(err) => err.status_code(),
        }
    }

    /// Whether this error was caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(QueryError::invalid_filter("age", "empty").status_code(), 400);
        assert_eq!(
            QueryError::UnknownOperator {
                field: "age".to_string(),
                operator: "ne".to_string()
            }
            .status_code(),
            400
        );
        assert_eq!(
            QueryError::Store(StoreError::Internal("boom".to_string())).status_code(),
            500
        );
    }

    #[test]
    fn test_message_names_field() {
        let err = QueryError::invalid_filter("averageCost", "operand is empty");
        assert_eq!(
            err.to_string(),
            "Invalid filter on 'averageCost': operand is empty"
        );
    }
}

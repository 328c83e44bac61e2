//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Document is not a JSON object or carries an unusable identifier
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Seed data could not be read or parsed
    #[error("Seed error: {0}")]
    Seed(String),

    /// Backend failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::InvalidDocument(_) => 400,
            StoreError::Seed(_) | StoreError::Internal(_) => 500,
        }
    }
}

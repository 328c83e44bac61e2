//! # Auth Errors
//!
//! Error types for the access guard.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Guard Outcomes
    // ==================

    /// No usable credential, or the credential did not resolve to a user
    #[error("Not authorized to access this route")]
    Unauthenticated,

    /// Authenticated, but the role is not permitted
    #[error("User role {role} is not authorized to access this route")]
    Forbidden { role: String },

    // ==================
    // JWT Errors
    // ==================

    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    // ==================
    // Internal Errors
    // ==================

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    /// Principal lookup failed
    #[error("Lookup error: {0}")]
    Lookup(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 401 Unauthorized; a role refusal shares the status and keeps its message
            AuthError::Unauthenticated => 401,
            AuthError::MalformedToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,
            AuthError::Forbidden { .. } => 401,

            // 500 Internal Server Error
            AuthError::TokenGenerationFailed => 500,
            AuthError::Lookup(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Lookup(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::Unauthenticated.status_code(), 401);
        assert_eq!(AuthError::TokenExpired.status_code(), 401);
        assert_eq!(
            AuthError::Forbidden { role: "user".into() }.status_code(),
            401
        );
        assert_eq!(AuthError::Lookup("down".into()).status_code(), 500);
        assert!(!AuthError::TokenGenerationFailed.is_client_error());
    }

    #[test]
    fn test_forbidden_message_names_role() {
        let err = AuthError::Forbidden { role: "publisher".into() };
        assert_eq!(
            err.to_string(),
            "User role publisher is not authorized to access this route"
        );
    }
}

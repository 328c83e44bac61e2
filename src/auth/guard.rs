//! # Access Guard
//!
//! Bearer credential verification, principal resolution and role checks.
//!
//! Every verification failure collapses to [`AuthError::Unauthenticated`]
//! so callers cannot tell an expired token from a forged one. The reason is
//! logged at debug level only.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use tracing::debug;

use super::errors::{AuthError, AuthResult};
use super::jwt::TokenManager;
use super::principal::{Principal, PrincipalLookup, Role};

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticates requests and enforces role requirements
#[derive(Clone)]
pub struct AccessGuard {
    tokens: TokenManager,
    principals: Arc<dyn PrincipalLookup>,
}

impl AccessGuard {
    pub fn new(tokens: TokenManager, principals: Arc<dyn PrincipalLookup>) -> Self {
        Self { tokens, principals }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Resolve the request's bearer credential to a principal
    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthResult<Principal> {
        let Some(token) = bearer_token(headers) else {
            debug!("no bearer credential");
            return Err(AuthError::Unauthenticated);
        };

        let claims = self.tokens.verify(token).map_err(|e| {
            debug!(reason = %e, "token rejected");
            AuthError::Unauthenticated
        })?;

        match self.principals.lookup(&claims.sub).await? {
            Some(principal) => Ok(principal),
            None => {
                debug!(subject = %claims.sub, "token subject not found");
                Err(AuthError::Unauthenticated)
            }
        }
    }

    /// Check the principal's role against the permitted set
    pub fn authorize(&self, principal: &Principal, permitted: &[Role]) -> AuthResult<()> {
        authorize(principal, permitted)
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Role check; an empty permitted set admits any authenticated principal
pub fn authorize(principal: &Principal, permitted: &[Role]) -> AuthResult<()> {
    if permitted.is_empty() || permitted.contains(&principal.role) {
        return Ok(());
    }
    Err(AuthError::Forbidden {
        role: principal.role.to_string(),
    })
}

//! # Principals
//!
//! The authenticated identity attached to a request, and how it is resolved
//! from a token subject.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{collections, DocumentStore};

use super::errors::AuthResult;

/// Open role name. Unknown roles are carried through and simply never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const USER: &'static str = "user";
    pub const PUBLISHER: &'static str = "publisher";
    pub const ADMIN: &'static str = "admin";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    pub fn publisher() -> Self {
        Self::new(Self::PUBLISHER)
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::user()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }

    /// Build from a user document; the role defaults to `user`
    pub fn from_document(doc: &Value) -> Option<Self> {
        let id = doc.get("id")?.as_str()?;
        let role = doc
            .get("role")
            .and_then(Value::as_str)
            .map(Role::new)
            .unwrap_or_default();
        Some(Self::new(id, role))
    }
}

/// Resolves a token subject to a principal
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    /// `Ok(None)` when the subject is unknown
    async fn lookup(&self, subject: &str) -> AuthResult<Option<Principal>>;
}

/// Looks principals up in the `users` collection
#[derive(Clone)]
pub struct StorePrincipalLookup {
    store: Arc<dyn DocumentStore>,
}

impl StorePrincipalLookup {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PrincipalLookup for StorePrincipalLookup {
    async fn lookup(&self, subject: &str) -> AuthResult<Option<Principal>> {
        let doc = self.store.find_by_id(collections::USERS, subject).await?;
        Ok(doc.as_ref().and_then(Principal::from_document))
    }
}

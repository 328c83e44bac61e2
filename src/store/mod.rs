//! # Document Store
//!
//! The store collaborator consumed by the query pipeline and the access
//! guard, plus an in-memory implementation seeded from JSON files.
//!
//! Documents are JSON objects identified by a string `id` and stamped with a
//! `createdAt` timestamp on insert.

pub mod errors;
pub mod memory;
pub mod seed;

use async_trait::async_trait;
use serde_json::Value;

use crate::query::{FilterSet, QueryDescriptor};

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use seed::{load_seed_dir, SeedReport};

/// Identifier field present on every document
pub const ID_FIELD: &str = "id";

/// Creation timestamp field (RFC 3339)
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Collection names
pub mod collections {
    pub const BOOTCAMPS: &str = "bootcamps";
    pub const COURSES: &str = "courses";
    pub const REVIEWS: &str = "reviews";
    pub const USERS: &str = "users";

    /// All collections, in seeding order (referenced collections first)
    pub const ALL: [&str; 4] = [USERS, BOOTCAMPS, COURSES, REVIEWS];
}

/// Document store operations used by the service
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute a query descriptor: filter, sort, skip/limit, projection and
    /// expansion, in that order
    async fn find(&self, collection: &str, query: &QueryDescriptor) -> StoreResult<Vec<Value>>;

    /// Count documents matching a filter (an empty filter counts everything)
    async fn count(&self, collection: &str, filter: &FilterSet) -> StoreResult<usize>;

    /// Fetch one document by id
    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Insert a document, returning it as stored
    async fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value>;

    /// Delete a document by id; `false` when nothing was deleted
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;
}

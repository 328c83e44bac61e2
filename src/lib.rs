//! devcamp - bootcamp directory REST backend
//!
//! Listing routes share one pipeline: a client filter request is translated
//! into a store-agnostic query, paginated, executed and wrapped in a uniform
//! envelope. Protected routes pass through the access guard first.

pub mod auth;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod query;
pub mod store;

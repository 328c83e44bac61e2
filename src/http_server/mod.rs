//! # HTTP Server Module
//!
//! The JSON API over the query pipeline and access guard.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/v1/bootcamps`, `/api/v1/courses`, `/api/v1/reviews` - Public listings
//! - `/api/v1/users` - Admin only
//! - `/api/v1/auth/me` - Current user

pub mod config;
pub mod errors;
pub mod middleware;
pub mod observability_routes;
pub mod response;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{AppState, HttpServer};

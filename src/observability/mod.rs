//! Observability
//!
//! Logging goes through `tracing`; this module only installs the subscriber.
//! Per-request spans come from the HTTP server's trace layer.

mod logger;

pub use logger::{env_filter, init_logging};

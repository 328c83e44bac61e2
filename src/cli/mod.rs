//! CLI module
//!
//! Provides command-line interface for:
//! - serve: Seed the store and run the HTTP API
//! - query: One-shot listing query
//! - token: Mint a bearer token for a seeded user

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{parse_expand, query, run, run_command, serve, token};
pub use config::{AuthConfig, Config, JWT_SECRET_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};

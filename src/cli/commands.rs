//! CLI command implementations
//!
//! Each command loads the configuration, installs logging, seeds an
//! in-memory store and then does its one job on a fresh tokio runtime.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{PrincipalLookup, StorePrincipalLookup, TokenManager};
use crate::http_server::{AppState, HttpServer};
use crate::observability::init_logging;
use crate::query::{AdvancedResults, ExpansionDirective, FilterRequest};
use crate::store::{load_seed_dir, InMemoryStore};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(config.as_deref()),
        Command::Query {
            config,
            collection,
            expand,
            query: raw,
        } => query(config.as_deref(), &collection, expand.as_deref(), &raw),
        Command::Token { config, user } => token(config.as_deref(), &user),
    }
}

/// Serve the HTTP API over the seed data until shutdown
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level);

    runtime()?.block_on(async {
        let store = seeded_store(&config).await?;
        let state = AppState::new(
            store,
            config.query.clone(),
            TokenManager::new(config.auth.token_config()),
        );

        HttpServer::new(config.server.clone(), state)
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Run one listing query and print its envelope
pub fn query(
    config_path: Option<&Path>,
    collection: &str,
    expand: Option<&str>,
    raw: &str,
) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level);

    let expand = expand.map(parse_expand).transpose()?;
    let request = FilterRequest::parse_query_string(raw)?;

    let envelope = runtime()?.block_on(async {
        let store = seeded_store(&config).await?;
        let results = AdvancedResults::new(store, config.query.clone());
        Ok::<_, CliError>(results.run(collection, expand, &request).await?)
    })?;

    write_json(&envelope)
}

/// Print a bearer token for a seeded user
pub fn token(config_path: Option<&Path>, user: &str) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level);

    let token = runtime()?.block_on(async {
        let store = seeded_store(&config).await?;
        let principal = StorePrincipalLookup::new(store)
            .lookup(user)
            .await?
            .ok_or_else(|| {
                CliError::new(
                    CliErrorCode::TokenFailed,
                    format!("No user with the id of {user}"),
                )
            })?;
        Ok::<_, CliError>(TokenManager::new(config.auth.token_config()).issue(&principal.id)?)
    })?;

    write_json(&json!({ "success": true, "token": token }))
}

/// Parse `path:collection[:field,field]`
pub fn parse_expand(value: &str) -> CliResult<ExpansionDirective> {
    let mut parts = value.splitn(3, ':');
    let path = parts.next().unwrap_or_default().trim();
    let collection = parts.next().unwrap_or_default().trim();

    if path.is_empty() || collection.is_empty() {
        return Err(CliError::new(
            CliErrorCode::QueryFailed,
            format!("Invalid expand '{value}', expected path:collection[:fields]"),
        ));
    }

    let fields = parts
        .next()
        .map(|fields| {
            fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Ok(ExpansionDirective::new(path, collection).select(fields))
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// In-memory store loaded from the configured seed directory
async fn seeded_store(config: &Config) -> CliResult<Arc<InMemoryStore>> {
    let store = Arc::new(InMemoryStore::new());

    if !config.seed_path().is_dir() {
        warn!(seed_dir = %config.seed_dir, "seed directory not found, starting empty");
        return Ok(store);
    }

    let report = load_seed_dir(&*store, config.seed_path()).await?;
    info!(documents = report.total(), "seed data loaded");
    Ok(store)
}

fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

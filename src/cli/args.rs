//! CLI argument definitions using clap
//!
//! Commands:
//! - devcamp serve --config <path>
//! - devcamp query --config <path> --collection <name> [--expand <path:collection[:fields]>] <query-string>
//! - devcamp token --config <path> --user <id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// devcamp - bootcamp directory API
#[derive(Parser, Debug)]
#[command(name = "devcamp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load seed data and serve the HTTP API
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run one listing query against the seed data and print the envelope
    Query {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Collection to list
        #[arg(long)]
        collection: String,

        /// Reference to expand, as `path:collection[:field,field]`
        #[arg(long)]
        expand: Option<String>,

        /// URL-encoded filter, e.g. `averageCost[lte]=10000&select=name`
        #[arg(default_value = "")]
        query: String,
    },

    /// Mint a bearer token for a seeded user
    Token {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// User id
        #[arg(long)]
        user: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

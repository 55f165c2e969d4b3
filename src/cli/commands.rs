//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Singer tap for DuckDB databases
#[derive(Parser, Debug)]
#[command(name = "tap-duckdb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show tap metadata and the settings it accepts
    About,

    /// Test that the database can be opened
    Check,

    /// Discover available streams
    Discover,

    /// Export streams as batch files
    Sync {
        /// Streams to sync (comma-separated stream ids, empty = all)
        #[arg(long)]
        streams: Option<String>,

        /// Catalog file (JSON); streams marked selected in its metadata are synced
        #[arg(long, conflicts_with = "streams")]
        catalog: Option<PathBuf>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

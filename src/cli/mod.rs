//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `about` - Show tap metadata and settings schema
//! - `check` - Test that the database can be opened
//! - `discover` - Print the stream catalog
//! - `sync` - Export streams as batch files

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

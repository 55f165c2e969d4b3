//! # tap-duckdb
//!
//! A Singer tap that extracts tables from a local DuckDB database file.
//!
//! Rather than streaming rows through the tap, each table is exported by
//! DuckDB itself with a native `COPY ... TO` statement, producing a CSV or
//! JSON Lines file (optionally gzip compressed) that is announced downstream
//! in a Singer `BATCH` message.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_duckdb::batch::{BatchConfig, BatchEncoding, StorageTarget};
//! use tap_duckdb::config::TapConfig;
//! use tap_duckdb::database::DuckDbConnector;
//! use tap_duckdb::stream::DuckDbStream;
//!
//! let connector = DuckDbConnector::new(TapConfig::new("warehouse.duckdb"));
//! let catalog = connector.discover_catalog()?;
//!
//! let batch_config = BatchConfig::new(
//!     BatchEncoding::jsonl().with_compression("gzip"),
//!     StorageTarget::new("/tmp/out").with_prefix("run1-"),
//! );
//!
//! for entry in &catalog.streams {
//!     let stream = DuckDbStream::new("tap-duckdb", entry.clone(), &connector);
//!     for manifest in stream.get_batches(&batch_config)? {
//!         println!("{:?}", manifest.files);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  CLI: about / check / discover / sync                    │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────┬──────────────────────┐
//! │   database   │      stream        │      protocol        │
//! ├──────────────┼────────────────────┼──────────────────────┤
//! │ Connector    │ get_batches        │ Catalog              │
//! │ TypeMapper   │   └─ batch         │ SCHEMA / BATCH       │
//! │ Discovery    │      CopyCommand   │                      │
//! └──────────────┴────────────────────┴──────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Tap configuration
pub mod config;

/// JSON Schema types and DuckDB type mapping
pub mod schema;

/// DuckDB connection provider and discovery
pub mod database;

/// Batch export via DuckDB COPY
pub mod batch;

/// Singer messages and catalog
pub mod protocol;

/// Streams backed by DuckDB tables
pub mod stream;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name, also used as the tap name in batch file names
pub const NAME: &str = env!("CARGO_PKG_NAME");

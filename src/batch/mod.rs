//! Batch export module
//!
//! Extracts a whole table in one step by asking DuckDB to `COPY` it to a
//! CSV or JSON Lines file, optionally gzip compressed, instead of streaming
//! rows through the tap.
//!
//! # Overview
//!
//! - `BatchConfig` - encoding and storage settings from the tap config
//! - `CopyCommand` - builds the COPY statement and output path
//! - `BatchExporter` - executes the statement and returns a `BatchManifest`

mod command;
mod exporter;
mod types;

pub use command::{copy_options, CopyCommand};
pub use exporter::BatchExporter;
pub use types::{
    BatchConfig, BatchEncoding, BatchFileFormat, BatchManifest, Compression, StorageTarget,
    SyncId,
};

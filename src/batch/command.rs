//! COPY statement builder
//!
//! Builds the `COPY (SELECT * FROM <table>) TO '<path>' (<options>)` statement
//! DuckDB uses to write a query result straight to a file.
//!
//! Quoting rules:
//!
//! - the table name is emitted verbatim; it must come from catalog discovery,
//!   never from user input
//! - the output path and the CSV delimiter are emitted as SQL string literals
//!   with embedded single quotes doubled
//!
//! A CSV export without a header row states `HEADER false`, since DuckDB's
//! `COPY ... TO` writes a header by default.

use super::types::{BatchEncoding, BatchFileFormat, Compression, StorageTarget, SyncId};
use crate::error::{Error, Result};

/// A planned COPY export of one table to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCommand {
    table: String,
    path: String,
    options: Vec<String>,
}

impl CopyCommand {
    /// Plan the export of `table` with the given encoding.
    ///
    /// Unsupported formats and compressions are rejected here, before any
    /// statement reaches the database.
    pub fn plan(
        table: &str,
        encoding: &BatchEncoding,
        storage: &StorageTarget,
        sync_id: &SyncId,
    ) -> Result<Self> {
        let (options, extension) = copy_options(encoding)?;

        let prefix = storage.prefix.as_deref().unwrap_or_default();
        let file_name = format!("{prefix}{sync_id}{extension}");

        Ok(Self {
            table: table.to_string(),
            path: storage.file_path(&file_name),
            options,
        })
    }

    /// Qualified table name being exported
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Output file path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// COPY options, in statement order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Render the full statement
    pub fn to_sql(&self) -> String {
        format!(
            "COPY (SELECT * FROM {}) TO {} ({})",
            self.table,
            quote_literal(&self.path),
            self.options.join(",")
        )
    }
}

/// COPY options and file extension for an encoding
pub fn copy_options(encoding: &BatchEncoding) -> Result<(Vec<String>, String)> {
    match &encoding.format {
        BatchFileFormat::Jsonl => jsonl_options(encoding),
        BatchFileFormat::Csv => csv_options(encoding),
        other => Err(Error::unsupported_format(other.as_str())),
    }
}

fn jsonl_options(encoding: &BatchEncoding) -> Result<(Vec<String>, String)> {
    let mut options = vec!["FORMAT JSON".to_string()];
    let compression = encoding.compression()?;
    push_compression(&mut options, compression);

    Ok((options, format!(".jsonl{}", compression.extension())))
}

fn csv_options(encoding: &BatchEncoding) -> Result<(Vec<String>, String)> {
    let mut options = vec![
        "FORMAT CSV".to_string(),
        format!("DELIMITER {}", quote_literal(&encoding.delimiter.to_string())),
    ];
    // DuckDB writes a CSV header unless told otherwise
    let header = if encoding.header { "HEADER" } else { "HEADER false" };
    options.push(header.to_string());

    let compression = encoding.compression()?;
    push_compression(&mut options, compression);

    Ok((options, format!(".csv{}", compression.extension())))
}

fn push_compression(options: &mut Vec<String>, compression: Compression) {
    if compression == Compression::Gzip {
        options.push("COMPRESSION GZIP".to_string());
    }
}

/// Render a value as a single-quoted SQL string literal
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

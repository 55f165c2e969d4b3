//! DuckDB stream
//!
//! A discovered table bound to the connection provider it is read through.

use crate::batch::{BatchConfig, BatchExporter, BatchManifest};
use crate::database::ConnectionProvider;
use crate::error::Result;
use crate::protocol::CatalogEntry;

/// One table of the database exposed as a stream
pub struct DuckDbStream<'a, P: ConnectionProvider + ?Sized> {
    tap_name: String,
    entry: CatalogEntry,
    provider: &'a P,
}

impl<'a, P: ConnectionProvider + ?Sized> DuckDbStream<'a, P> {
    pub fn new(tap_name: impl Into<String>, entry: CatalogEntry, provider: &'a P) -> Self {
        Self {
            tap_name: tap_name.into(),
            entry,
            provider,
        }
    }

    /// Stream name
    pub fn name(&self) -> &str {
        &self.entry.tap_stream_id
    }

    /// Qualified table name used in generated SQL
    pub fn fully_qualified_name(&self) -> String {
        self.entry.fully_qualified_name()
    }

    /// Export the whole table as batch files.
    ///
    /// Returns one manifest per produced partition; currently a table is
    /// always written as a single file.
    pub fn get_batches(&self, config: &BatchConfig) -> Result<Vec<BatchManifest>> {
        BatchExporter::new(self.provider, self.tap_name.as_str()).export(
            self.name(),
            &self.fully_qualified_name(),
            config,
        )
    }
}

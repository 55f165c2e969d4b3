//! Batch exporter
//!
//! Runs a planned COPY statement on a connection opened for the call and
//! reports what was written.

use super::command::CopyCommand;
use super::types::{BatchConfig, BatchManifest, SyncId};
use crate::database::ConnectionProvider;
use crate::error::Result;

/// Exports whole tables to files through DuckDB's native COPY
pub struct BatchExporter<'a, P: ConnectionProvider + ?Sized> {
    provider: &'a P,
    tap_name: String,
}

impl<'a, P: ConnectionProvider + ?Sized> BatchExporter<'a, P> {
    /// Create an exporter that opens connections through `provider`
    pub fn new(provider: &'a P, tap_name: impl Into<String>) -> Self {
        Self {
            provider,
            tap_name: tap_name.into(),
        }
    }

    /// Export `table_name` for `stream_name` according to `config`.
    ///
    /// Always yields exactly one manifest. The connection is opened after the
    /// command has been planned and dropped as soon as it has run, so invalid
    /// encodings never touch the database.
    pub fn export(
        &self,
        stream_name: &str,
        table_name: &str,
        config: &BatchConfig,
    ) -> Result<Vec<BatchManifest>> {
        let sync_id = SyncId::new(&self.tap_name, stream_name);
        let command = CopyCommand::plan(table_name, &config.encoding, &config.storage, &sync_id)?;
        let sql = command.to_sql();

        tracing::debug!("Executing export: {}", sql);

        {
            let conn = self.provider.connect()?;
            conn.execute_batch(&sql)?;
        }

        tracing::debug!(stream = stream_name, path = command.path(), "Batch file written");

        Ok(vec![BatchManifest {
            encoding: config.encoding.clone(),
            files: vec![command.path().to_string()],
        }])
    }
}

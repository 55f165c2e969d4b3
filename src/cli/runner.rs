//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{config_jsonschema, TapConfig};
use crate::database::DuckDbConnector;
use crate::error::{Error, Result, ResultExt};
use crate::protocol::{Catalog, CatalogEntry, Message};
use crate::stream::DuckDbStream;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing messages to stdout
    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)
    }

    /// Run the CLI command, writing messages to `out`
    pub fn run_to<W: Write>(&self, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Commands::About => self.about(out),
            Commands::Check => self.check(out),
            Commands::Discover => self.discover(out),
            Commands::Sync { streams, catalog } => {
                self.sync(out, streams.as_deref(), catalog.as_deref())
            }
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }

        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config(
                "No configuration given (use --config or --config-json)",
            )),
        }
    }

    /// Show tap metadata
    fn about<W: Write>(&self, out: &mut W) -> Result<()> {
        self.output_message(
            out,
            &json!({
                "name": crate::NAME,
                "description": "Singer tap for DuckDB",
                "version": crate::VERSION,
                "capabilities": ["about", "catalog", "discover", "batch"],
                "settings": config_jsonschema()
            }),
        )
    }

    /// Check database connection
    fn check<W: Write>(&self, out: &mut W) -> Result<()> {
        let connector = DuckDbConnector::new(self.load_config()?);

        let (status, message) = match connector.check_connection() {
            Ok(()) => {
                let stream_count = connector
                    .discover_catalog()
                    .map(|c| c.streams.len())
                    .unwrap_or(0);
                (
                    "SUCCEEDED",
                    format!("Connection successful. Found {stream_count} streams."),
                )
            }
            Err(e) => ("FAILED", format!("Connection check failed: {e}")),
        };

        self.output_message(
            out,
            &json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": {
                    "status": status,
                    "message": message
                }
            }),
        )
    }

    /// Discover streams
    fn discover<W: Write>(&self, out: &mut W) -> Result<()> {
        let connector = DuckDbConnector::new(self.load_config()?);
        let catalog = connector.discover_catalog()?;
        self.output_message(out, &catalog)
    }

    /// Export the selected streams as batch files
    fn sync<W: Write>(
        &self,
        out: &mut W,
        streams: Option<&str>,
        catalog_path: Option<&Path>,
    ) -> Result<()> {
        let sync_start = Instant::now();
        let config = self.load_config()?;
        let batch_config = config.batch_config.clone().ok_or_else(|| {
            Error::config("sync requires 'batch_config'; row-by-row extraction is not supported")
        })?;

        let connector = DuckDbConnector::new(config);
        let catalog = connector.discover_catalog()?;

        let selected = select_streams(&catalog, streams, catalog_path)?;

        fs::create_dir_all(&batch_config.storage.root)
            .with_context(|| format!("Failed to create batch root {}", batch_config.storage.root))?;

        tracing::info!("Starting batch sync for {} streams", selected.len());

        for entry in selected {
            let stream_start = Instant::now();
            let stream = DuckDbStream::new(crate::NAME, entry.clone(), &connector);

            self.output_message(out, &Message::schema(entry))?;

            let manifests = stream.get_batches(&batch_config)?;
            let file_count: usize = manifests.iter().map(|m| m.files.len()).sum();
            for manifest in manifests {
                self.output_message(out, &Message::batch(stream.name(), manifest))?;
            }

            tracing::info!(
                stream = stream.name(),
                files = file_count,
                duration_ms = stream_start.elapsed().as_millis() as u64,
                "Completed batch export"
            );
        }

        tracing::info!(
            duration_ms = sync_start.elapsed().as_millis() as u64,
            "Sync finished"
        );

        Ok(())
    }

    /// Load a catalog file passed back by an orchestrator
    fn load_catalog(path: &Path) -> Result<Catalog> {
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read catalog file {}", path.display())
        })?;
        serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("Invalid catalog {}: {e}", path.display())))
    }

    /// Output a message
    fn output_message<W: Write, T: Serialize>(&self, out: &mut W, msg: &T) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        writeln!(out, "{line}")?;
        Ok(())
    }
}

/// Resolve the streams to sync against the discovered catalog.
///
/// A catalog file selects by metadata; otherwise `--streams` picks ids, and
/// an absent or empty list means every stream.
fn select_streams<'c>(
    catalog: &'c Catalog,
    streams: Option<&str>,
    catalog_path: Option<&Path>,
) -> Result<Vec<&'c CatalogEntry>> {
    if let Some(path) = catalog_path {
        let input = Runner::load_catalog(path)?;
        let ids: Vec<&str> = input
            .selected()
            .into_iter()
            .map(|s| s.tap_stream_id.as_str())
            .collect();
        return catalog.select(&ids);
    }

    let ids: Vec<&str> = streams
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if ids.is_empty() {
        return Ok(catalog.streams.iter().collect());
    }
    catalog.select(&ids)
}

//! Tap configuration
//!
//! The tap takes a single required setting, `database`, plus the optional
//! Singer `batch_config` block that turns on batch export.

use crate::batch::BatchConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// Configuration for the DuckDB tap
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TapConfig {
    /// Path to the DuckDB database file (or `:memory:`)
    pub database: String,

    /// Batch export settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_config: Option<BatchConfig>,
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `database` is declared secret
        f.debug_struct("TapConfig")
            .field("database", &"****")
            .field("batch_config", &self.batch_config)
            .finish()
    }
}

impl TapConfig {
    /// Create a config for the given database path
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            batch_config: None,
        }
    }

    /// Set the batch config
    #[must_use]
    pub fn with_batch_config(mut self, batch_config: BatchConfig) -> Self {
        self.batch_config = Some(batch_config);
        self
    }

    /// Build a config from a JSON value, checking required fields
    pub fn from_value(value: Value) -> Result<Self> {
        match value.get("database") {
            None | Some(Value::Null) => return Err(Error::missing_field("database")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(Error::invalid_value("database", "must not be empty"));
            }
            Some(Value::String(_)) => {}
            Some(_) => return Err(Error::invalid_value("database", "must be a string")),
        }

        serde_json::from_value(value).map_err(|e| Error::config(format!("Invalid config: {e}")))
    }

    /// Parse a config from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json_str)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&content)
    }
}

/// JSON Schema describing the settings the tap accepts
pub fn config_jsonschema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "database": {
                "type": ["string"],
                "description": "Path to the DuckDB database file",
                "secret": true,
                "writeOnly": true
            },
            "batch_config": {
                "type": ["object", "null"],
                "description": "Write streams as batch files using DuckDB COPY",
                "properties": {
                    "encoding": {
                        "type": "object",
                        "properties": {
                            "format": { "type": "string", "enum": ["jsonl", "csv"] },
                            "compression": { "type": ["string", "null"], "enum": ["none", "gzip", null] },
                            "delimiter": { "type": "string", "default": "," },
                            "header": { "type": "boolean", "default": true }
                        },
                        "required": ["format"]
                    },
                    "storage": {
                        "type": "object",
                        "properties": {
                            "root": { "type": "string" },
                            "prefix": { "type": ["string", "null"] }
                        },
                        "required": ["root"]
                    }
                },
                "required": ["encoding", "storage"]
            }
        },
        "required": ["database"]
    })
}

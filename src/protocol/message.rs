//! Singer messages

use super::catalog::CatalogEntry;
use crate::batch::{BatchEncoding, BatchManifest};
use crate::schema::JsonSchema;
use serde::Serialize;

/// A message emitted on stdout during a sync
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Message {
    /// Schema of a stream, sent before any of its data
    Schema {
        stream: String,
        schema: JsonSchema,
        key_properties: Vec<String>,
    },
    /// Files holding a batch of a stream's records
    Batch {
        stream: String,
        encoding: BatchEncoding,
        manifest: Vec<String>,
    },
}

impl Message {
    /// Create a schema message for a catalog entry
    pub fn schema(entry: &CatalogEntry) -> Self {
        Self::Schema {
            stream: entry.tap_stream_id.clone(),
            schema: entry.schema.clone(),
            key_properties: entry.key_properties.clone(),
        }
    }

    /// Create a batch message from an export manifest
    pub fn batch(stream: impl Into<String>, manifest: BatchManifest) -> Self {
        Self::Batch {
            stream: stream.into(),
            encoding: manifest.encoding,
            manifest: manifest.files,
        }
    }
}

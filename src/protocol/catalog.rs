//! Discovery catalog
//!
//! Entries carry Singer metadata so an orchestrator can hand the catalog back
//! with `selected` set on the streams it wants synced.

use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Streams available in the database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Look up a stream by its id
    pub fn get(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.tap_stream_id == tap_stream_id)
    }

    /// Select streams by id, keeping the requested order.
    ///
    /// Unknown ids are an error rather than being skipped.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&CatalogEntry>> {
        ids.iter()
            .map(|id| {
                let id = id.as_ref();
                self.get(id).ok_or_else(|| Error::StreamNotFound {
                    stream: id.to_string(),
                })
            })
            .collect()
    }

    /// Streams whose metadata marks them as selected
    pub fn selected(&self) -> Vec<&CatalogEntry> {
        self.streams.iter().filter(|s| s.is_selected()).collect()
    }
}

/// Singer metadata attached to one breadcrumb of a stream.
///
/// The empty breadcrumb addresses the stream itself; `["properties", name]`
/// addresses a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    #[serde(default)]
    pub breadcrumb: Vec<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl MetadataEntry {
    fn new(breadcrumb: Vec<String>, metadata: Value) -> Self {
        let metadata = match metadata {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            breadcrumb,
            metadata,
        }
    }
}

/// A single table exposed as a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique stream id: `{schema}-{table}`
    pub tap_stream_id: String,
    /// Stream name, same as the id
    pub stream: String,
    pub table_name: String,
    pub schema_name: String,
    pub schema: JsonSchema,
    #[serde(default)]
    pub key_properties: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

impl CatalogEntry {
    pub fn new(
        schema_name: &str,
        table_name: &str,
        schema: JsonSchema,
        key_properties: Vec<String>,
    ) -> Self {
        let id = format!("{schema_name}-{table_name}");
        Self {
            tap_stream_id: id.clone(),
            stream: id,
            table_name: table_name.to_string(),
            schema_name: schema_name.to_string(),
            schema,
            key_properties,
            metadata: Vec::new(),
        }
    }

    /// Replace the metadata with the standard entries for this stream's
    /// schema and keys. Key columns are always included; every stream is
    /// selected by default and replicated as a full table.
    #[must_use]
    pub fn with_standard_metadata(mut self) -> Self {
        let mut metadata = vec![MetadataEntry::new(
            Vec::new(),
            json!({
                "inclusion": "available",
                "selected-by-default": true,
                "forced-replication-method": "FULL_TABLE",
                "table-key-properties": self.key_properties,
                "schema-name": self.schema_name,
            }),
        )];

        for name in self.schema.properties.keys() {
            let inclusion = if self.key_properties.contains(name) {
                "automatic"
            } else {
                "available"
            };
            metadata.push(MetadataEntry::new(
                vec!["properties".to_string(), name.clone()],
                json!({ "inclusion": inclusion }),
            ));
        }

        self.metadata = metadata;
        self
    }

    /// Whether the stream is selected for sync.
    ///
    /// An explicit `selected` on the stream breadcrumb wins over
    /// `selected-by-default`; a stream without metadata is not selected.
    pub fn is_selected(&self) -> bool {
        let Some(root) = self.metadata.iter().find(|m| m.breadcrumb.is_empty()) else {
            return false;
        };
        root.metadata
            .get("selected")
            .or_else(|| root.metadata.get("selected-by-default"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// `{schema}.{table}`, as used in generated SQL
    pub fn fully_qualified_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}

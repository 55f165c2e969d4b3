//! Batch request, encoding and manifest types
//!
//! These mirror the Singer `batch_config` shape so they can be read straight
//! out of the tap configuration and echoed back in `BATCH` messages.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Batch file format
///
/// Values are matched exactly. Anything that is not a known format name is
/// kept verbatim in `Other` so the export can report it; `Parquet` is a valid
/// Singer batch format but not one produced here. Both fail when the export
/// is planned, not when the configuration is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatchFileFormat {
    /// JSON Lines, one object per row
    Jsonl,
    /// Delimited text
    Csv,
    /// Apache Parquet
    Parquet,
    /// Unrecognised format name
    Other(String),
}

impl BatchFileFormat {
    /// Name of the format as it appears in configuration
    pub fn as_str(&self) -> &str {
        match self {
            BatchFileFormat::Jsonl => "jsonl",
            BatchFileFormat::Csv => "csv",
            BatchFileFormat::Parquet => "parquet",
            BatchFileFormat::Other(name) => name,
        }
    }
}

impl From<String> for BatchFileFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "jsonl" => BatchFileFormat::Jsonl,
            "csv" => BatchFileFormat::Csv,
            "parquet" => BatchFileFormat::Parquet,
            _ => BatchFileFormat::Other(value),
        }
    }
}

impl From<BatchFileFormat> for String {
    fn from(format: BatchFileFormat) -> Self {
        match format {
            BatchFileFormat::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for BatchFileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compression applied to a batch file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

impl Compression {
    /// Parse the raw compression value from an encoding.
    ///
    /// An absent value and `"none"` both mean no compression.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("none") => Ok(Compression::None),
            Some("gzip") => Ok(Compression::Gzip),
            Some(other) => Err(Error::unsupported_compression(other)),
        }
    }

    /// File extension suffix for the compression type
    pub fn extension(&self) -> &'static str {
        match self {
            Compression::None => "",
            Compression::Gzip => ".gz",
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

/// Encoding of a batch file: format, compression and CSV dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEncoding {
    /// File format
    pub format: BatchFileFormat,

    /// Compression, kept verbatim so unsupported values can be reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,

    /// Field delimiter (CSV only)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether to write a header row (CSV only)
    #[serde(default = "default_true")]
    pub header: bool,
}

impl BatchEncoding {
    /// Create an encoding for the given format with default settings
    pub fn new(format: BatchFileFormat) -> Self {
        Self {
            format,
            compression: None,
            delimiter: default_delimiter(),
            header: true,
        }
    }

    /// Uncompressed JSON Lines
    pub fn jsonl() -> Self {
        Self::new(BatchFileFormat::Jsonl)
    }

    /// Uncompressed CSV with a header row and `,` delimiter
    pub fn csv() -> Self {
        Self::new(BatchFileFormat::Csv)
    }

    /// Set the compression value
    #[must_use]
    pub fn with_compression(mut self, compression: &str) -> Self {
        self.compression = Some(compression.to_string());
        self
    }

    /// Set the CSV delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the CSV header row is written
    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Parsed compression setting
    pub fn compression(&self) -> Result<Compression> {
        Compression::parse(self.compression.as_deref())
    }
}

/// Where batch files are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageTarget {
    /// Base directory for output files
    pub root: String,

    /// Segment prepended to every generated file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl StorageTarget {
    /// Create a storage target rooted at `root` with no prefix
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: None,
        }
    }

    /// Set the file name prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Absolute path for a file name under this target
    pub fn file_path(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.root.trim_end_matches('/'))
    }
}

/// Batch settings for a sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub encoding: BatchEncoding,
    pub storage: StorageTarget,
}

impl BatchConfig {
    pub fn new(encoding: BatchEncoding, storage: StorageTarget) -> Self {
        Self { encoding, storage }
    }
}

/// Description of the files produced by one batch export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchManifest {
    /// Encoding the files were written with
    pub encoding: BatchEncoding,
    /// Produced files, in order
    pub files: Vec<String>,
}

/// Unique name for a single export: `{tap}--{stream}-{uuid}`
///
/// Minted fresh for every export call so repeated or concurrent exports of
/// the same stream never write to the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncId {
    tap_name: String,
    stream_name: String,
    token: Uuid,
}

impl SyncId {
    /// Mint a new identifier with a random token
    pub fn new(tap_name: &str, stream_name: &str) -> Self {
        Self::with_token(tap_name, stream_name, Uuid::new_v4())
    }

    /// Build an identifier with a known token
    pub fn with_token(tap_name: &str, stream_name: &str, token: Uuid) -> Self {
        Self {
            tap_name: tap_name.to_string(),
            stream_name: stream_name.to_string(),
            token,
        }
    }

    pub fn token(&self) -> Uuid {
        self.token
    }
}

impl std::fmt::Display for SyncId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}--{}-{}", self.tap_name, self.stream_name, self.token)
    }
}

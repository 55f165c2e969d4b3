//! Error types for tap-duckdb
//!
//! This module defines the error hierarchy for the whole tap.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for tap-duckdb
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Batch Errors
    // ============================================================================
    #[error("Unsupported batch file format: {format}")]
    UnsupportedBatchFormat { format: String },

    #[error("Unsupported batch compression: {compression}")]
    UnsupportedBatchCompression { compression: String },

    // ============================================================================
    // Database Errors
    // ============================================================================
    #[error("DuckDB error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("Connection check failed: {message}")]
    ConnectionCheck { message: String },

    #[error("Stream '{stream}' not found in catalog")]
    StreamNotFound { stream: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported batch format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedBatchFormat {
            format: format.into(),
        }
    }

    /// Create an unsupported batch compression error
    pub fn unsupported_compression(compression: impl Into<String>) -> Self {
        Self::UnsupportedBatchCompression {
            compression: compression.into(),
        }
    }

    /// Create a connection check error
    pub fn connection_check(message: impl Into<String>) -> Self {
        Self::ConnectionCheck {
            message: message.into(),
        }
    }

    /// Check if this error was raised while validating a batch request,
    /// before anything was sent to the database
    pub fn is_batch_validation(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedBatchFormat { .. } | Error::UnsupportedBatchCompression { .. }
        )
    }
}

/// Result type alias for tap-duckdb
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

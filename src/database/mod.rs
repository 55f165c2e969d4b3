//! Database connectivity for DuckDB
//!
//! The tap talks to the database through two small capabilities:
//!
//! - `ConnectionProvider` - builds the `duckdb:///` locator and opens
//!   short-lived connections
//! - `TypeMapper` - translates column types to JSON Schema and back; the
//!   provided methods use the default mapping from [`crate::schema`]

mod engine;

pub use engine::{DuckDbConnector, URL_SCHEME};

use crate::config::TapConfig;
use crate::error::Result;
use crate::schema::{self, SchemaProperty};
use duckdb::Connection;

/// Source of database connections
pub trait ConnectionProvider {
    /// Build the connection locator for `config`
    fn build_connection_string(&self, config: &TapConfig) -> String;

    /// Open a new connection owned by the caller.
    ///
    /// The connection is closed when the returned value is dropped.
    fn connect(&self) -> Result<Connection>;
}

/// Column type translation
pub trait TypeMapper {
    /// Map a database column type to a JSON Schema fragment
    fn to_jsonschema_type(&self, sql_type: &str) -> SchemaProperty {
        schema::to_jsonschema_type(sql_type)
    }

    /// Map a JSON Schema fragment to a database column type
    fn to_sql_type(&self, property: &SchemaProperty) -> String {
        schema::to_sql_type(property)
    }
}

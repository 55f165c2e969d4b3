//! Schema module
//!
//! JSON Schema types for discovered streams and the default mapping
//! between DuckDB column types and JSON Schema fragments.

mod mapping;
mod types;

pub use mapping::{to_jsonschema_type, to_sql_type};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};

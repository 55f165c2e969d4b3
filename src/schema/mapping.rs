//! Default mapping between DuckDB column types and JSON Schema
//!
//! Type names are matched case-insensitively on their base name, so
//! `DECIMAL(18,3)` maps like `DECIMAL` and `STRUCT(a INTEGER)` like `STRUCT`.
//! List types (`INTEGER[]`, `VARCHAR[3]`) map to arrays of their element type.

use super::types::{JsonType, SchemaProperty};
use regex::Regex;
use std::sync::LazyLock;

/// Splits a type name into its base name and optional parameter list
static TYPE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z_][A-Z0-9_ ]*?)\s*(\(.*\))?$").unwrap());

const INTEGER_TYPES: &[&str] = &[
    "TINYINT", "SMALLINT", "INTEGER", "BIGINT", "HUGEINT", "UTINYINT", "USMALLINT", "UINTEGER",
    "UBIGINT", "UHUGEINT", "INT", "INT1", "INT2", "INT4", "INT8", "SHORT", "LONG", "SIGNED",
];

const NUMBER_TYPES: &[&str] = &[
    "DOUBLE", "FLOAT", "REAL", "FLOAT4", "FLOAT8", "DECIMAL", "NUMERIC",
];

const BOOLEAN_TYPES: &[&str] = &["BOOLEAN", "BOOL", "LOGICAL"];

const OBJECT_TYPES: &[&str] = &["JSON", "STRUCT", "MAP"];

/// Extract the upper-cased base name of a (possibly parameterized) type
fn base_type_name(sql_type: &str) -> String {
    let upper = sql_type.trim().to_uppercase();
    TYPE_NAME_REGEX
        .captures(&upper)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| upper.clone(), |m| m.as_str().to_string())
}

/// Map a DuckDB type name to a JSON Schema fragment
pub fn to_jsonschema_type(sql_type: &str) -> SchemaProperty {
    let trimmed = sql_type.trim();

    // Lists: INTEGER[], VARCHAR[][], DOUBLE[3]
    if trimmed.ends_with(']') {
        if let Some(open) = trimmed.rfind('[') {
            return SchemaProperty::array(to_jsonschema_type(&trimmed[..open]));
        }
    }

    let base = base_type_name(trimmed);
    let base = base.as_str();

    if INTEGER_TYPES.contains(&base) {
        SchemaProperty::new(JsonType::Integer)
    } else if NUMBER_TYPES.contains(&base) {
        SchemaProperty::new(JsonType::Number)
    } else if BOOLEAN_TYPES.contains(&base) {
        SchemaProperty::new(JsonType::Boolean)
    } else if base == "DATE" {
        SchemaProperty::new(JsonType::String).with_format("date")
    } else if base.starts_with("TIMESTAMP") || base == "DATETIME" {
        SchemaProperty::new(JsonType::String).with_format("date-time")
    } else if base.starts_with("TIME") {
        SchemaProperty::new(JsonType::String).with_format("time")
    } else if OBJECT_TYPES.contains(&base) {
        SchemaProperty::new(JsonType::Object)
    } else if base == "LIST" {
        SchemaProperty::array(SchemaProperty::new(JsonType::String))
    } else {
        SchemaProperty::new(JsonType::String)
    }
}

/// Map a JSON Schema fragment to a DuckDB type name
pub fn to_sql_type(property: &SchemaProperty) -> String {
    match property.primary_type() {
        Some(JsonType::Integer) => "BIGINT".to_string(),
        Some(JsonType::Number) => "DOUBLE".to_string(),
        Some(JsonType::Boolean) => "BOOLEAN".to_string(),
        Some(JsonType::Object) => "JSON".to_string(),
        Some(JsonType::Array) => match &property.items {
            Some(items) => format!("{}[]", to_sql_type(items)),
            None => "VARCHAR[]".to_string(),
        },
        Some(JsonType::String) => match property.format.as_deref() {
            Some("date-time") => "TIMESTAMP".to_string(),
            Some("date") => "DATE".to_string(),
            Some("time") => "TIME".to_string(),
            _ => "VARCHAR".to_string(),
        },
        Some(JsonType::Null) | None => "VARCHAR".to_string(),
    }
}

//! DuckDB connector
//!
//! Opens the configured database file read-only, discovers its tables and
//! hands out one connection per operation.

use super::{ConnectionProvider, TypeMapper};
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::protocol::{Catalog, CatalogEntry};
use crate::schema::JsonSchema;
use duckdb::{AccessMode, Config, Connection};
use std::collections::HashMap;

/// Scheme used in connection locators: `duckdb:///{database}`
pub const URL_SCHEME: &str = "duckdb";

/// Path that selects an in-memory database
const MEMORY_DATABASE: &str = ":memory:";

const COLUMNS_QUERY: &str = "SELECT table_schema, table_name, column_name, data_type, is_nullable
     FROM information_schema.columns
     WHERE table_catalog = current_database()
       AND table_schema NOT IN ('information_schema', 'pg_catalog')
     ORDER BY table_schema, table_name, ordinal_position";

const PRIMARY_KEYS_QUERY: &str = "SELECT kcu.table_schema, kcu.table_name, kcu.column_name
     FROM information_schema.key_column_usage kcu
     JOIN information_schema.table_constraints tc
       ON kcu.constraint_name = tc.constraint_name
      AND kcu.table_schema = tc.table_schema
      AND kcu.table_name = tc.table_name
     WHERE tc.constraint_type = 'PRIMARY KEY'
     ORDER BY kcu.table_schema, kcu.table_name, kcu.ordinal_position";

/// One row of `information_schema.columns`
struct ColumnRow {
    schema: String,
    table: String,
    column: String,
    data_type: String,
    nullable: bool,
}

/// Connector for a DuckDB database file
#[derive(Debug, Clone)]
pub struct DuckDbConnector {
    config: TapConfig,
}

impl DuckDbConnector {
    /// Create a connector for the database named in `config`
    pub fn new(config: TapConfig) -> Self {
        Self { config }
    }

    /// Locator for the configured database
    pub fn connection_string(&self) -> String {
        self.build_connection_string(&self.config)
    }

    /// Test that the database can be opened and queried
    pub fn check_connection(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map_err(|e| Error::connection_check(e.to_string()))?;
        Ok(())
    }

    /// Discover every user table and view as a catalog stream
    pub fn discover_catalog(&self) -> Result<Catalog> {
        let conn = self.connect()?;
        let columns = read_columns(&conn)?;
        let primary_keys = read_primary_keys(&conn);

        let mut streams: Vec<CatalogEntry> = Vec::new();
        for col in columns {
            let starts_new_table = streams
                .last()
                .map_or(true, |e| e.schema_name != col.schema || e.table_name != col.table);
            if starts_new_table {
                let key_properties = primary_keys
                    .get(&(col.schema.clone(), col.table.clone()))
                    .cloned()
                    .unwrap_or_default();
                streams.push(CatalogEntry::new(
                    &col.schema,
                    &col.table,
                    JsonSchema::new(),
                    key_properties,
                ));
            }

            let Some(entry) = streams.last_mut() else {
                continue;
            };

            let mut property = self.to_jsonschema_type(&col.data_type);
            if col.nullable {
                property = property.into_nullable();
            }
            entry.schema.add_property(&col.column, property);
            if entry.key_properties.contains(&col.column) {
                entry.schema.add_required(&col.column);
            }
        }

        tracing::debug!("Discovered {} streams", streams.len());

        let streams = streams
            .into_iter()
            .map(CatalogEntry::with_standard_metadata)
            .collect();
        Ok(Catalog { streams })
    }
}

impl ConnectionProvider for DuckDbConnector {
    fn build_connection_string(&self, config: &TapConfig) -> String {
        format!("{URL_SCHEME}:///{}", config.database)
    }

    fn connect(&self) -> Result<Connection> {
        let locator = self.connection_string();
        let path = database_path(&locator)?;

        if path == MEMORY_DATABASE {
            return Ok(Connection::open_in_memory()?);
        }

        let flags = Config::default().access_mode(AccessMode::ReadOnly)?;
        Ok(Connection::open_with_flags(path, flags)?)
    }
}

impl TypeMapper for DuckDbConnector {}

/// Extract the database path from a `duckdb:///` locator
fn database_path(locator: &str) -> Result<&str> {
    locator
        .strip_prefix(URL_SCHEME)
        .and_then(|rest| rest.strip_prefix(":///"))
        .filter(|path| !path.is_empty())
        .ok_or_else(|| {
            Error::invalid_value("database", format!("Invalid DuckDB locator: {locator}"))
        })
}

fn read_columns(conn: &Connection) -> Result<Vec<ColumnRow>> {
    let mut stmt = conn.prepare(COLUMNS_QUERY)?;
    let rows = stmt.query_map([], |row| {
        let is_nullable: String = row.get(4)?;
        Ok(ColumnRow {
            schema: row.get(0)?,
            table: row.get(1)?,
            column: row.get(2)?,
            data_type: row.get(3)?,
            nullable: is_nullable.eq_ignore_ascii_case("YES"),
        })
    })?;

    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Primary key columns per `(schema, table)`.
///
/// Key discovery is best effort: a failure is logged and leaves every
/// stream without key properties.
fn read_primary_keys(conn: &Connection) -> HashMap<(String, String), Vec<String>> {
    let query = || -> Result<Vec<(String, String, String)>> {
        let mut stmt = conn.prepare(PRIMARY_KEYS_QUERY)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    };

    match query() {
        Ok(rows) => {
            let mut keys: HashMap<(String, String), Vec<String>> = HashMap::new();
            for (schema, table, column) in rows {
                keys.entry((schema, table)).or_default().push(column);
            }
            keys
        }
        Err(e) => {
            tracing::warn!("Failed to read primary keys: {}", e);
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::JsonType;
    use pretty_assertions::assert_eq;

    /// Create a database file with a couple of tables and return its path
    fn sample_database(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("sample.duckdb");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE events (
                 id INTEGER PRIMARY KEY,
                 name VARCHAR,
                 amount DECIMAL(10,2) NOT NULL,
                 happened_at TIMESTAMP
             );
             INSERT INTO events VALUES (1, 'signup', 10.50, '2024-01-01 10:00:00');
             CREATE SCHEMA analytics;
             CREATE TABLE analytics.tags (tag VARCHAR, ids INTEGER[]);",
        )
        .unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_build_connection_string() {
        let connector = DuckDbConnector::new(TapConfig::new("/data/warehouse.duckdb"));
        assert_eq!(
            connector.connection_string(),
            "duckdb:////data/warehouse.duckdb"
        );

        let relative = TapConfig::new("local.duckdb");
        assert_eq!(
            connector.build_connection_string(&relative),
            "duckdb:///local.duckdb"
        );
    }

    #[test]
    fn test_database_path() {
        assert_eq!(
            database_path("duckdb:////data/warehouse.duckdb").unwrap(),
            "/data/warehouse.duckdb"
        );
        assert_eq!(database_path("duckdb:///:memory:").unwrap(), ":memory:");
        assert!(database_path("postgres://localhost/db").is_err());
        assert!(database_path("duckdb:///").is_err());
    }

    #[test]
    fn test_check_connection_in_memory() {
        let connector = DuckDbConnector::new(TapConfig::new(":memory:"));
        assert!(connector.check_connection().is_ok());
    }

    #[test]
    fn test_connect_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.duckdb");
        let connector = DuckDbConnector::new(TapConfig::new(missing.to_string_lossy()));

        assert!(connector.connect().is_err());
        // Read-only access must not create the file
        assert!(!missing.exists());
    }

    #[test]
    fn test_discover_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let connector = DuckDbConnector::new(TapConfig::new(sample_database(&dir)));

        let catalog = connector.discover_catalog().unwrap();
        let ids: Vec<&str> = catalog
            .streams
            .iter()
            .map(|s| s.tap_stream_id.as_str())
            .collect();
        assert_eq!(ids, vec!["analytics-tags", "main-events"]);

        let events = catalog.get("main-events").unwrap();
        assert_eq!(events.fully_qualified_name(), "main.events");
        assert_eq!(events.key_properties, vec!["id".to_string()]);
        assert_eq!(events.schema.required, vec!["id".to_string()]);

        let id = events.schema.get_property("id").unwrap();
        assert_eq!(id.primary_type(), Some(&JsonType::Integer));
        assert!(!id.is_nullable());

        let name = events.schema.get_property("name").unwrap();
        assert!(name.is_nullable());

        let amount = events.schema.get_property("amount").unwrap();
        assert_eq!(amount.primary_type(), Some(&JsonType::Number));
        assert!(!amount.is_nullable());

        assert!(events.is_selected());
        assert_eq!(
            events.metadata[0].metadata["table-key-properties"],
            serde_json::json!(["id"])
        );

        let happened_at = events.schema.get_property("happened_at").unwrap();
        assert_eq!(happened_at.format.as_deref(), Some("date-time"));

        let tags = catalog.get("analytics-tags").unwrap();
        assert!(tags.key_properties.is_empty());
        let ids = tags.schema.get_property("ids").unwrap();
        assert_eq!(ids.primary_type(), Some(&JsonType::Array));
    }

    #[test]
    fn test_discover_empty_database() {
        let connector = DuckDbConnector::new(TapConfig::new(":memory:"));
        let catalog = connector.discover_catalog().unwrap();
        assert!(catalog.streams.is_empty());
    }
}

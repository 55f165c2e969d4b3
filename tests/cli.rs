//! CLI integration tests
//!
//! Drive the runner the way the binary does and inspect the emitted messages.

use clap::Parser;
use serde_json::{json, Value};
use tap_duckdb::cli::{Cli, Runner};
use tap_duckdb::Error;
use tempfile::TempDir;

fn create_database(dir: &TempDir) -> String {
    let path = dir.path().join("shop.duckdb");
    let conn = duckdb::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE orders (id BIGINT PRIMARY KEY, total DOUBLE, placed_on DATE);
         INSERT INTO orders VALUES (1, 9.99, '2024-03-01'), (2, 20.0, '2024-03-02');
         CREATE TABLE customers (id BIGINT, email VARCHAR);
         INSERT INTO customers VALUES (1, 'a@example.com');",
    )
    .unwrap();
    path.to_string_lossy().to_string()
}

/// Run the CLI with `args` and return the emitted JSON messages
fn run(args: &[&str]) -> tap_duckdb::Result<Vec<Value>> {
    let cli = Cli::try_parse_from(std::iter::once("tap-duckdb").chain(args.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    Runner::new(cli).run_to(&mut out)?;

    Ok(String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect())
}

#[test]
fn test_about() {
    let messages = run(&["about"]).unwrap();
    assert_eq!(messages.len(), 1);

    let about = &messages[0];
    assert_eq!(about["name"], "tap-duckdb");
    assert_eq!(about["settings"]["required"], json!(["database"]));
    assert!(about["capabilities"]
        .as_array()
        .unwrap()
        .contains(&json!("batch")));
}

#[test]
fn test_check_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = json!({ "database": create_database(&dir) }).to_string();

    let messages = run(&["--config-json", &config, "check"]).unwrap();
    assert_eq!(messages[0]["type"], "CONNECTION_STATUS");
    assert_eq!(messages[0]["connectionStatus"]["status"], "SUCCEEDED");
}

#[test]
fn test_check_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.duckdb");
    let config = json!({ "database": missing.to_string_lossy() }).to_string();

    let messages = run(&["--config-json", &config, "check"]).unwrap();
    assert_eq!(messages[0]["connectionStatus"]["status"], "FAILED");
}

#[test]
fn test_discover_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        json!({ "database": create_database(&dir) }).to_string(),
    )
    .unwrap();

    let messages = run(&["--config", config_path.to_str().unwrap(), "discover"]).unwrap();
    let streams = messages[0]["streams"].as_array().unwrap();
    let ids: Vec<&str> = streams
        .iter()
        .map(|s| s["tap_stream_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["main-customers", "main-orders"]);

    let orders = &streams[1];
    assert_eq!(orders["key_properties"], json!(["id"]));
    assert_eq!(
        orders["schema"]["properties"]["placed_on"],
        json!({ "type": ["string", "null"], "format": "date" })
    );
}

#[test]
fn test_sync_emits_schema_then_batch() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("batches");
    let config = json!({
        "database": create_database(&dir),
        "batch_config": {
            "encoding": { "format": "jsonl", "compression": "gzip" },
            "storage": { "root": root.to_string_lossy(), "prefix": "nightly-" }
        }
    })
    .to_string();

    let messages = run(&["--config-json", &config, "sync", "--streams", "main-orders"]).unwrap();
    assert_eq!(messages.len(), 2);

    assert_eq!(messages[0]["type"], "SCHEMA");
    assert_eq!(messages[0]["stream"], "main-orders");

    let batch = &messages[1];
    assert_eq!(batch["type"], "BATCH");
    assert_eq!(batch["stream"], "main-orders");
    assert_eq!(batch["encoding"]["format"], "jsonl");
    assert_eq!(batch["encoding"]["compression"], "gzip");

    let files = batch["manifest"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    let file = files[0].as_str().unwrap();
    assert!(file.contains("/nightly-tap-duckdb--main-orders-"));
    assert!(file.ends_with(".jsonl.gz"));
    assert!(std::path::Path::new(file).exists());
}

#[test]
fn test_sync_all_streams() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("batches");
    let config = json!({
        "database": create_database(&dir),
        "batch_config": {
            "encoding": { "format": "csv" },
            "storage": { "root": root.to_string_lossy() }
        }
    })
    .to_string();

    let messages = run(&["--config-json", &config, "sync"]).unwrap();
    let batches: Vec<&Value> = messages.iter().filter(|m| m["type"] == "BATCH").collect();
    assert_eq!(batches.len(), 2);
    assert_eq!(std::fs::read_dir(&root).unwrap().count(), 2);
}

#[test]
fn test_sync_requires_batch_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = json!({ "database": create_database(&dir) }).to_string();

    let err = run(&["--config-json", &config, "sync"]).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_sync_unknown_stream() {
    let dir = tempfile::tempdir().unwrap();
    let config = json!({
        "database": create_database(&dir),
        "batch_config": {
            "encoding": { "format": "jsonl" },
            "storage": { "root": dir.path().join("out").to_string_lossy() }
        }
    })
    .to_string();

    let err = run(&["--config-json", &config, "sync", "--streams", "main-nope"]).unwrap_err();
    assert!(matches!(err, Error::StreamNotFound { .. }));
}

#[test]
fn test_sync_unsupported_format() {
    let dir = tempfile::tempdir().unwrap();
    let config = json!({
        "database": create_database(&dir),
        "batch_config": {
            "encoding": { "format": "parquet" },
            "storage": { "root": dir.path().join("out").to_string_lossy() }
        }
    })
    .to_string();

    let err = run(&["--config-json", &config, "sync", "--streams", "main-orders"]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedBatchFormat { .. }));
}

#[test]
fn test_sync_empty_stream_list_means_all() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("batches");
    let config = json!({
        "database": create_database(&dir),
        "batch_config": {
            "encoding": { "format": "csv" },
            "storage": { "root": root.to_string_lossy() }
        }
    })
    .to_string();

    let messages = run(&["--config-json", &config, "sync", "--streams", ""]).unwrap();
    let streams: Vec<&str> = messages
        .iter()
        .filter(|m| m["type"] == "BATCH")
        .map(|m| m["stream"].as_str().unwrap())
        .collect();
    assert_eq!(streams, vec!["main-customers", "main-orders"]);
}

#[test]
fn test_discover_emits_selection_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let config = json!({ "database": create_database(&dir) }).to_string();

    let messages = run(&["--config-json", &config, "discover"]).unwrap();
    let orders = &messages[0]["streams"][1];
    let root = &orders["metadata"][0];
    assert_eq!(root["breadcrumb"], json!([]));
    assert_eq!(root["metadata"]["selected-by-default"], true);
    assert_eq!(root["metadata"]["table-key-properties"], json!(["id"]));

    let id_column = orders["metadata"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["breadcrumb"] == json!(["properties", "id"]))
        .unwrap();
    assert_eq!(id_column["metadata"]["inclusion"], "automatic");
}

#[test]
fn test_sync_selects_streams_from_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let database = create_database(&dir);
    let root = dir.path().join("batches");
    let config = json!({
        "database": database,
        "batch_config": {
            "encoding": { "format": "jsonl" },
            "storage": { "root": root.to_string_lossy() }
        }
    })
    .to_string();

    // Discover, then deselect customers the way an orchestrator would
    let mut catalog = run(&["--config-json", &config, "discover"]).unwrap().remove(0);
    for stream in catalog["streams"].as_array_mut().unwrap() {
        let selected = stream["tap_stream_id"] == "main-orders";
        stream["metadata"][0]["metadata"]["selected"] = json!(selected);
    }
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(&catalog_path, catalog.to_string()).unwrap();

    let messages = run(&[
        "--config-json",
        &config,
        "sync",
        "--catalog",
        catalog_path.to_str().unwrap(),
    ])
    .unwrap();
    let streams: Vec<&str> = messages
        .iter()
        .map(|m| m["stream"].as_str().unwrap())
        .collect();
    assert_eq!(streams, vec!["main-orders", "main-orders"]);
    assert_eq!(std::fs::read_dir(&root).unwrap().count(), 1);
}

#[test]
fn test_sync_rejects_unknown_formats_from_config() {
    for format in ["avro", "PARQUET"] {
        let dir = tempfile::tempdir().unwrap();
        let config = json!({
            "database": create_database(&dir),
            "batch_config": {
                "encoding": { "format": format },
                "storage": { "root": dir.path().join("out").to_string_lossy() }
            }
        })
        .to_string();

        let err = run(&["--config-json", &config, "sync"]).unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedBatchFormat { format: ref value } if value == format),
            "{err}"
        );
    }
}

#[test]
fn test_missing_config() {
    let err = run(&["discover"]).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

//! CLI command implementations
//!
//! Every command follows the same sequence: load the config, open what it
//! needs (store, object store, or both), run one operation, close the
//! store, print one JSON response.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::export::{publish_versioned, PrefixExporter, Sink};
use crate::ingest::DocumentIngestor;
use crate::object_store::{
    bucket_name_for, download_to_file, validate_bucket_name, LocalObjectStore, ObjectStore,
};
use crate::observability::{log_event_with_fields, Event};
use crate::store::NamespacedStore;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let data = match cmd {
        Command::Ingest { config, file } => ingest(&load_config(&config)?, &file)?,
        Command::Export {
            config,
            prefix,
            out,
        } => export(&load_config(&config)?, &prefix, out.as_deref())?,
        Command::Publish {
            config,
            prefix,
            bucket,
        } => publish(&load_config(&config)?, &prefix, bucket.as_deref())?,
        Command::Fetch {
            config,
            bucket,
            object,
            out,
        } => fetch(&load_config(&config)?, &bucket, &object, &out)?,
        Command::Get { config, key } => get(&load_config(&config)?, &key)?,
        Command::Delete { config, key } => delete(&load_config(&config)?, &key)?,
        Command::List { config, bucket } => list(&load_config(&config)?, &bucket)?,
    };

    write_response(data)
}

/// Load and validate the config file, then apply its log level
pub fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    config.apply_log_level()?;

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("path", &path.display().to_string()),
            ("db_path", config.db_path.as_str()),
        ],
    );
    Ok(config)
}

/// Parse a STEP file and store its records under the file's stem
pub fn ingest(config: &Config, file: &Path) -> CliResult<Value> {
    let store = open_store(config)?;

    let result = DocumentIngestor::with_config(&store, config.ingest_config())
        .and_then(|ingestor| ingestor.ingest_file(file));
    close_store(store, config)?;
    let report = result?;

    Ok(json!({
        "namespace": report.namespace,
        "records": report.records,
        "batches": report.batches,
        "skipped_lines": report.parse.map(|stats| stats.skipped).unwrap_or(0),
    }))
}

/// Rebuild `prefix` into a local file
///
/// Without `out` the file lands in `export_dir` as `<prefix>.stp`.
pub fn export(config: &Config, prefix: &str, out: Option<&Path>) -> CliResult<Value> {
    let path = match out {
        Some(path) => path.to_path_buf(),
        None => config.export_path(prefix),
    };

    let store = open_store(config)?;
    let result = PrefixExporter::new(&store).export(prefix, Sink::local(&path));
    close_store(store, config)?;
    let report = result?;

    Ok(json!({
        "prefix": report.prefix,
        "records": report.records,
        "bytes": report.bytes,
        "path": report.destination,
    }))
}

/// Export `prefix` as the next versioned object in a bucket
pub fn publish(config: &Config, prefix: &str, bucket: Option<&str>) -> CliResult<Value> {
    let bucket = match bucket {
        Some(name) => {
            validate_bucket_name(name)?;
            name.to_string()
        }
        None => bucket_name_for(prefix)?,
    };
    let objects = LocalObjectStore::new(config.object_root());

    let store = open_store(config)?;
    let result = publish_versioned(&PrefixExporter::new(&store), &objects, &bucket, prefix);
    close_store(store, config)?;
    let report = result?;

    Ok(json!({
        "bucket": report.bucket,
        "object": report.object,
        "bucket_created": report.bucket_created,
        "records": report.export.records,
        "bytes": report.export.bytes,
    }))
}

/// Download an object to a local file
pub fn fetch(config: &Config, bucket: &str, object: &str, out: &Path) -> CliResult<Value> {
    let objects = LocalObjectStore::new(config.object_root());
    let bytes = download_to_file(&objects, bucket, object, out)?;

    Ok(json!({
        "bucket": bucket,
        "object": object,
        "path": out.display().to_string(),
        "bytes": bytes,
    }))
}

/// Look up one stored definition by its full key
pub fn get(config: &Config, key: &str) -> CliResult<Value> {
    let store = open_store(config)?;
    let result = store.get(key.as_bytes());
    close_store(store, config)?;

    match result? {
        Some(value) => Ok(json!({
            "key": key,
            "value": String::from_utf8_lossy(&value),
        })),
        None => {
            log_event_with_fields(Event::KeyNotFound, &[("key", key)]);
            Err(CliError::key_not_found(key))
        }
    }
}

/// Remove one key; removing an absent key succeeds
pub fn delete(config: &Config, key: &str) -> CliResult<Value> {
    let store = open_store(config)?;
    let result = store.delete(key.as_bytes());
    close_store(store, config)?;
    result?;

    log_event_with_fields(Event::KeyDeleted, &[("key", key)]);
    Ok(json!({ "deleted": key }))
}

/// List the objects of a bucket with their sizes and checksums
pub fn list(config: &Config, bucket: &str) -> CliResult<Value> {
    let objects = LocalObjectStore::new(config.object_root());
    let infos = objects.list_objects(bucket)?;

    Ok(json!({
        "bucket": bucket,
        "objects": serde_json::to_value(&infos)?,
    }))
}

fn open_store(config: &Config) -> CliResult<NamespacedStore> {
    let db_path = config.db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::config_error(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }

    let store = NamespacedStore::open(db_path)?;
    log_event_with_fields(Event::StoreOpened, &[("db_path", config.db_path.as_str())]);
    Ok(store)
}

fn close_store(store: NamespacedStore, config: &Config) -> CliResult<()> {
    store.close()?;
    log_event_with_fields(Event::StoreClosed, &[("db_path", config.db_path.as_str())]);
    Ok(())
}

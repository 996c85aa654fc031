//! Configuration file
//!
//! JSON object, e.g.
//!
//! ```json
//! { "db_path": "./data/stp.redb", "object_root": "./objects", "batch_size": 1000 }
//! ```
//!
//! Only `db_path` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ingest::IngestConfig;
use crate::observability::{Logger, Severity};
use crate::store::DEFAULT_BATCH_CAPACITY;

use super::errors::{CliError, CliResult};

/// Log levels accepted in `log_level`
const LOG_LEVELS: [&str; 4] = ["trace", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// redb database file (required)
    pub db_path: String,

    /// Root directory of the bucket store (optional, default "./objects")
    #[serde(default = "default_object_root")]
    pub object_root: String,

    /// Records per write batch (optional, default 1000)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Directory for `export` without `--out` (optional, default ".")
    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_object_root() -> String {
    "./objects".to_string()
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_CAPACITY
}
fn default_export_dir() -> String {
    ".".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.db_path.is_empty() {
            return Err(CliError::config_error("db_path must not be empty"));
        }

        if self.batch_size == 0 {
            return Err(CliError::config_error("batch_size must be > 0"));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of {}.",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        Path::new(&self.db_path)
    }

    pub fn object_root(&self) -> &Path {
        Path::new(&self.object_root)
    }

    /// Default local destination for an exported prefix
    pub fn export_path(&self, prefix: &str) -> PathBuf {
        Path::new(&self.export_dir).join(format!("{}.stp", prefix))
    }

    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig::with_batch_capacity(self.batch_size)
    }

    /// Apply `log_level` to the process-wide logger
    pub fn apply_log_level(&self) -> CliResult<()> {
        let severity: Severity = self.log_level.parse().map_err(CliError::config_error)?;
        Logger::set_min_severity(severity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(temp_dir: &TempDir, value: serde_json::Value) -> PathBuf {
        let path = temp_dir.path().join("stpdb.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "db_path": "/tmp/x.redb" }));

        let config = Config::load(&path).unwrap();
        assert_eq!(config.object_root, "./objects");
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.export_dir, ".");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.export_path("DOC"), Path::new(".").join("DOC.stp"));
    }

    #[test]
    fn test_config_requires_db_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "batch_size": 10 }));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_rejects_zero_batch_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "db_path": "x.redb", "batch_size": 0 }));

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "STPDB_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_config_rejects_unknown_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "db_path": "x.redb", "log_level": "loud" }));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(err.message().contains("Failed to read config"));
    }
}

//! Executor configuration.
//!
//! Loaded with figment, later sources overriding earlier ones:
//!
//! 1. `shoal.toml`
//! 2. `shoal.local.toml`
//! 3. `SHOAL_*` environment variables, `__` separating nested keys
//!
//! ```bash
//! SHOAL_EXECUTOR__LEFT_BLOCK_SIZE=128
//! SHOAL_LOGGING__FORMAT=json
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use shoal_core::schema::TableMeta;
use shoal_storage::Table;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Knobs of the physical operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Left rows buffered per block by the nested-loop join.
    #[serde(default = "default_left_block_size")]
    pub left_block_size: usize,

    /// Rows per chunk in vectorized scans.
    #[serde(default = "default_chunk_capacity")]
    pub chunk_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding payload and vector index files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error or a full EnvFilter).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_left_block_size() -> usize {
    64
}
fn default_chunk_capacity() -> usize {
    1024
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            left_block_size: default_left_block_size(),
            chunk_capacity: default_chunk_capacity(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl StorageConfig {
    /// Creates `meta` with its payload files under `data_dir`.
    pub fn create_table(&self, meta: TableMeta) -> shoal_core::Result<Rc<Table>> {
        Table::create(meta, &self.data_dir)
    }
}

impl Config {
    /// Loads configuration from the default locations.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("shoal.toml"))
            .merge(Toml::file("shoal.local.toml"))
            .merge(Env::prefixed("SHOAL_").split("__"))
            .extract()
    }

    /// Loads configuration from a specific file, still honoring `SHOAL_*`
    /// overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("SHOAL_").split("__"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.executor.left_block_size, 64);
        assert_eq!(config.executor.chunk_capacity, 1024);
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string(&Config::default()).unwrap();
        assert!(toml_str.contains("[executor]"));
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoal.toml");
        std::fs::write(&path, "[executor]\nleft_block_size = 3\n\n[logging]\nformat = \"json\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.executor.left_block_size, 3);
        assert_eq!(config.executor.chunk_capacity, 1024);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_executor_settings_reach_operators() {
        use crate::operator::{NestedLoopJoinOperator, PhysicalOperator, TableScanOperator};
        use shoal_core::schema::{FieldMeta, TableMetaBuilder};
        use shoal_core::AttrType;
        use shoal_storage::ReadWriteMode;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoal.toml");
        let data_dir = dir.path().join("data");
        std::fs::write(
            &path,
            format!(
                "[executor]\nleft_block_size = 7\nchunk_capacity = 16\n\n[storage]\ndata_dir = {:?}\n",
                data_dir.display().to_string()
            ),
        )
        .unwrap();
        let config = Config::from_file(&path).unwrap();

        let meta = TableMetaBuilder::new("t")
            .unwrap()
            .add_field(FieldMeta::new("a", AttrType::Ints))
            .unwrap()
            .build()
            .unwrap();
        let table = config.storage.create_table(meta).unwrap();
        assert!(data_dir.is_dir());

        let scan = |t: &Rc<Table>| TableScanOperator::with_config(t.clone(), ReadWriteMode::ReadOnly, &config.executor);
        assert_eq!(scan(&table).chunk_capacity(), 16);
        let children: Vec<Box<dyn PhysicalOperator>> = vec![Box::new(scan(&table)), Box::new(scan(&table))];
        let join = NestedLoopJoinOperator::with_config(children, &config.executor);
        assert_eq!(join.left_block_size(), 7);
    }

    #[test]
    fn test_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.executor, ExecutorConfig::default());
    }
}

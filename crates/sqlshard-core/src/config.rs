//! Shard configuration store
//!
//! Maps a logical table name to its routing and double-write settings.
//! The store is built once at startup and is read-only afterwards, so
//! lookups take no locks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::ConfigError;

/// Environment variable naming a JSON file with table configs
pub const CONFIG_PATH_ENV: &str = "SQLSHARD_CONFIG";

/// Per-table sharding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardTableConfig {
    /// Mirror writes to the legacy unsharded table
    #[serde(default)]
    pub double_write: bool,

    /// Column the resolver computes the shard from
    pub sharding_key: String,

    /// Number of physical shards
    pub number_of_shards: u32,

    /// Suffix format for physical table names, e.g. `_%02d`
    #[serde(default = "default_table_format")]
    pub table_format: String,
}

fn default_table_format() -> String {
    "_%d".to_string()
}

impl ShardTableConfig {
    pub fn new(sharding_key: impl Into<String>, number_of_shards: u32) -> Self {
        Self {
            double_write: false,
            sharding_key: sharding_key.into(),
            number_of_shards,
            table_format: default_table_format(),
        }
    }

    /// Enable mirroring writes to the legacy table
    pub fn with_double_write(mut self, double_write: bool) -> Self {
        self.double_write = double_write;
        self
    }

    pub fn with_table_format(mut self, format: impl Into<String>) -> Self {
        self.table_format = format.into();
        self
    }
}

/// Lookup contract for table configs
pub trait ShardConfigStore: Send + Sync {
    /// Config for `table`, or `None` if the table is not sharded
    fn lookup(&self, table: &str) -> Option<ShardTableConfig>;
}

/// In-memory config store keyed by logical table name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShardingConfig {
    tables: HashMap<String, ShardTableConfig>,
}

impl ShardingConfig {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table entry
    pub fn with_table(mut self, table: impl Into<String>, config: ShardTableConfig) -> Self {
        self.tables.insert(table.into(), config);
        self
    }

    /// Parse a JSON document of the form `{"tables": {"orders": {...}}}`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ShardingConfig = serde_json::from_str(json)?;
        config.validate()?;
        info!(tables = config.tables.len(), "Loaded sharding config");
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Load from the file named by `SQLSHARD_CONFIG`, or an empty store
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::new()),
        }
    }

    /// Reject empty table names and sharded tables without shards
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, table) in &self.tables {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidTable("empty table name".to_string()));
            }
            if table.number_of_shards == 0 {
                return Err(ConfigError::InvalidTable(format!(
                    "{}: number_of_shards must be at least 1",
                    name
                )));
            }
            if table.sharding_key.trim().is_empty() {
                return Err(ConfigError::InvalidTable(format!(
                    "{}: missing sharding_key",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Names of all configured tables
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl ShardConfigStore for ShardingConfig {
    fn lookup(&self, table: &str) -> Option<ShardTableConfig> {
        self.tables.get(table).cloned()
    }
}

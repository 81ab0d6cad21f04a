//! Sqlshard Core - configuration and diagnostics shared by the router and
//! the pool.
//!
//! This crate provides the pieces every sharded pool is built from:
//! the per-table config store, pool options with their write policies,
//! and the query log used for diagnostics.

pub mod config;
pub mod error;
pub mod options;
pub mod query_log;

pub use config::{ShardConfigStore, ShardTableConfig, ShardingConfig};
pub use error::ConfigError;
pub use options::{DoubleWritePolicy, FanOutPolicy, PoolOptions};
pub use query_log::{QueryLog, LAST_QUERY_KEY};

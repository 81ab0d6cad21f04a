//! Pool options and write-confirmation policies
//!
//! Double-write and fan-out are weak-consistency operations. The policies
//! below name the trade-off each pool runs with instead of leaving it
//! implicit in the dispatch code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub const POOL_NAME_ENV: &str = "SQLSHARD_POOL_NAME";
pub const DOUBLE_WRITE_ENV: &str = "SQLSHARD_DOUBLE_WRITE";

/// How the legacy-table leg of a double-write is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DoubleWritePolicy {
    /// Run the legacy leg first and discard its result and error.
    /// The primary leg decides the outcome of the call.
    #[default]
    BestEffort,
    /// Fail the call if the legacy leg fails; the primary leg is not run.
    Required,
}

impl fmt::Display for DoubleWritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoubleWritePolicy::BestEffort => write!(f, "best-effort"),
            DoubleWritePolicy::Required => write!(f, "required"),
        }
    }
}

impl FromStr for DoubleWritePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" | "best_effort" => Ok(DoubleWritePolicy::BestEffort),
            "required" => Ok(DoubleWritePolicy::Required),
            other => Err(ConfigError::InvalidOption {
                key: DOUBLE_WRITE_ENV.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// How per-shard writes of a full scan are issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FanOutPolicy {
    /// One shard after another in split order. The first failure aborts the
    /// remaining shards; writes already applied on earlier shards stay.
    #[default]
    SequentialStopOnError,
}

impl fmt::Display for FanOutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanOutPolicy::SequentialStopOnError => write!(f, "sequential-stop-on-error"),
        }
    }
}

/// Options for one sharded pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolOptions {
    /// Pool name used in log fields
    pub name: String,

    pub double_write_policy: DoubleWritePolicy,

    pub fan_out_policy: FanOutPolicy,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            name: uuid::Uuid::new_v4().to_string(),
            double_write_policy: DoubleWritePolicy::default(),
            fan_out_policy: FanOutPolicy::default(),
        }
    }
}

impl PoolOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_double_write_policy(mut self, policy: DoubleWritePolicy) -> Self {
        self.double_write_policy = policy;
        self
    }

    /// Load options from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = PoolOptions::default();

        if let Ok(name) = std::env::var(POOL_NAME_ENV) {
            if !name.trim().is_empty() {
                options.name = name.trim().to_string();
            }
        }

        if let Ok(policy) = std::env::var(DOUBLE_WRITE_ENV) {
            options.double_write_policy = policy.parse()?;
        }

        Ok(options)
    }
}

//! Error types for configuration loading

use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config document is not valid JSON for the expected shape
    #[error("Invalid config document: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// A table entry failed validation
    #[error("Invalid table config: {0}")]
    InvalidTable(String),

    /// An option value could not be parsed
    #[error("Invalid option {key}: {value}")]
    InvalidOption { key: String, value: String },
}

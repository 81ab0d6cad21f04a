//! Error types for the router module

use thiserror::Error;

/// Router error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The statement could not be classified or rewritten
    #[error("Unroutable statement: {0}")]
    Unroutable(String),

    /// A per-shard statement contains the fan-out delimiter itself
    #[error("Shard statement {index} contains the fan-out delimiter")]
    DelimiterInSegment { index: usize },

    /// A per-shard statement is empty or whitespace
    #[error("Shard statement {index} is blank")]
    BlankSegment { index: usize },

    /// A full-scan decision without any shard statement
    #[error("Full scan produced no shard statements")]
    EmptyFanOut,
}

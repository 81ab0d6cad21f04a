//! Common types for the router module

use serde::{Deserialize, Serialize};

/// Token joining per-shard statements into one combined full-scan statement.
///
/// Reads send the combined text as one statement; writes split on it and
/// issue each segment separately. Segments must never contain it.
pub const FAN_OUT_DELIMITER: &str = " UNION ALL ";

/// Which execution strategy a routing decision selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionPath {
    /// Send the routed statement once
    Direct,
    /// Send the legacy-table statement, then the routed one
    DoubleWrite,
    /// Execute against every shard
    FanOut,
}

impl std::fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionPath::Direct => write!(f, "direct"),
            ExecutionPath::DoubleWrite => write!(f, "double-write"),
            ExecutionPath::FanOut => write!(f, "fan-out"),
        }
    }
}

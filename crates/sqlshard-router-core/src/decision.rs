//! Routing decisions
//!
//! A `RoutingDecision` is produced fresh by the resolver for every call and
//! consumed by that call alone. Fields are private; the constructors below
//! are the only way to build one, which keeps the fan-out delimiter
//! contract checked in one place.

use sqlshard_core::ShardConfigStore;
use sqlshard_types::Value;

use crate::error::RouterError;
use crate::types::{ExecutionPath, FAN_OUT_DELIMITER};

/// How one statement should be executed
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    double_write_statement: String,
    routed_statement: String,
    table: Option<String>,
    routed_params: Vec<Value>,
    shard_statements: Vec<String>,
    full_scan: bool,
}

impl RoutingDecision {
    /// Route to a single physical statement
    pub fn direct(routed_statement: impl Into<String>) -> Self {
        Self {
            double_write_statement: String::new(),
            routed_statement: routed_statement.into(),
            table: None,
            routed_params: Vec::new(),
            shard_statements: Vec::new(),
            full_scan: false,
        }
    }

    /// Fan out over `segments`, one independently executable statement per
    /// shard, in execution order.
    ///
    /// The combined statement must split back into exactly these segments.
    pub fn full_scan(
        segments: Vec<String>,
        routed_params: Vec<Value>,
    ) -> Result<Self, RouterError> {
        if segments.is_empty() {
            return Err(RouterError::EmptyFanOut);
        }
        if let Some(index) = segments.iter().position(|s| s.trim().is_empty()) {
            return Err(RouterError::BlankSegment { index });
        }
        if let Some(index) = segments.iter().position(|s| s.contains(FAN_OUT_DELIMITER)) {
            return Err(RouterError::DelimiterInSegment { index });
        }

        // A segment ending in " UNION ALL" or starting with "UNION ALL " forms
        // a new delimiter at the join boundary
        let routed_statement = segments.join(FAN_OUT_DELIMITER);
        let mut split = routed_statement.split(FAN_OUT_DELIMITER);
        for (index, segment) in segments.iter().enumerate() {
            if split.next() != Some(segment.as_str()) {
                return Err(RouterError::DelimiterInSegment { index });
            }
        }
        if split.next().is_some() {
            return Err(RouterError::DelimiterInSegment {
                index: segments.len() - 1,
            });
        }

        Ok(Self {
            double_write_statement: String::new(),
            routed_statement,
            table: None,
            routed_params,
            shard_statements: segments,
            full_scan: true,
        })
    }

    /// Fan out over a statement already joined with the delimiter
    pub fn full_scan_from_combined(
        combined: impl Into<String>,
        routed_params: Vec<Value>,
    ) -> Result<Self, RouterError> {
        let combined = combined.into();
        let segments: Vec<String> = combined
            .split(FAN_OUT_DELIMITER)
            .map(str::to_string)
            .collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(RouterError::EmptyFanOut);
        }
        Self::full_scan(segments, routed_params)
    }

    /// Attach the logical table the statement resolved to
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        let table = table.into();
        self.table = if table.is_empty() { None } else { Some(table) };
        self
    }

    /// Attach the statement for the legacy (pre-migration) table
    pub fn with_double_write(mut self, statement: impl Into<String>) -> Self {
        self.double_write_statement = statement.into();
        self
    }

    /// Replace the resolver-adjusted parameter list
    pub fn with_routed_params(mut self, params: Vec<Value>) -> Self {
        self.routed_params = params;
        self
    }

    pub fn double_write_statement(&self) -> &str {
        &self.double_write_statement
    }

    /// Statement sent on the primary path; the combined text for full scans
    pub fn routed_statement(&self) -> &str {
        &self.routed_statement
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn routed_params(&self) -> &[Value] {
        &self.routed_params
    }

    pub fn is_full_scan(&self) -> bool {
        self.full_scan
    }

    /// Per-shard statements of a full scan in execution order; empty otherwise
    pub fn shard_statements(&self) -> &[String] {
        &self.shard_statements
    }

    /// Pick the execution strategy. Fan-out wins over double-write.
    pub fn path(&self, configs: &dyn ShardConfigStore) -> ExecutionPath {
        if self.full_scan {
            return ExecutionPath::FanOut;
        }

        let double_write = self
            .table
            .as_deref()
            .and_then(|table| configs.lookup(table))
            .map(|config| config.double_write)
            .unwrap_or(false);

        if double_write && !self.double_write_statement.is_empty() {
            ExecutionPath::DoubleWrite
        } else {
            ExecutionPath::Direct
        }
    }
}

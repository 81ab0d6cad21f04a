//! Error types for the sharded pool

use sqlshard_router_core::RouterError;
use thiserror::Error;

/// Pool error types
///
/// Errors from the underlying connection are returned exactly as the
/// connection produced them; the pool never wraps or rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The resolver could not route the statement
    #[error("Routing failed: {0}")]
    Routing(#[from] RouterError),

    /// Failure reported by the underlying driver
    #[error("Driver error: {0}")]
    Driver(String),

    /// A single-row read found nothing
    #[error("No rows in result set")]
    NoRows,

    /// Insert ids cannot be taken from a result merged across shards
    #[error("LastInsertId is not supported on a merged result")]
    LastInsertIdUnsupported,

    /// The driver did not report an affected-row count
    #[error("RowsAffected is not available")]
    RowsAffectedUnavailable,

    /// The query context was cancelled
    #[error("Context cancelled")]
    Cancelled,

    /// The query context deadline passed
    #[error("Context deadline exceeded")]
    DeadlineExceeded,

    /// Legacy-table leg failed under the `required` double-write policy
    #[error("Double-write failed: {0}")]
    DoubleWrite(Box<PoolError>),

    /// The pool was dropped while a transaction was being started
    #[error("Pool is closed")]
    Closed,
}

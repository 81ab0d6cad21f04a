//! Sqlshard Pool - sharding-aware SQL execution
//!
//! [`ShardedPool`] sits between the code issuing queries and a physical
//! connection pool. It implements the same [`ConnPool`] trait as the pool
//! it wraps, so callers cannot tell a sharded pool from a plain one except
//! through the [`QueryLog`](sqlshard_core::QueryLog).
//!
//! # Execution paths
//!
//! - **Direct**: the routed statement, original params.
//! - **Double-write**: the legacy-table statement, then the routed one. The
//!   legacy leg is best-effort unless the pool is configured otherwise.
//! - **Fan-out**: writes run once per shard, sequentially, and their
//!   affected-row counts are merged. Reads send the combined statement in
//!   one call with the resolver-adjusted params.
//!
//! Fan-out writes are not atomic across shards. A failing shard stops the
//! fan-out; earlier shards keep their writes.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlshard_pool::{ConnPool, QueryContext, ShardedPool, ShardingContext};
//!
//! let sharding = Arc::new(ShardingContext::new(resolver, Arc::new(configs)));
//! let pool = ShardedPool::new(sharding, driver_pool);
//!
//! let ctx = QueryContext::background();
//! let result = pool.exec(&ctx, "UPDATE orders SET state = ? WHERE user_id = ?", &args).await?;
//! ```

mod conn;
mod context;
mod error;
mod merge;
mod pool;
mod tx;

// Re-exports: Error types
pub use error::PoolError;

// Re-exports: Capabilities
pub use conn::{
    ConnPool, DriverResult, ExecOutcome, ExecResult, Row, RowCursor, Rows, Statement, TxBeginner,
    TxCommitter, VecRows,
};
pub use context::QueryContext;

// Re-exports: Pool
pub use merge::{merge_results, MergedResult};
pub use pool::{ShardedPool, ShardingContext};

//! Transaction adapter
//!
//! Maps begin/commit/rollback on the sharded pool onto the wrapped pool
//! when it supports them, and turns them into no-ops when it does not.
//! This is not a coordinator: nothing here spans shards.

use async_trait::async_trait;
use sqlshard_types::TxOptions;
use std::sync::Arc;
use tracing::debug;

use crate::conn::{ConnPool, TxBeginner, TxCommitter};
use crate::context::QueryContext;
use crate::error::PoolError;
use crate::pool::ShardedPool;

#[async_trait]
impl TxBeginner for ShardedPool {
    /// Delegate to the wrapped pool, or hand back this pool unchanged
    async fn begin_tx(
        &self,
        ctx: &QueryContext,
        opts: &TxOptions,
    ) -> Result<Arc<dyn ConnPool>, PoolError> {
        if let Some(beginner) = self.inner.as_beginner() {
            debug!(
                pool = %self.options.name,
                isolation = ?opts.isolation,
                "Beginning transaction on wrapped pool"
            );
            return beginner.begin_tx(ctx, opts).await;
        }

        debug!(pool = %self.options.name, "Wrapped pool has no transactions, using pool as-is");
        let this: Arc<dyn ConnPool> = self.this.upgrade().ok_or(PoolError::Closed)?;
        Ok(this)
    }
}

#[async_trait]
impl TxCommitter for ShardedPool {
    async fn commit(&self) -> Result<(), PoolError> {
        // The driver commits raw transaction handles itself
        if self.inner.is_raw_tx() {
            return Ok(());
        }

        match self.inner.as_committer() {
            Some(committer) => committer.commit().await,
            None => Ok(()),
        }
    }

    async fn rollback(&self) -> Result<(), PoolError> {
        if self.inner.is_raw_tx() {
            return Ok(());
        }

        match self.inner.as_committer() {
            Some(committer) => committer.rollback().await,
            None => Ok(()),
        }
    }
}

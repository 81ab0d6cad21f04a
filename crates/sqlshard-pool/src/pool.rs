//! Sharded connection pool
//!
//! Wraps one underlying `ConnPool` and routes every statement through the
//! resolver before it reaches the connection.
//!
//! # Dispatch
//!
//! ```text
//! exec / query / query_row
//!        │
//!        ▼
//!   Resolver ──error──► returned to caller (query_row: deferred in Row)
//!        │
//!        ▼
//!   QueryLog["last_query"] = routed statement
//!        │
//!        ▼
//!   full scan? ──Yes──► exec: one call per shard, in order, merged
//!        │              query / query_row: combined statement, routed params
//!        No
//!        │
//!        ▼
//!   double-write table? ──Yes──► legacy statement first (policy decides
//!        │                       whether its failure matters)
//!        No                            │
//!        │                             ▼
//!        └──────────────────────► routed statement, original params
//! ```
//!
//! Everything runs on the caller's task. Fan-out is sequential: shard N+1
//! starts only after shard N returned, and the first error stops it.

use async_trait::async_trait;
use sqlshard_core::{DoubleWritePolicy, PoolOptions, QueryLog, ShardConfigStore};
use sqlshard_router_core::{ExecutionPath, Resolver, RoutingDecision};
use sqlshard_types::Value;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

use crate::conn::{ConnPool, ExecOutcome, Row, Rows, Statement, TxBeginner, TxCommitter};
use crate::context::QueryContext;
use crate::error::PoolError;
use crate::merge::merge_results;

/// Resolver, config store and query log shared by all pools of one setup
pub struct ShardingContext {
    resolver: Arc<dyn Resolver>,
    configs: Arc<dyn ShardConfigStore>,
    query_log: QueryLog,
}

impl ShardingContext {
    pub fn new(resolver: Arc<dyn Resolver>, configs: Arc<dyn ShardConfigStore>) -> Self {
        Self {
            resolver,
            configs,
            query_log: QueryLog::new(),
        }
    }

    /// Use an existing query log instead of a fresh one
    pub fn with_query_log(mut self, query_log: QueryLog) -> Self {
        self.query_log = query_log;
        self
    }

    pub fn query_log(&self) -> &QueryLog {
        &self.query_log
    }

    pub fn configs(&self) -> &dyn ShardConfigStore {
        self.configs.as_ref()
    }

    fn resolve(&self, query: &str, args: &[Value]) -> Result<RoutingDecision, PoolError> {
        self.resolver.resolve(query, args).map_err(|err| {
            debug!(resolver = self.resolver.name(), error = %err, "Statement could not be routed");
            PoolError::from(err)
        })
    }
}

/// Drop-in `ConnPool` that executes routed statements on a wrapped pool
pub struct ShardedPool {
    pub(crate) sharding: Arc<ShardingContext>,
    pub(crate) inner: Arc<dyn ConnPool>,
    pub(crate) options: PoolOptions,
    pub(crate) this: Weak<ShardedPool>,
}

impl ShardedPool {
    /// Wrap `inner` with default options
    pub fn new(sharding: Arc<ShardingContext>, inner: Arc<dyn ConnPool>) -> Arc<Self> {
        Self::with_options(sharding, inner, PoolOptions::default())
    }

    pub fn with_options(
        sharding: Arc<ShardingContext>,
        inner: Arc<dyn ConnPool>,
        options: PoolOptions,
    ) -> Arc<Self> {
        debug!(
            pool = %options.name,
            double_write = %options.double_write_policy,
            fan_out = %options.fan_out_policy,
            "Creating sharded pool"
        );
        Arc::new_cyclic(|this| Self {
            sharding,
            inner,
            options,
            this: this.clone(),
        })
    }

    pub fn options(&self) -> &PoolOptions {
        &self.options
    }

    pub fn query_log(&self) -> &QueryLog {
        self.sharding.query_log()
    }

    /// The wrapped pool
    pub fn inner(&self) -> &Arc<dyn ConnPool> {
        &self.inner
    }

    /// Resolve, record the routed statement, and pick a path
    fn route(
        &self,
        query: &str,
        args: &[Value],
    ) -> Result<(RoutingDecision, ExecutionPath), PoolError> {
        let decision = self.sharding.resolve(query, args)?;
        self.sharding.query_log().record_last_query(decision.routed_statement());

        let path = decision.path(self.sharding.configs());
        trace!(
            pool = %self.options.name,
            path = %path,
            table = decision.table().unwrap_or(""),
            "Routed statement"
        );
        Ok((decision, path))
    }

    /// Run the legacy-table leg of a double-write
    async fn double_write(
        &self,
        ctx: &QueryContext,
        decision: &RoutingDecision,
        args: &[Value],
    ) -> Result<(), PoolError> {
        let result = self.inner.exec(ctx, decision.double_write_statement(), args).await;

        match (result, self.options.double_write_policy) {
            (Ok(_), _) => Ok(()),
            (Err(err), DoubleWritePolicy::BestEffort) => {
                warn!(
                    pool = %self.options.name,
                    table = decision.table().unwrap_or(""),
                    error = %err,
                    "Double-write failed, continuing with primary write"
                );
                Ok(())
            }
            (Err(err), DoubleWritePolicy::Required) => Err(PoolError::DoubleWrite(Box::new(err))),
        }
    }

    /// Execute each shard statement in order with the original params.
    /// This is the `SequentialStopOnError` fan-out policy.
    async fn exec_fan_out(
        &self,
        ctx: &QueryContext,
        decision: &RoutingDecision,
        args: &[Value],
    ) -> Result<ExecOutcome, PoolError> {
        let shards = decision.shard_statements();
        let mut results = Vec::with_capacity(shards.len());
        for (index, statement) in shards.iter().enumerate() {
            debug!(
                pool = %self.options.name,
                shard = index,
                total = shards.len(),
                "Executing shard statement"
            );
            match self.inner.exec(ctx, statement, args).await {
                Ok(result) => results.push(result),
                Err(err) => {
                    warn!(
                        pool = %self.options.name,
                        shard = index,
                        applied = results.len(),
                        error = %err,
                        "Fan-out aborted, earlier shard writes stay applied"
                    );
                    return Err(err);
                }
            }
        }

        Ok(Box::new(merge_results(&results)))
    }
}

impl fmt::Display for ShardedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sqlshard:conn_pool")
    }
}

impl fmt::Debug for ShardedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedPool")
            .field("name", &self.options.name)
            .field("double_write_policy", &self.options.double_write_policy)
            .finish()
    }
}

#[async_trait]
impl ConnPool for ShardedPool {
    async fn prepare(&self, ctx: &QueryContext, query: &str) -> Result<Statement, PoolError> {
        self.inner.prepare(ctx, query).await
    }

    async fn exec(
        &self,
        ctx: &QueryContext,
        query: &str,
        args: &[Value],
    ) -> Result<ExecOutcome, PoolError> {
        let (decision, path) = self.route(query, args)?;

        match path {
            ExecutionPath::FanOut => self.exec_fan_out(ctx, &decision, args).await,
            ExecutionPath::DoubleWrite => {
                self.double_write(ctx, &decision, args).await?;
                self.inner.exec(ctx, decision.routed_statement(), args).await
            }
            ExecutionPath::Direct => self.inner.exec(ctx, decision.routed_statement(), args).await,
        }
    }

    async fn query(
        &self,
        ctx: &QueryContext,
        query: &str,
        args: &[Value],
    ) -> Result<Rows, PoolError> {
        let (decision, path) = self.route(query, args)?;

        match path {
            // The combined statement is executed natively by the database
            ExecutionPath::FanOut => {
                self.inner
                    .query(ctx, decision.routed_statement(), decision.routed_params())
                    .await
            }
            ExecutionPath::DoubleWrite => {
                self.double_write(ctx, &decision, args).await?;
                self.inner.query(ctx, decision.routed_statement(), args).await
            }
            ExecutionPath::Direct => self.inner.query(ctx, decision.routed_statement(), args).await,
        }
    }

    async fn query_row(&self, ctx: &QueryContext, query: &str, args: &[Value]) -> Row {
        let (decision, path) = match self.route(query, args) {
            Ok(routed) => routed,
            Err(err) => return Row::from_error(err),
        };

        match path {
            ExecutionPath::FanOut => {
                self.inner
                    .query_row(ctx, decision.routed_statement(), decision.routed_params())
                    .await
            }
            // Single-row reads never mirror to the legacy table
            ExecutionPath::DoubleWrite | ExecutionPath::Direct => {
                self.inner.query_row(ctx, decision.routed_statement(), args).await
            }
        }
    }

    async fn ping(&self) -> Result<(), PoolError> {
        Ok(())
    }

    fn as_beginner(&self) -> Option<&dyn TxBeginner> {
        Some(self)
    }

    fn as_committer(&self) -> Option<&dyn TxCommitter> {
        Some(self)
    }
}

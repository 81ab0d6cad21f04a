//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlshard_core::{ShardTableConfig, ShardingConfig};
use sqlshard_pool::{
    ConnPool, DriverResult, ExecOutcome, PoolError, QueryContext, Row, Rows, Statement, TxBeginner,
    TxCommitter, VecRows,
};
use sqlshard_router_core::{Resolver, RouterError, RoutingDecision};
use sqlshard_types::{TxOptions, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Install a test subscriber once; `RUST_LOG` controls the output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Prepare,
    Exec,
    Query,
    QueryRow,
}

/// One call received by the mock connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: CallKind,
    pub query: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    failures: HashMap<String, PoolError>,
    affected: HashMap<String, i64>,
    cancel_after: HashSet<String>,
    begins: usize,
    commits: usize,
    rollbacks: usize,
}

/// In-memory connection that records every call it receives.
///
/// Statements succeed with one affected row unless scripted otherwise.
/// Queries return a single row `[statement, number of args]`.
#[derive(Debug, Clone, Default)]
pub struct MockPool {
    state: Arc<Mutex<MockState>>,
    transactions: bool,
    committer: bool,
    raw_tx: bool,
}

impl MockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Support `begin_tx`; transactions are raw handles sharing this log.
    pub fn with_transactions(mut self) -> Self {
        self.transactions = true;
        self
    }

    /// Support commit/rollback on the pool itself.
    pub fn with_committer(mut self) -> Self {
        self.committer = true;
        self
    }

    /// Behave as a raw transaction handle.
    pub fn raw_tx(mut self) -> Self {
        self.raw_tx = true;
        self.committer = true;
        self
    }

    pub fn fail_on(&self, statement: &str, err: PoolError) {
        self.state.lock().failures.insert(statement.to_string(), err);
    }

    pub fn affect(&self, statement: &str, rows: i64) {
        self.state.lock().affected.insert(statement.to_string(), rows);
    }

    /// Cancel the caller's context once `statement` has succeeded.
    pub fn cancel_after(&self, statement: &str) {
        self.state.lock().cancel_after.insert(statement.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.query).collect()
    }

    pub fn begins(&self) -> usize {
        self.state.lock().begins
    }

    pub fn commits(&self) -> usize {
        self.state.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state.lock().rollbacks
    }

    fn record(
        &self,
        ctx: &QueryContext,
        kind: CallKind,
        query: &str,
        args: &[Value],
    ) -> Result<usize, PoolError> {
        let mut state = self.state.lock();
        state.calls.push(Call {
            kind,
            query: query.to_string(),
            args: args.to_vec(),
        });
        let seq = state.calls.len();

        if let Some(err) = ctx.err() {
            return Err(err);
        }
        if let Some(err) = state.failures.get(query) {
            return Err(err.clone());
        }
        if state.cancel_after.contains(query) {
            ctx.cancel();
        }
        Ok(seq)
    }

    fn rows_for(query: &str, args: &[Value]) -> Rows {
        VecRows::new(
            vec!["statement".to_string(), "args".to_string()],
            vec![vec![Value::from(query), Value::Int(args.len() as i64)]],
        )
        .boxed()
    }
}

#[async_trait]
impl ConnPool for MockPool {
    async fn prepare(&self, ctx: &QueryContext, query: &str) -> Result<Statement, PoolError> {
        let seq = self.record(ctx, CallKind::Prepare, query, &[])?;
        Ok(Statement {
            query: query.to_string(),
            handle: seq as u64,
        })
    }

    async fn exec(
        &self,
        ctx: &QueryContext,
        query: &str,
        args: &[Value],
    ) -> Result<ExecOutcome, PoolError> {
        let seq = self.record(ctx, CallKind::Exec, query, args)?;
        let rows = self.state.lock().affected.get(query).copied().unwrap_or(1);
        Ok(Box::new(DriverResult::new(rows).with_last_insert_id(seq as i64)))
    }

    async fn query(
        &self,
        ctx: &QueryContext,
        query: &str,
        args: &[Value],
    ) -> Result<Rows, PoolError> {
        self.record(ctx, CallKind::Query, query, args)?;
        Ok(Self::rows_for(query, args))
    }

    async fn query_row(&self, ctx: &QueryContext, query: &str, args: &[Value]) -> Row {
        match self.record(ctx, CallKind::QueryRow, query, args) {
            Ok(_) => Row::from_rows(Self::rows_for(query, args)),
            Err(err) => Row::from_error(err),
        }
    }

    fn as_beginner(&self) -> Option<&dyn TxBeginner> {
        if self.transactions {
            Some(self)
        } else {
            None
        }
    }

    fn as_committer(&self) -> Option<&dyn TxCommitter> {
        if self.committer {
            Some(self)
        } else {
            None
        }
    }

    fn is_raw_tx(&self) -> bool {
        self.raw_tx
    }
}

#[async_trait]
impl TxBeginner for MockPool {
    async fn begin_tx(
        &self,
        ctx: &QueryContext,
        _opts: &TxOptions,
    ) -> Result<Arc<dyn ConnPool>, PoolError> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }
        self.state.lock().begins += 1;
        let tx = MockPool {
            state: self.state.clone(),
            transactions: false,
            committer: true,
            raw_tx: true,
        };
        Ok(Arc::new(tx))
    }
}

#[async_trait]
impl TxCommitter for MockPool {
    async fn commit(&self) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        if let Some(err) = state.failures.get("COMMIT") {
            return Err(err.clone());
        }
        state.commits += 1;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), PoolError> {
        self.state.lock().rollbacks += 1;
        Ok(())
    }
}

/// Resolver answering from a fixed table of statements.
#[derive(Default)]
pub struct ScriptedResolver {
    routes: HashMap<String, Result<RoutingDecision, RouterError>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, statement: &str, decision: RoutingDecision) -> Self {
        self.routes.insert(statement.to_string(), Ok(decision));
        self
    }

    pub fn reject(mut self, statement: &str, err: RouterError) -> Self {
        self.routes.insert(statement.to_string(), Err(err));
        self
    }
}

impl Resolver for ScriptedResolver {
    fn resolve(&self, query: &str, _args: &[Value]) -> Result<RoutingDecision, RouterError> {
        self.routes
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(RouterError::Unroutable(query.to_string())))
    }

    fn name(&self) -> &'static str {
        "Scripted"
    }
}

/// `orders` double-writes to its legacy table; `users` does not.
pub fn configs() -> ShardingConfig {
    ShardingConfig::new()
        .with_table("orders", ShardTableConfig::new("user_id", 3).with_double_write(true))
        .with_table("users", ShardTableConfig::new("id", 3))
}

/// Statements and decisions shared by the dispatch tests.
pub fn resolver() -> ScriptedResolver {
    ScriptedResolver::new()
        .route(
            "SELECT * FROM users WHERE id = ?",
            RoutingDecision::direct("SELECT * FROM users_1 WHERE id = ?")
                .with_table("users")
                .with_double_write("SELECT * FROM users WHERE id = ?"),
        )
        .route(
            "INSERT INTO orders (user_id, amount) VALUES (?, ?)",
            RoutingDecision::direct("INSERT INTO orders_2 (user_id, amount) VALUES (?, ?)")
                .with_table("orders")
                .with_double_write("INSERT INTO orders (user_id, amount) VALUES (?, ?)"),
        )
        .route(
            "SELECT * FROM orders WHERE user_id = ?",
            RoutingDecision::direct("SELECT * FROM orders_2 WHERE user_id = ?")
                .with_table("orders")
                .with_double_write("UPDATE orders SET read_at = NOW() WHERE user_id = ?"),
        )
        .route(
            "UPDATE orders SET state = ?",
            RoutingDecision::full_scan(
                vec![
                    "UPDATE orders_0 SET state = ?".to_string(),
                    "UPDATE orders_1 SET state = ?".to_string(),
                    "UPDATE orders_2 SET state = ?".to_string(),
                ],
                vec![Value::from("x"), Value::from("x"), Value::from("x")],
            )
            .expect("valid fan-out")
            .with_table("orders")
            .with_double_write("UPDATE orders SET state = ?"),
        )
        .route(
            "SELECT * FROM orders WHERE amount > ?",
            RoutingDecision::full_scan(
                vec![
                    "SELECT * FROM orders_0 WHERE amount > ?".to_string(),
                    "SELECT * FROM orders_1 WHERE amount > ?".to_string(),
                    "SELECT * FROM orders_2 WHERE amount > ?".to_string(),
                ],
                vec![Value::Int(10), Value::Int(10), Value::Int(10)],
            )
            .expect("valid fan-out")
            .with_table("orders")
            .with_double_write("UPDATE orders SET read_at = NOW() WHERE amount > ?"),
        )
        .route(
            "SELECT 1",
            RoutingDecision::direct("SELECT 1"),
        )
}

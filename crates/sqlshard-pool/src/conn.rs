//! Connection capability traits
//!
//! `ConnPool` is what both the underlying driver pool and the sharded pool
//! implement, so callers cannot tell them apart. Transaction support is
//! optional and discovered at runtime through `as_beginner` and
//! `as_committer`; a `None` there is a normal answer, not an error.

use async_trait::async_trait;
use sqlshard_types::{TxOptions, Value};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::context::QueryContext;
use crate::error::PoolError;

/// Outcome of a write: affected rows and, maybe, a generated id
pub trait ExecResult: Send + Sync + fmt::Debug {
    fn last_insert_id(&self) -> Result<i64, PoolError>;

    fn rows_affected(&self) -> Result<i64, PoolError>;
}

/// Boxed write outcome as returned by `ConnPool::exec`
pub type ExecOutcome = Box<dyn ExecResult>;

/// Plain write outcome for drivers that report both values eagerly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverResult {
    pub rows_affected: Option<i64>,
    pub last_insert_id: Option<i64>,
}

impl DriverResult {
    pub fn new(rows_affected: i64) -> Self {
        Self {
            rows_affected: Some(rows_affected),
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

impl ExecResult for DriverResult {
    fn last_insert_id(&self) -> Result<i64, PoolError> {
        self.last_insert_id.ok_or_else(|| {
            PoolError::Driver("LastInsertId is not supported by this driver".to_string())
        })
    }

    fn rows_affected(&self) -> Result<i64, PoolError> {
        self.rows_affected.ok_or(PoolError::RowsAffectedUnavailable)
    }
}

/// Forward-only row cursor
pub trait RowCursor: Send + fmt::Debug {
    fn columns(&self) -> &[String];

    /// Next row, `None` once the cursor is exhausted
    fn next_row(&mut self) -> Option<Result<Vec<Value>, PoolError>>;

    /// Drain the remaining rows, stopping at the first error
    fn fetch_all(&mut self) -> Result<Vec<Vec<Value>>, PoolError> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

/// Boxed cursor as returned by `ConnPool::query`
pub type Rows = Box<dyn RowCursor>;

/// Cursor over rows already held in memory
#[derive(Debug, Clone, Default)]
pub struct VecRows {
    columns: Vec<String>,
    rows: VecDeque<Vec<Value>>,
}

impl VecRows {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows: rows.into(),
        }
    }

    pub fn empty(columns: Vec<String>) -> Self {
        Self::new(columns, Vec::new())
    }

    pub fn boxed(self) -> Rows {
        Box::new(self)
    }
}

impl RowCursor for VecRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Option<Result<Vec<Value>, PoolError>> {
        self.rows.pop_front().map(Ok)
    }
}

/// Lazy single-row accessor
///
/// Errors, including "no such row", surface when the row is scanned rather
/// than when the query is issued.
#[derive(Debug)]
pub struct Row {
    inner: Result<Rows, PoolError>,
}

impl Row {
    pub fn from_rows(rows: Rows) -> Self {
        Self { inner: Ok(rows) }
    }

    pub fn from_error(err: PoolError) -> Self {
        Self { inner: Err(err) }
    }

    /// Deferred error, if the query already failed
    pub fn err(&self) -> Option<&PoolError> {
        self.inner.as_ref().err()
    }

    /// Take the first row
    pub fn scan(self) -> Result<Vec<Value>, PoolError> {
        let mut rows = self.inner?;
        match rows.next_row() {
            Some(row) => row,
            None => Err(PoolError::NoRows),
        }
    }
}

/// Prepared statement handle issued by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub query: String,
    pub handle: u64,
}

/// SQL execution capability
#[async_trait]
pub trait ConnPool: Send + Sync {
    async fn prepare(&self, ctx: &QueryContext, query: &str) -> Result<Statement, PoolError>;

    /// Execute for effect
    async fn exec(
        &self,
        ctx: &QueryContext,
        query: &str,
        args: &[Value],
    ) -> Result<ExecOutcome, PoolError>;

    /// Execute and return a row cursor
    async fn query(
        &self,
        ctx: &QueryContext,
        query: &str,
        args: &[Value],
    ) -> Result<Rows, PoolError>;

    /// Execute and return a lazy single-row accessor
    async fn query_row(&self, ctx: &QueryContext, query: &str, args: &[Value]) -> Row;

    /// Liveness check
    async fn ping(&self) -> Result<(), PoolError> {
        Ok(())
    }

    /// Transaction-begin capability, if supported
    fn as_beginner(&self) -> Option<&dyn TxBeginner> {
        None
    }

    /// Commit/rollback capability, if supported
    fn as_committer(&self) -> Option<&dyn TxCommitter> {
        None
    }

    /// True for a raw transaction handle whose lifecycle the driver owns
    fn is_raw_tx(&self) -> bool {
        false
    }
}

/// Capability to start a transaction
#[async_trait]
pub trait TxBeginner: Send + Sync {
    /// Begin a transaction, returning a transaction-scoped capability
    async fn begin_tx(
        &self,
        ctx: &QueryContext,
        opts: &TxOptions,
    ) -> Result<Arc<dyn ConnPool>, PoolError>;
}

/// Capability to finish a transaction
#[async_trait]
pub trait TxCommitter: Send + Sync {
    async fn commit(&self) -> Result<(), PoolError>;

    async fn rollback(&self) -> Result<(), PoolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_result() {
        let result = DriverResult::new(3).with_last_insert_id(42);
        assert_eq!(result.rows_affected(), Ok(3));
        assert_eq!(result.last_insert_id(), Ok(42));

        let bare = DriverResult::default();
        assert_eq!(bare.rows_affected(), Err(PoolError::RowsAffectedUnavailable));
        assert!(bare.last_insert_id().is_err());
    }

    #[test]
    fn test_row_scan_first() {
        let rows = VecRows::new(
            vec!["id".to_string()],
            vec![vec![Value::Int(1)], vec![Value::Int(2)]],
        );
        let row = Row::from_rows(rows.boxed());
        assert_eq!(row.scan(), Ok(vec![Value::Int(1)]));
    }

    #[test]
    fn test_row_no_rows() {
        let row = Row::from_rows(VecRows::empty(vec!["id".to_string()]).boxed());
        assert!(row.err().is_none());
        assert_eq!(row.scan(), Err(PoolError::NoRows));
    }

    #[test]
    fn test_row_deferred_error() {
        let row = Row::from_error(PoolError::Driver("connection reset".to_string()));
        assert!(row.err().is_some());
        assert_eq!(row.scan(), Err(PoolError::Driver("connection reset".to_string())));
    }

    #[test]
    fn test_fetch_all() {
        let mut rows = VecRows::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::Int(1), Value::Null], vec![Value::Int(2), Value::Bool(true)]],
        );
        assert_eq!(rows.columns().len(), 2);
        let all = rows.fetch_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(rows.next_row().is_none());
    }
}

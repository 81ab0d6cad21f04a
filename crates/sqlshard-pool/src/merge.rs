//! Result merging for fan-out writes

use crate::conn::{ExecOutcome, ExecResult};
use crate::error::PoolError;

/// Write outcome combined across shards
///
/// Only the affected-row total survives the merge. No single shard's
/// generated id is the right one, so `last_insert_id` always fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergedResult {
    rows_affected: i64,
}

impl MergedResult {
    pub fn total(&self) -> i64 {
        self.rows_affected
    }
}

impl ExecResult for MergedResult {
    fn last_insert_id(&self) -> Result<i64, PoolError> {
        Err(PoolError::LastInsertIdUnsupported)
    }

    fn rows_affected(&self) -> Result<i64, PoolError> {
        Ok(self.rows_affected)
    }
}

/// Sum affected rows, skipping outcomes that cannot report a count.
/// The total saturates at `i64::MAX`.
pub fn merge_results(results: &[ExecOutcome]) -> MergedResult {
    let rows_affected = results
        .iter()
        .filter_map(|r| r.rows_affected().ok())
        .fold(0i64, |acc, n| acc.saturating_add(n));
    MergedResult { rows_affected }
}

//! Diagnostics sink
//!
//! Named slots holding the text of recently dispatched statements. One
//! `QueryLog` is owned per sharding context and injected into every pool
//! built from it, so tests never see each other's statements.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Key under which the last routed statement is stored
pub const LAST_QUERY_KEY: &str = "last_query";

/// Last-writer-wins statement slots
#[derive(Debug, Clone, Default)]
pub struct QueryLog {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot `key`
    pub fn store(&self, key: &str, statement: impl Into<String>) {
        let mut slots = self.slots.write();
        slots.insert(key.to_string(), statement.into());
    }

    /// Current content of `key`, `None` before the first write
    pub fn load(&self, key: &str) -> Option<String> {
        let slots = self.slots.read();
        slots.get(key).cloned()
    }

    /// Record the statement sent on the primary path
    pub fn record_last_query(&self, statement: impl Into<String>) {
        self.store(LAST_QUERY_KEY, statement);
    }

    pub fn last_query(&self) -> Option<String> {
        self.load(LAST_QUERY_KEY)
    }
}

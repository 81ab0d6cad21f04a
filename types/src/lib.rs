//! Shared types for sqlshard
//!
//! Positional parameter values and transaction options that cross every
//! crate boundary in the workspace.

pub mod tx;
pub mod value;

pub use tx::{IsolationLevel, TxOptions};
pub use value::Value;

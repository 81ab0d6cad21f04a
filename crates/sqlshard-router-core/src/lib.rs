//! Sqlshard Router Core - routing decisions for sharded SQL
//!
//! Every statement that reaches a sharded pool is first handed to a
//! [`Resolver`], which returns a [`RoutingDecision`]. The decision selects
//! one of three execution paths.
//!
//! # Architecture
//!
//! ```text
//! statement + params
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │        Resolver         │  Parses and rewrites (external)
//! └───────────┬─────────────┘
//!             │ RoutingDecision
//!             ▼
//! ┌─────────────────────────┐
//! │    ExecutionPath        │  full scan? ──► FanOut
//! │   (Which strategy?)     │  double-write table? ──► DoubleWrite
//! └─────────────────────────┘  otherwise ──► Direct
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlshard_router_core::{FnResolver, Resolver, RoutingDecision};
//!
//! let resolver = FnResolver::new(|query, _args| Ok(RoutingDecision::direct(query)));
//! let decision = resolver.resolve("SELECT 1", &[])?;
//! ```

// Core modules
mod decision;
mod error;
mod resolver;
mod types;

// Re-exports: Error types
pub use error::RouterError;

// Re-exports: Core types
pub use types::{ExecutionPath, FAN_OUT_DELIMITER};

// Re-exports: Decisions and resolvers
pub use decision::RoutingDecision;
pub use resolver::{FnResolver, PassthroughResolver, Resolver};

//! Resolver contract
//!
//! The resolver parses a statement and its parameters and decides where it
//! goes. How it does that is up to the implementation; the pool only
//! relies on the contract below.
//!
//! # Contract
//!
//! - Deterministic for a given (statement, params, configuration).
//! - `table` is unset when the statement does not resolve to exactly one
//!   logical table.
//! - Full-scan decisions are built with [`RoutingDecision::full_scan`],
//!   which rejects shard statements containing the fan-out delimiter.

use sqlshard_types::Value;

use crate::decision::RoutingDecision;
use crate::error::RouterError;

/// Decides routing for one statement
pub trait Resolver: Send + Sync {
    /// Resolve `query` with its original positional parameters
    fn resolve(&self, query: &str, args: &[Value]) -> Result<RoutingDecision, RouterError>;

    /// Resolver name for logging
    fn name(&self) -> &'static str {
        "Resolver"
    }
}

/// Resolver backed by a closure
pub struct FnResolver<F> {
    resolve: F,
}

impl<F> FnResolver<F>
where
    F: Fn(&str, &[Value]) -> Result<RoutingDecision, RouterError> + Send + Sync,
{
    pub fn new(resolve: F) -> Self {
        Self { resolve }
    }
}

impl<F> Resolver for FnResolver<F>
where
    F: Fn(&str, &[Value]) -> Result<RoutingDecision, RouterError> + Send + Sync,
{
    fn resolve(&self, query: &str, args: &[Value]) -> Result<RoutingDecision, RouterError> {
        (self.resolve)(query, args)
    }

    fn name(&self) -> &'static str {
        "FnResolver"
    }
}

/// Resolver that routes every statement to itself, unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl Resolver for PassthroughResolver {
    fn resolve(&self, query: &str, _args: &[Value]) -> Result<RoutingDecision, RouterError> {
        if query.trim().is_empty() {
            return Err(RouterError::Unroutable("empty statement".to_string()));
        }
        Ok(RoutingDecision::direct(query))
    }

    fn name(&self) -> &'static str {
        "Passthrough"
    }
}

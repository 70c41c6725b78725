//! Shared atomic key-value store adapter.
//!
//! # Responsibilities
//! - Execute server-side atomic scripts against the shared store
//! - Enumerate state keys by prefix for the refill sweep
//!
//! # Design Decisions
//! - The rate limiter depends on the [`LimiterStore`] trait, not on Redis,
//!   so the bucket logic can be exercised against an in-process double
//! - Atomicity is the store's guarantee: one script invocation is one
//!   indivisible read-modify-write, with no process-local locking on top

#[cfg(test)]
pub(crate) mod memory;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use self::redis::RedisStore;

/// Errors surfaced by the store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store command failed: {0}")]
    Command(#[from] ::redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A positional script argument. Scripts accept integers and strings only.
#[derive(Debug, Clone)]
pub enum ScriptArg {
    Int(i64),
    Str(String),
}

/// Access to the shared store backing the rate limiter.
#[async_trait]
pub trait LimiterStore: Send + Sync {
    /// Execute an atomic server-side script with the given keys and
    /// positional arguments, returning its integer reply.
    async fn eval(
        &self,
        script: &str,
        keys: &[String],
        args: &[ScriptArg],
    ) -> Result<i64, StoreError>;

    /// Enumerate all keys under the given prefix.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

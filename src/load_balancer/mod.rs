//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Admitted request
//!     → pool.rs (snapshot of alive backends)
//!     → round_robin.rs (pick the next alive backend)
//!     → forward via the shared HTTP client
//!     → on transport error: mark that backend dead, answer 503
//! ```
//!
//! # Design Decisions
//! - Backend set is fixed after construction; only liveness changes
//! - Liveness is an atomic flag, read on every routed request
//! - Strategy is a trait object so alternatives can be swapped in
//!   without touching the pool

pub mod backend;
pub mod pool;
pub mod round_robin;

use std::sync::Arc;

use crate::load_balancer::backend::Backend;

/// Backend selection strategy.
///
/// Implementations receive the current alive subset and return the backend
/// the next request should go to, or `None` when nothing usable is left.
pub trait BalancingStrategy: Send + Sync {
    fn next_backend(&self, alive: &[Arc<Backend>]) -> Option<Arc<Backend>>;
}

pub use pool::LoadBalancer;
pub use round_robin::RoundRobin;

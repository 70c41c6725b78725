//! Distributed token-bucket rate limiting.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → allow(client key)
//!     → one atomic admission script against the shared store
//!     → 1 ⇒ token consumed, 0 ⇒ denied
//!
//! Refill loop (independent cadence):
//!     Periodic timer
//!     → enumerate bucket keys
//!     → one atomic refill script per bucket
//! ```
//!
//! # Design Decisions
//! - Bucket state lives entirely in the store; every proxy instance
//!   pointed at the same store shares one rate-limit view
//! - The admission path never refills; replenishment is strictly
//!   time-driven by the refill loop
//! - Store errors during admission deny the request (fail-closed)

pub mod token_bucket;

pub use token_bucket::{TokenBucket, ALLOW_SCRIPT, REFILL_SCRIPT};

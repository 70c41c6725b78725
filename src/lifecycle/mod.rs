//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT observed in main
//!     → Shutdown::trigger()
//!
//! Shutdown (shutdown.rs):
//!     broadcast to every subscribed task
//!     → health loop, refill loop and server each exit
//!       after at most their current tick
//! ```
//!
//! # Design Decisions
//! - Each background task holds its own receiver, handed over at spawn;
//!   there is no global mutable flag
//! - A task may finish the tick it is in, but never starts another one
//!   after observing the signal

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;

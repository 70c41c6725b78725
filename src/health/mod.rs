//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active probes (active.rs):
//!     Periodic timer
//!     → GET every backend's base URL (dead ones included)
//!     → 200 ⇒ alive, anything else ⇒ dead
//!
//! Passive signal (load_balancer/pool.rs):
//!     Forwarding failure observed
//!     → backend marked dead immediately
//!     → next probe may bring it back
//! ```
//!
//! # Design Decisions
//! - Probing dead backends too is what makes recovery possible
//! - One failed probe is enough to demote; there is no hysteresis
//! - Probe failures never stop the loop; only shutdown does

pub mod active;

pub use active::HealthMonitor;

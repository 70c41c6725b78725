//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, client IP)
//!     → rate limiter admission (429 on denial)
//!     → load balancer routing (proxied response or 503)
//!     → response.rs (JSON error bodies)
//! ```

pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};

//! Rate-limited HTTP load balancer.
//!
//! Routes inbound requests across a pool of upstream backends and protects
//! those backends from overload with a distributed token-bucket rate limiter
//! whose state lives in Redis.
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌──────────────────────────────────────────────────┐
//!                │                 THROTTLE PROXY                   │
//!                │                                                  │
//!  Client ──────▶│  http server ──▶ rate_limit ──▶ store (Redis)    │
//!                │       │          allowed?                        │
//!                │       ▼                                          │
//!                │  load_balancer (round robin over alive backends) │──▶ Backend
//!                │                                                  │
//!                │  background: health probe loop, refill loop      │
//!                │  cross-cutting: config, lifecycle, observability │
//!                └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod store;

// Traffic management
pub mod health;
pub mod load_balancer;
pub mod rate_limit;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

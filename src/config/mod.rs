//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → ProxyConfig (immutable)
//!     → plain values handed to each subsystem at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Subsystems never read files themselves; they receive values

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{BalancerConfig, LimiterConfig, ListenerConfig, ProxyConfig, RedisConfig};

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, timeouts).
    pub listener: ListenerConfig,

    /// Backend pool and health checking.
    pub balancer: BalancerConfig,

    /// Token-bucket rate limiter settings.
    pub limiter: LimiterConfig,

    /// Shared state store connection.
    pub redis: RedisConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Backend pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Backend base URLs (e.g., "http://127.0.0.1:9001").
    pub backends: Vec<String>,

    /// Health check interval in seconds.
    pub health_check_secs: u64,

    /// Per-probe timeout in seconds.
    pub probe_timeout_secs: u64,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            health_check_secs: 10,
            probe_timeout_secs: 5,
        }
    }
}

/// Rate limiter configuration.
///
/// Capacity, rate and TTL are integers by contract: tokens are whole units
/// and refill is applied discretely per refill tick, not as a continuous
/// leak.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Default bucket capacity per client.
    pub capacity: i64,

    /// Default tokens added per elapsed second at refill time.
    pub rate_per_sec: i64,

    /// Idle expiry for bucket state in seconds.
    pub ttl_secs: i64,

    /// Refill sweep interval in seconds.
    pub refill_secs: u64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            rate_per_sec: 1,
            ttl_secs: 60,
            refill_secs: 5,
        }
    }
}

/// Shared store connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL (e.g., "redis://127.0.0.1:6379").
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

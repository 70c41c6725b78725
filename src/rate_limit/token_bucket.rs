//! Token-bucket admission control backed by the shared store.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::broadcast;
use tokio::time;

use crate::config::LimiterConfig;
use crate::store::{LimiterStore, ScriptArg};

/// Admission script delivered to the store: check-and-consume one token.
pub const ALLOW_SCRIPT: &str = include_str!("scripts/allow.lua");

/// Refill script delivered to the store: time-driven replenishment.
pub const REFILL_SCRIPT: &str = include_str!("scripts/refill.lua");

const BUCKET_PREFIX: &str = "bucket:";
const CONFIG_PREFIX: &str = "config:";

/// Distributed token-bucket rate limiter.
///
/// Holds no bucket state in process memory; each decision is one atomic
/// script execution at the store, so concurrent callers and concurrent
/// proxy instances can never double-spend a token.
pub struct TokenBucket {
    store: Arc<dyn LimiterStore>,
    capacity: i64,
    rate: i64,
    ttl: i64,
}

impl TokenBucket {
    pub fn new(store: Arc<dyn LimiterStore>, config: &LimiterConfig) -> Self {
        Self {
            store,
            capacity: config.capacity,
            rate: config.rate_per_sec,
            ttl: config.ttl_secs,
        }
    }

    /// Check whether a request from `client_key` is admitted, consuming one
    /// token when it is.
    ///
    /// Store errors deny the request. Fail-closed is a deliberate policy:
    /// a caller cannot tell an unavailable store from a legitimate denial.
    pub async fn allow(&self, client_key: &str) -> bool {
        let keys = [
            format!("{BUCKET_PREFIX}{client_key}"),
            format!("{CONFIG_PREFIX}{client_key}"),
        ];
        let args = [
            ScriptArg::Int(unix_now()),
            ScriptArg::Int(self.ttl),
            ScriptArg::Int(self.capacity),
            ScriptArg::Int(self.rate),
        ];

        match self.store.eval(ALLOW_SCRIPT, &keys, &args).await {
            Ok(reply) => reply == 1,
            Err(e) => {
                tracing::error!(client = %client_key, error = %e, "Admission check failed, denying");
                false
            }
        }
    }

    /// Run the refill loop until the shutdown signal is observed.
    pub async fn run_refill(
        self: Arc<Self>,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!(interval_secs = interval.as_secs(), "Refill loop starting");

        let mut ticker = time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refill().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Refill loop stopped");
                    break;
                }
            }
        }
    }

    /// One refill sweep over every bucket currently in the store.
    ///
    /// Replenishment is applied discretely per sweep, `rate * elapsed`
    /// whole seconds at a time; per-key failures are logged and the batch
    /// continues.
    async fn refill(&self) {
        let keys = match self.store.keys_with_prefix(BUCKET_PREFIX).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!(error = %e, "Refill sweep failed to enumerate buckets");
                return;
            }
        };

        if keys.is_empty() {
            return;
        }

        tracing::debug!(buckets = keys.len(), "Refilling buckets");
        let now = unix_now();

        for bucket_key in keys {
            let client = bucket_key
                .strip_prefix(BUCKET_PREFIX)
                .unwrap_or(bucket_key.as_str());
            let keys = [bucket_key.clone(), format!("{CONFIG_PREFIX}{client}")];
            let args = [ScriptArg::Int(now), ScriptArg::Int(self.ttl)];

            if let Err(e) = self.store.eval(REFILL_SCRIPT, &keys, &args).await {
                tracing::warn!(bucket = %bucket_key, error = %e, "Refill failed for bucket");
            }
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64)
}

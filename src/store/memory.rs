//! In-process store double for rate limiter tests.
//!
//! Reproduces the admission and refill script contracts under one mutex,
//! standing in for the store's script atomicity. TTL expiry is not
//! modeled.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::rate_limit::{ALLOW_SCRIPT, REFILL_SCRIPT};
use crate::store::{LimiterStore, ScriptArg, StoreError};

const BUCKET_PREFIX: &str = "bucket:";
const CONFIG_PREFIX: &str = "config:";

struct BucketState {
    tokens: i64,
    last_refill: i64,
}

#[derive(Clone, Copy)]
struct BucketConfig {
    capacity: i64,
    rate: i64,
}

#[derive(Default)]
struct State {
    buckets: HashMap<String, BucketState>,
    configs: HashMap<String, BucketConfig>,
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Mutex<State>,
    fail: AtomicBool,
}

impl MemoryStore {
    /// Make every store call fail, to exercise fail-closed behavior.
    pub(crate) fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Seed a per-client config entry, as an operator would out of band.
    pub(crate) fn set_config(&self, client: &str, capacity: i64, rate: i64) {
        let mut state = self.state.lock().unwrap();
        state
            .configs
            .insert(format!("{CONFIG_PREFIX}{client}"), BucketConfig { capacity, rate });
    }

    pub(crate) fn drop_config(&self, client: &str) {
        let mut state = self.state.lock().unwrap();
        state.configs.remove(&format!("{CONFIG_PREFIX}{client}"));
    }

    /// Overwrite a bucket's state directly.
    pub(crate) fn set_bucket(&self, client: &str, tokens: i64, last_refill: i64) {
        let mut state = self.state.lock().unwrap();
        state
            .buckets
            .insert(format!("{BUCKET_PREFIX}{client}"), BucketState { tokens, last_refill });
    }

    /// Pretend the bucket was last refilled `secs` further in the past.
    pub(crate) fn rewind_last_refill(&self, client: &str, secs: i64) {
        let mut state = self.state.lock().unwrap();
        if let Some(bucket) = state.buckets.get_mut(&format!("{BUCKET_PREFIX}{client}")) {
            bucket.last_refill -= secs;
        }
    }

    fn run_allow(state: &mut State, keys: &[String], args: &[ScriptArg]) -> i64 {
        let now = int_arg(args, 0);
        let mut capacity = int_arg(args, 2);
        let mut rate = int_arg(args, 3);

        if let Some(config) = state.configs.get(&keys[1]) {
            capacity = config.capacity;
            rate = config.rate;
        }

        let bucket = state
            .buckets
            .entry(keys[0].clone())
            .or_insert(BucketState { tokens: capacity, last_refill: now });
        let allowed = if bucket.tokens >= 1 {
            bucket.tokens -= 1;
            1
        } else {
            0
        };

        state
            .configs
            .insert(keys[1].clone(), BucketConfig { capacity, rate });
        allowed
    }

    fn run_refill(state: &mut State, keys: &[String], args: &[ScriptArg]) -> i64 {
        let now = int_arg(args, 0);

        let Some(config) = state.configs.get(&keys[1]).copied() else {
            return 0;
        };
        let Some(bucket) = state.buckets.get_mut(&keys[0]) else {
            return 0;
        };

        let elapsed = (now - bucket.last_refill).max(0);
        bucket.tokens = (bucket.tokens + config.rate * elapsed).min(config.capacity);
        bucket.last_refill = now;
        bucket.tokens
    }
}

#[async_trait]
impl LimiterStore for MemoryStore {
    async fn eval(
        &self,
        script: &str,
        keys: &[String],
        args: &[ScriptArg],
    ) -> Result<i64, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        if script == ALLOW_SCRIPT {
            Ok(Self::run_allow(&mut state, keys, args))
        } else if script == REFILL_SCRIPT {
            Ok(Self::run_refill(&mut state, keys, args))
        } else {
            Err(StoreError::Unavailable("unknown script".to_string()))
        }
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }

        let state = self.state.lock().unwrap();
        Ok(state
            .buckets
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

fn int_arg(args: &[ScriptArg], index: usize) -> i64 {
    match args.get(index) {
        Some(ScriptArg::Int(v)) => *v,
        _ => 0,
    }
}

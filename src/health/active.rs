//! Active health checking.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::sync::broadcast;
use tokio::time;

use crate::load_balancer::LoadBalancer;
use crate::observability::metrics;

/// Periodically probes every backend and updates its liveness flag.
pub struct HealthMonitor {
    balancer: Arc<LoadBalancer>,
    interval: Duration,
    probe_timeout: Duration,
    client: Client<HttpConnector, Body>,
}

impl HealthMonitor {
    pub fn new(balancer: Arc<LoadBalancer>, interval: Duration, probe_timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            balancer,
            interval,
            probe_timeout,
            client,
        }
    }

    /// Run the probe loop until the shutdown signal is observed.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor stopped");
                    break;
                }
            }
        }
    }

    /// Probe every backend once. Every probe outcome lands in the backend's
    /// liveness flag; a currently-dead backend that answers 200 recovers.
    async fn check_all(&self) {
        for backend in self.balancer.backends() {
            let alive = self.probe(backend.url().as_str()).await;
            backend.set_alive(alive);
            metrics::record_backend_health(backend.authority().as_str(), alive);
        }
    }

    /// One GET against a backend's base URL. Alive means the request
    /// completed without transport error and answered exactly HTTP 200.
    async fn probe(&self, url: &str) -> bool {
        let request = match Request::builder()
            .method("GET")
            .uri(url)
            .header("user-agent", "throttle-proxy-health")
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Failed to build health probe");
                return false;
            }
        };

        match time::timeout(self.probe_timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let healthy = response.status() == StatusCode::OK;
                if !healthy {
                    tracing::warn!(url = %url, status = %response.status(), "Health probe failed: non-200 status");
                }
                healthy
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "Health probe failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(url = %url, "Health probe failed: timeout");
                false
            }
        }
    }
}

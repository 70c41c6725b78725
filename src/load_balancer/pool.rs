//! Backend pool management and the forwarding path.

use std::sync::Arc;

use axum::body::Body;
use axum::http::uri::{PathAndQuery, Scheme};
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::BalancerConfig;
use crate::http::response::json_error;
use crate::load_balancer::backend::Backend;
use crate::load_balancer::round_robin::RoundRobin;
use crate::load_balancer::BalancingStrategy;

/// Owns the backend set and routes admitted requests.
///
/// The set is fixed after construction; backends are only ever marked dead
/// or alive, never removed.
pub struct LoadBalancer {
    backends: Vec<Arc<Backend>>,
    strategy: Box<dyn BalancingStrategy>,
    client: Client<HttpConnector, Body>,
}

impl LoadBalancer {
    /// Build a pool from configured addresses with round-robin selection.
    ///
    /// Addresses that fail to parse are logged and dropped; a pool that
    /// ends up empty is legal and answers every request with 503.
    pub fn new(config: &BalancerConfig) -> Self {
        Self::with_strategy(config, Box::new(RoundRobin::new()))
    }

    /// Build a pool with an explicit selection strategy.
    pub fn with_strategy(config: &BalancerConfig, strategy: Box<dyn BalancingStrategy>) -> Self {
        let mut backends = Vec::with_capacity(config.backends.len());
        for addr in &config.backends {
            match Backend::from_addr(addr) {
                Ok(backend) => backends.push(Arc::new(backend)),
                Err(e) => {
                    tracing::warn!(address = %addr, error = %e, "Skipping invalid backend address");
                }
            }
        }

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            backends,
            strategy,
            client,
        }
    }

    /// All backends, alive or not (the health loop probes every one).
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    /// Snapshot of backends currently marked alive. Computed on demand so
    /// every caller sees the latest liveness flags.
    pub fn alive_backends(&self) -> Vec<Arc<Backend>> {
        self.backends.iter().filter(|b| b.is_alive()).cloned().collect()
    }

    /// Pick an alive backend and forward the request to it.
    ///
    /// Answers 503 when the pool is exhausted. Forwarding is attempted
    /// against exactly one backend; a transport failure marks that backend
    /// dead and is surfaced to the caller, never retried elsewhere.
    pub async fn route(&self, request: Request<Body>) -> Response {
        let alive = self.alive_backends();
        if alive.is_empty() {
            tracing::warn!("No alive backends available");
            return json_error(StatusCode::SERVICE_UNAVAILABLE, "service unavailable: no alive backend");
        }

        // The snapshot can go stale between the filter and the pick.
        let Some(backend) = self.strategy.next_backend(&alive) else {
            tracing::warn!("No alive backends available");
            return json_error(StatusCode::SERVICE_UNAVAILABLE, "service unavailable: no alive backend");
        };

        tracing::debug!(backend = %backend.url(), "Forwarding request");
        self.forward(backend, request).await
    }

    async fn forward(&self, backend: Arc<Backend>, request: Request<Body>) -> Response {
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(backend.authority().clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri = match Uri::from_parts(uri_parts) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(backend = %backend.url(), error = %e, "Request uri rewrite failed");
                return json_error(StatusCode::BAD_GATEWAY, "bad gateway");
            }
        };

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => proxied_response(response),
            Err(e) => {
                backend.set_alive(false);
                tracing::error!(backend = %backend.url(), error = %e, "Marked backend as down");
                json_error(StatusCode::SERVICE_UNAVAILABLE, "backend unavailable")
            }
        }
    }
}

/// Hand the upstream response back to the client, streaming the body.
fn proxied_response(response: hyper::Response<Incoming>) -> Response {
    response.map(Body::new).into_response()
}

//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all gateway handler
//! - Wire up middleware (tracing, request timeout)
//! - Extract the client IP used as the rate-limit key
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::response::json_error;
use crate::load_balancer::LoadBalancer;
use crate::observability::metrics;
use crate::rate_limit::TokenBucket;

/// Application state injected into the gateway handler.
#[derive(Clone)]
pub struct AppState {
    pub balancer: Arc<LoadBalancer>,
    pub limiter: Arc<TokenBucket>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the given state.
    pub fn new(state: AppState, request_timeout: Duration) -> Self {
        let router = Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Accept connections until the shutdown signal is observed, then
    /// drain in-flight requests and return.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Admission check, then routing. Every inbound request passes through
/// here regardless of method or path.
async fn gateway_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let client_ip = addr.ip().to_string();
    let method = request.method().to_string();

    if !state.limiter.allow(&client_ip).await {
        tracing::warn!(client = %client_ip, "Too many requests");
        metrics::record_rate_limited();
        return json_error(StatusCode::TOO_MANY_REQUESTS, "too many requests from your IP");
    }

    let response = state.balancer.route(request).await;
    metrics::record_request(&method, response.status().as_u16());
    response
}

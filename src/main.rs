//! Binary entry point: wire configuration, store, limiter, balancer and
//! HTTP server together, then run until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use throttle_proxy::config::load_config;
use throttle_proxy::health::HealthMonitor;
use throttle_proxy::http::{AppState, HttpServer};
use throttle_proxy::lifecycle::{signals, Shutdown};
use throttle_proxy::load_balancer::LoadBalancer;
use throttle_proxy::observability::{logging, metrics};
use throttle_proxy::rate_limit::TokenBucket;
use throttle_proxy::store::RedisStore;

#[derive(Parser)]
#[command(name = "throttle-proxy", about = "Rate-limited HTTP load balancer", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "configs/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.balancer.backends.len(),
        capacity = config.limiter.capacity,
        rate_per_sec = config.limiter.rate_per_sec,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    error = %e,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    // A dead store is fatal at startup; afterwards the limiter only
    // fails closed per request.
    let store = Arc::new(RedisStore::connect(&config.redis.url).await?);
    let limiter = Arc::new(TokenBucket::new(store, &config.limiter));
    let balancer = Arc::new(LoadBalancer::new(&config.balancer));

    let shutdown = Shutdown::new();

    let monitor = HealthMonitor::new(
        balancer.clone(),
        Duration::from_secs(config.balancer.health_check_secs),
        Duration::from_secs(config.balancer.probe_timeout_secs),
    );
    tokio::spawn(monitor.run(shutdown.subscribe()));

    tokio::spawn(limiter.clone().run_refill(
        Duration::from_secs(config.limiter.refill_secs),
        shutdown.subscribe(),
    ));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(
        AppState { balancer, limiter },
        Duration::from_secs(config.listener.request_timeout_secs),
    );
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::wait_for_signal().await;
    tracing::info!("Shutdown initiated");
    shutdown.trigger();

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}

//! Plain HTTP backend for exercising the balancer by hand.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use clap::Parser;

#[derive(Parser)]
#[command(name = "mock-backend", about = "Minimal upstream backend for manual testing")]
struct Cli {
    #[arg(short, long, default_value_t = 9001)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let port = cli.port;

    let app = Router::new().route(
        "/",
        get(move || async move { format!("Hello from backend on port {port}\n") }),
    );

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Backend is running on port {port}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

//! Dashboard HTTP Server Binary
//!
//! Main entry point for the dashboard REST API. Loads the gateway
//! configuration, builds the gateway, sets up the router and serves.
//!
//! # Usage
//!
//! ```bash
//! # Against the real services (URLs from dashboard.toml or env)
//! cargo run --bin sdash-server
//!
//! # With the in-memory gateway
//! SDASH_GATEWAY=local cargo run --bin sdash-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `SDASH_GATEWAY`: `http` (default) or `local`
//! - `SDASH_BUILDINGS_URL`: buildings service base URL
//! - `SDASH_SUSTAINABILITY_URL`: sustainability service base URL
//! - `SDASH_REQUEST_TIMEOUT_SECS`: upstream timeout, `0` disables it
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sdash_rust::gateway::{DashboardConfig, GatewayFactory};
use sdash_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting dashboard HTTP server");

    let config = DashboardConfig::load()?;
    info!(
        "Gateway: {} (buildings={}, sustainability={})",
        config.gateway.gateway_type,
        config.backends.buildings_url,
        config.backends.sustainability_url
    );
    let gateway = GatewayFactory::create(&config)?;

    let app = create_router(AppState::new(gateway));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Geodash HTTP Server Binary
//!
//! Main entry point for the geodashboard REST API server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin geodash-server
//!
//! # Point at a different prediction service
//! PREDICTION_SERVICE_URL=http://models.internal:8000 cargo run --bin geodash-server
//! ```
//!
//! # Environment Variables
//!
//! - `GEODASH_CONFIG`: Path to a TOML config file (default: search for `geodash.toml`)
//! - `PREDICTION_SERVICE_URL`: Base URL of the prediction service (default: http://localhost:8000)
//! - `PREDICTION_TIMEOUT_SECS`: Forecast request timeout (default: 20)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geodash::http::{create_router, AppState};
use geodash::services::HttpForecastTransport;
use geodash::DashboardConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
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

    info!("Starting geodash HTTP server");

    let config = match env::var("GEODASH_CONFIG") {
        Ok(path) => DashboardConfig::from_file(&path)?.apply_env()?,
        Err(_) => DashboardConfig::load()?,
    };

    let transport = HttpForecastTransport::new(&config.forecast)?;
    info!(
        url = transport.url(),
        timeout_secs = config.forecast.timeout_secs,
        "Prediction service configured"
    );

    let state = AppState::new(Arc::new(transport));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

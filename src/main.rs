// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::{load_sentinel_config, load_widgets_config};
use crate::infrastructure::static_registry::StaticRegistry;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_sentinel_config()?;
    let widgets_config = load_widgets_config()?;

    // Create registry (infrastructure layer) and services (application layer)
    let registry = Arc::new(StaticRegistry::new());
    let state = Arc::new(AppState::new(registry, &config, widgets_config)?);

    // Build router (presentation layer)
    let router = router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .addr
        .parse()
        .with_context(|| format!("invalid server address {:?}", config.server.addr))?;
    tracing::info!("Starting sentinel-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

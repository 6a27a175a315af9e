//! mpdd - a Music Player Daemon protocol server.
//!
//! Accepts MPD clients over TCP, dispatches their commands through a typed
//! command registry and pushes idle notifications as the engine changes.

mod config;
mod dispatcher;
mod engine;
mod error;
mod handlers;
mod network;
mod state;
mod telemetry;

use crate::config::Config;
use crate::engine::{Engine, MemoryEngine};
use crate::handlers::build_registry;
use crate::network::Gateway;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        password = config.mpd.password.is_some(),
        "Starting mpdd"
    );

    let registry = Arc::new(build_registry().map_err(|e| {
        error!(error = %e, "Invalid command table");
        e
    })?);
    info!(commands = registry.len(), "Command registry built");

    let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
    let settings = Arc::new(config.mpd);

    let gateway = Gateway::bind(config.listen.address, registry, engine, settings).await?;

    tokio::select! {
        result = gateway.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    Ok(())
}

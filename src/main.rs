//! Shorty - An In-Memory URL Shortener
//!
//! This is the main entry point for the Shorty server.
//! It sets up logging, the mapping store, the expiry sweeper and the HTTP server.

use anyhow::Context;
use clap::Parser;
use shorty::config::Config;
use shorty::http::{router, AppState};
use shorty::service::ShortenerService;
use shorty::storage::{start_expiry_sweeper, MappingStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn print_banner(config: &Config) {
    println!(
        r#"
Shorty v{} - In-Memory URL Shortener
──────────────────────────────────────────────────────────────
Server started on http://{}
Code strategy: {:?}, cleanup every {}s

Use Ctrl+C to shutdown gracefully.
"#,
        shorty::VERSION,
        config.bind_address(),
        config.strategy,
        config.cleanup_interval_secs
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments and environment
    let config = Config::parse();

    // Set up logging; RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shorty=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    print_banner(&config);

    // Create the mapping store (shared across all requests)
    let store = Arc::new(MappingStore::new());

    // Start the background expiry sweeper
    let _sweeper = start_expiry_sweeper(Arc::clone(&store), config.cleanup_interval());

    let service = ShortenerService::with_strategy(store, config.strategy.build());
    let state = AppState::new(service, config.base_url.clone());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!("Listening on {}", config.bind_address());

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when Ctrl+C is received.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server..."),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}

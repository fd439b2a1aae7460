//! Main Entrypoint for the Switchboard API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Wiring the lifecycle manager to the configured agent runtime.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use switchboard_api::{
    config::Config,
    lifecycle::{LifecycleManager, SessionRegistry, StatusReporter},
    router::create_router,
    runtime::RealtimeAgentFactory,
    state::AppState,
};
use switchboard_core::agent::AgentFactory;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Wire the Lifecycle Manager ---
    let config = Arc::new(config);
    let registry = Arc::new(SessionRegistry::new());
    let factory: Arc<dyn AgentFactory> =
        Arc::new(RealtimeAgentFactory::new(Arc::clone(&config)));
    let manager = Arc::new(LifecycleManager::new(
        Arc::clone(&registry),
        factory,
        config.session_timeout,
    ));
    let status = StatusReporter::new(registry);

    let app_state = Arc::new(AppState {
        manager,
        status,
        config: Arc::clone(&config),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.realtime_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}

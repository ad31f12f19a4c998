//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use axum::{routing::get, Router};
use presence_common::{AppConfig, AppError, AppResult};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/presence", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create `GatewayState` and start its heartbeat monitor
///
/// Must be called from within a Tokio runtime.
pub fn create_gateway_state(config: AppConfig) -> GatewayState {
    let state = GatewayState::new(config);
    state.monitor().clone().start();
    state
}

/// Run the gateway server until Ctrl-C
pub async fn run_server(state: GatewayState, addr: &str) -> AppResult<()> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::bind(addr, e))?;

    tracing::info!("Gateway listening on ws://{}/presence", addr);

    let monitor = state.monitor().clone();
    let result = axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server);

    monitor.stop();
    tracing::info!("Gateway server stopped");

    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr = config.gateway.address();

    // Create gateway state
    let state = create_gateway_state(config);

    // Run server
    run_server(state, &addr).await
}

//! Presence Gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p presence-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use presence_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.gateway.address(),
        sweep_interval_s = config.presence.sweep_interval.as_secs(),
        heartbeat_timeout_s = config.presence.heartbeat_timeout.as_secs(),
        "Configuration loaded"
    );

    // Run the gateway server
    if let Err(e) = presence_gateway::run(config).await {
        error!(error = %e, code = e.error_code(), "Gateway failed");
        std::process::exit(1);
    }
}

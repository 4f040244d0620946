//! Reactor gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p reactor-gateway
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use reactor_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Err(e) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {e}");
            }
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.gateway.port,
        postgres = config.database.url.is_some(),
        telegram = config.telegram.bot_token.is_some(),
        "Starting reactor gateway"
    );

    if let Err(e) = reactor_gateway::run(config).await {
        error!(code = e.error_code(), error = %e, "Gateway failed");
        std::process::exit(1);
    }
}

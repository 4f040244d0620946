//! Gateway server setup
//!
//! Routes, process wiring, and the entry point used by the binary.

mod gateway;
mod handler;
mod state;
mod stores;

pub use gateway::{Gateway, OfflineClient};
pub use handler::ws_handler;
pub use state::GatewayState;
pub use stores::Stores;

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use reactor_common::{AppConfig, AppError};
use reactor_core::ReactionClient;
use reactor_telegram::{PollerConfig, TelegramClient, UpdatePoller};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, stats};

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    let api = Router::new()
        .route("/stats", get(stats::snapshot))
        .route("/stats/runtime", get(stats::runtime))
        .route("/stats/chat/:chat_id", get(stats::chat))
        .route("/stats/daily", get(stats::daily))
        .route("/stats/top-chats", get(stats::top_chats));

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health::health_check))
        .nest("/api/v1", api)
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Run the gateway with configuration until Ctrl-C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let stores = Stores::connect(&config).await?;

    let telegram = TelegramClient::from_config(&config.telegram)
        .map_err(|e| AppError::Config(format!("Telegram client: {e}")))?
        .map(Arc::new);
    let (client, poller): (Arc<dyn ReactionClient>, Option<UpdatePoller>) = match telegram {
        Some(client) => {
            let poller =
                UpdatePoller::new(Arc::clone(&client), PollerConfig::from_settings(&config.telegram));
            (client, Some(poller))
        }
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN not set, update polling disabled");
            (Arc::new(OfflineClient), None)
        }
    };

    let addr = config.gateway.address();
    let gateway = Gateway::new(config, stores, client, poller)?;

    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {addr}"))
        .map_err(AppError::internal)?;
    tracing::info!("Gateway listening on ws://{}/ws", addr);

    let handle = gateway.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                handle.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    gateway.serve(listener).await
}

//! Gateway runtime
//!
//! Ties the reaction pipeline, the broadcast service, the optional update
//! poller, and the HTTP server to one shutdown trigger.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use reactor_common::{AppConfig, AppError};
use reactor_core::{ChatId, InboundSink, MessageId, PlatformError, ReactionClient};
use reactor_service::{
    shutdown_channel, ReactionPipeline, RetryPolicy, ServiceContextBuilder, ShutdownSignal,
    ShutdownTrigger,
};
use reactor_telegram::UpdatePoller;

use super::{create_app, GatewayState, Stores};
use crate::broadcast::BroadcastService;

/// Platform client used when no bot token is configured
#[derive(Debug, Default)]
pub struct OfflineClient;

#[async_trait]
impl ReactionClient for OfflineClient {
    async fn send_reaction(
        &self,
        _chat_id: ChatId,
        _message_id: MessageId,
        _emoji: &str,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::rpc("Telegram bot token not configured"))
    }
}

/// A fully wired gateway, ready to serve
pub struct Gateway {
    state: GatewayState,
    pipeline: ReactionPipeline,
    poller: Option<UpdatePoller>,
    trigger: Arc<ShutdownTrigger>,
}

impl Gateway {
    pub fn new(
        config: AppConfig,
        stores: Stores,
        client: Arc<dyn ReactionClient>,
        poller: Option<UpdatePoller>,
    ) -> Result<Self, AppError> {
        let (trigger, signal) = shutdown_channel();

        let services = ServiceContextBuilder::new()
            .policy_repo(stores.policies)
            .outcome_repo(stores.outcomes)
            .settings_repo(stores.settings)
            .client(client)
            .shutdown(signal)
            .retry(RetryPolicy::from_config(&config.retry))
            .build()?;

        let stats = Arc::new(services.stats());
        let broadcast = Arc::new(BroadcastService::new(
            stats.clone(),
            services.events().clone(),
            config.broadcast.interval(),
            config.broadcast.buffer,
        ));
        let pipeline = services.pipeline();

        let state = GatewayState::new(
            services,
            stats,
            broadcast,
            config,
            stores.database,
            poller.is_some(),
        );

        Ok(Self {
            state,
            pipeline,
            poller,
            trigger: Arc::new(trigger),
        })
    }

    pub fn state(&self) -> &GatewayState {
        &self.state
    }

    /// Inbound entry point of the reaction pipeline
    pub fn pipeline(&self) -> &ReactionPipeline {
        &self.pipeline
    }

    pub fn app(&self) -> Router {
        create_app(self.state.clone())
    }

    /// Trigger that stops [`Gateway::serve`]
    pub fn shutdown_handle(&self) -> Arc<ShutdownTrigger> {
        Arc::clone(&self.trigger)
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.trigger.signal()
    }

    /// Serve until the shutdown trigger fires
    pub async fn serve(self, listener: TcpListener) -> Result<(), AppError> {
        let Self {
            state,
            pipeline,
            poller,
            trigger,
        } = self;

        state.broadcast().start();

        let poller_task = poller.map(|poller| {
            let sink: Arc<dyn InboundSink> = Arc::new(pipeline.clone());
            let signal = trigger.signal();
            tokio::spawn(async move {
                poller.run(sink, async move { signal.wait().await }).await;
            })
        });

        let signal = trigger.signal();
        let result = axum::serve(listener, create_app(state.clone()))
            .with_graceful_shutdown(async move { signal.wait().await })
            .await;

        // Server errors also stop the background tasks
        trigger.trigger();
        state.broadcast().stop().await;
        if let Some(task) = poller_task {
            if let Err(e) = task.await {
                warn!(error = %e, "Update poller ended abnormally");
            }
        }
        info!("Gateway stopped");

        result
            .context("HTTP server failed")
            .map_err(AppError::internal)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("state", &self.state)
            .field("poller", &self.poller.is_some())
            .finish_non_exhaustive()
    }
}

//! Gateway state
//!
//! Shared dependencies for the HTTP and WebSocket handlers.

use std::sync::Arc;

use reactor_common::AppConfig;
use reactor_db::PgPool;
use reactor_service::{ServiceContext, StatsAggregator};

use crate::broadcast::BroadcastService;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    services: ServiceContext,
    stats: Arc<StatsAggregator>,
    broadcast: Arc<BroadcastService>,
    config: Arc<AppConfig>,
    /// Present when running on PostgreSQL
    database: Option<PgPool>,
    telegram_enabled: bool,
}

impl GatewayState {
    pub fn new(
        services: ServiceContext,
        stats: Arc<StatsAggregator>,
        broadcast: Arc<BroadcastService>,
        config: AppConfig,
        database: Option<PgPool>,
        telegram_enabled: bool,
    ) -> Self {
        Self {
            services,
            stats,
            broadcast,
            config: Arc::new(config),
            database,
            telegram_enabled,
        }
    }

    pub fn services(&self) -> &ServiceContext {
        &self.services
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    pub fn broadcast(&self) -> &Arc<BroadcastService> {
        &self.broadcast
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> Option<&PgPool> {
        self.database.as_ref()
    }

    pub fn telegram_enabled(&self) -> bool {
        self.telegram_enabled
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("broadcast", &self.broadcast)
            .field("postgres", &self.database.is_some())
            .field("telegram_enabled", &self.telegram_enabled)
            .finish_non_exhaustive()
    }
}

//! Store selection
//!
//! PostgreSQL when `DATABASE_URL` is set, the in-memory repositories
//! otherwise.

use std::sync::Arc;

use reactor_common::{AppConfig, AppError};
use reactor_core::{OutcomeRepository, PolicyRepository, SettingsRepository};
use reactor_db::{
    create_pool, run_migrations, DatabaseConfig, MemoryOutcomeRepository, MemoryPolicyRepository,
    MemorySettingsRepository, PgOutcomeRepository, PgPolicyRepository, PgPool,
    PgSettingsRepository,
};
use tracing::{info, warn};

/// Repositories backing one gateway process
#[derive(Clone)]
pub struct Stores {
    pub policies: Arc<dyn PolicyRepository>,
    pub outcomes: Arc<dyn OutcomeRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    /// Pool behind the repositories, if any
    pub database: Option<PgPool>,
}

impl Stores {
    /// Process-local storage; nothing survives a restart
    pub fn memory() -> Self {
        Self {
            policies: Arc::new(MemoryPolicyRepository::new()),
            outcomes: Arc::new(MemoryOutcomeRepository::new()),
            settings: Arc::new(MemorySettingsRepository::new()),
            database: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            policies: Arc::new(PgPolicyRepository::new(pool.clone())),
            outcomes: Arc::new(PgOutcomeRepository::new(pool.clone())),
            settings: Arc::new(PgSettingsRepository::new(pool.clone())),
            database: Some(pool),
        }
    }

    /// Open the configured store, applying the schema on PostgreSQL
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let Some(db_config) = DatabaseConfig::from_settings(&config.database) else {
            warn!("DATABASE_URL not set, using in-memory storage");
            return Ok(Self::memory());
        };

        info!("Connecting to PostgreSQL...");
        let pool = create_pool(&db_config)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
        info!("PostgreSQL connection established");

        Ok(Self::postgres(pool))
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("postgres", &self.database.is_some())
            .finish_non_exhaustive()
    }
}

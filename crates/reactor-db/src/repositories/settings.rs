//! PostgreSQL implementation of SettingsRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use reactor_core::entities::BotSettings;
use reactor_core::traits::{RepoResult, SettingsRepository};

use super::error::map_db_error;

/// PostgreSQL implementation of SettingsRepository
///
/// Settings live in a single JSONB document; fields missing from the
/// document take their defaults.
#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    /// Create a new PgSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store the settings document
    #[instrument(skip(self, settings))]
    pub async fn save(&self, settings: &BotSettings) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bot_settings (id, settings, updated_at)
            VALUES (1, $1, NOW())
            ON CONFLICT (id) DO UPDATE SET settings = EXCLUDED.settings, updated_at = NOW()
            "#,
        )
        .bind(Json(settings))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    #[instrument(skip(self))]
    async fn bot_settings(&self) -> RepoResult<Option<BotSettings>> {
        let result = sqlx::query_scalar::<_, Json<BotSettings>>(
            "SELECT settings FROM bot_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(|Json(settings)| settings))
    }
}

//! PostgreSQL implementation of PolicyRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use reactor_core::entities::ChatPolicy;
use reactor_core::traits::{PolicyRepository, RepoResult};
use reactor_core::value_objects::ChatId;

use crate::models::{ChatPolicyModel, ChatTitleModel};

use super::error::{map_db_error, to_count};

/// PostgreSQL implementation of PolicyRepository
#[derive(Clone)]
pub struct PgPolicyRepository {
    pool: PgPool,
}

impl PgPolicyRepository {
    /// Create a new PgPolicyRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace a policy
    ///
    /// Administration writes policies; the pipeline itself never calls this.
    /// Policies that fail [`ChatPolicy::check`] are rejected before any write.
    #[instrument(skip(self, policy), fields(chat_id = %policy.chat_id))]
    pub async fn upsert(&self, policy: &ChatPolicy) -> RepoResult<()> {
        policy.check()?;

        sqlx::query(
            r#"
            INSERT INTO chat_policies (
                chat_id, chat_title, enabled, reaction_mode, emojis, delay_min, delay_max,
                react_to_text, react_to_media, react_to_forwards, sequential_cursor, added_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (chat_id) DO UPDATE SET
                chat_title = EXCLUDED.chat_title,
                enabled = EXCLUDED.enabled,
                reaction_mode = EXCLUDED.reaction_mode,
                emojis = EXCLUDED.emojis,
                delay_min = EXCLUDED.delay_min,
                delay_max = EXCLUDED.delay_max,
                react_to_text = EXCLUDED.react_to_text,
                react_to_media = EXCLUDED.react_to_media,
                react_to_forwards = EXCLUDED.react_to_forwards,
                sequential_cursor = EXCLUDED.sequential_cursor
            "#,
        )
        .bind(policy.chat_id.into_inner())
        .bind(&policy.chat_title)
        .bind(policy.enabled)
        .bind(policy.reaction_mode.as_str())
        .bind(&policy.emojis)
        .bind(i32::try_from(policy.delay_min).unwrap_or(i32::MAX))
        .bind(i32::try_from(policy.delay_max).unwrap_or(i32::MAX))
        .bind(policy.react_to_text)
        .bind(policy.react_to_media)
        .bind(policy.react_to_forwards)
        .bind(policy.sequential_cursor)
        .bind(policy.added_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    /// Delete a policy
    #[instrument(skip(self))]
    pub async fn delete(&self, chat_id: ChatId) -> RepoResult<()> {
        sqlx::query("DELETE FROM chat_policies WHERE chat_id = $1")
            .bind(chat_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl PolicyRepository for PgPolicyRepository {
    #[instrument(skip(self))]
    async fn find_by_chat(&self, chat_id: ChatId) -> RepoResult<Option<ChatPolicy>> {
        let result = sqlx::query_as::<_, ChatPolicyModel>(
            r#"
            SELECT chat_id, chat_title, enabled, reaction_mode, emojis, delay_min, delay_max,
                   react_to_text, react_to_media, react_to_forwards, sequential_cursor, added_at
            FROM chat_policies
            WHERE chat_id = $1
            "#,
        )
        .bind(chat_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ChatPolicy::from))
    }

    #[instrument(skip(self, chat_ids), fields(count = chat_ids.len()))]
    async fn find_titles(&self, chat_ids: &[ChatId]) -> RepoResult<HashMap<ChatId, String>> {
        if chat_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<i64> = chat_ids.iter().map(|id| id.into_inner()).collect();

        let rows = sqlx::query_as::<_, ChatTitleModel>(
            r#"
            SELECT chat_id, chat_title
            FROM chat_policies
            WHERE chat_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (ChatId::new(row.chat_id), row.chat_title))
            .collect())
    }

    #[instrument(skip(self))]
    async fn count_enabled(&self) -> RepoResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM chat_policies WHERE enabled = TRUE",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(to_count(count))
    }

    #[instrument(skip(self))]
    async fn update_cursor(&self, chat_id: ChatId, cursor: i32) -> RepoResult<()> {
        sqlx::query("UPDATE chat_policies SET sequential_cursor = $2 WHERE chat_id = $1")
            .bind(chat_id.into_inner())
            .bind(cursor)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}

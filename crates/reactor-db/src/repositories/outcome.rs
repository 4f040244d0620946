//! PostgreSQL implementation of OutcomeRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use reactor_core::entities::OutcomeRecord;
use reactor_core::traits::{OutcomeFilter, OutcomeRepository, RepoResult};
use reactor_core::value_objects::ChatId;

use crate::mappers::OutcomeInsert;
use crate::models::{ChatCountModel, EmojiCountModel, HourlyCountModel};

use super::error::{map_db_error, to_count};

/// PostgreSQL implementation of OutcomeRepository
#[derive(Clone)]
pub struct PgOutcomeRepository {
    pool: PgPool,
}

impl PgOutcomeRepository {
    /// Create a new PgOutcomeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the WHERE clause selecting `filter`
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &OutcomeFilter) {
    qb.push(" WHERE TRUE");
    if !filter.statuses.is_empty() {
        let statuses: Vec<String> = filter
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        qb.push(" AND status = ANY(").push_bind(statuses).push(")");
    }
    if let Some(chat_id) = filter.chat_id {
        qb.push(" AND chat_id = ").push_bind(chat_id.into_inner());
    }
    if let Some(since) = filter.since {
        qb.push(" AND recorded_at >= ").push_bind(since);
    }
    if let Some(until) = filter.until {
        qb.push(" AND recorded_at < ").push_bind(until);
    }
}

fn to_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl OutcomeRepository for PgOutcomeRepository {
    #[instrument(skip(self, record), fields(chat_id = %record.chat_id, message_id = %record.message_id, status = %record.status))]
    async fn append(&self, record: &OutcomeRecord) -> RepoResult<()> {
        let insert = OutcomeInsert::new(record);

        sqlx::query(
            r#"
            INSERT INTO reaction_outcomes
                (chat_id, message_id, emoji, recorded_at, status, error, retry_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(insert.chat_id)
        .bind(insert.message_id)
        .bind(insert.emoji)
        .bind(insert.recorded_at)
        .bind(insert.status)
        .bind(insert.error)
        .bind(insert.retry_count)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &OutcomeFilter) -> RepoResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reaction_outcomes");
        push_filter(&mut qb, filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(to_count(count))
    }

    #[instrument(skip(self))]
    async fn emoji_histogram(
        &self,
        filter: &OutcomeFilter,
        limit: usize,
    ) -> RepoResult<Vec<(String, u64)>> {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT emoji, COUNT(*) AS count FROM reaction_outcomes");
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY emoji ORDER BY count DESC, emoji LIMIT ")
            .push_bind(to_limit(limit));

        let rows = qb
            .build_query_as::<EmojiCountModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.emoji, to_count(row.count)))
            .collect())
    }

    #[instrument(skip(self))]
    async fn hourly_counts(
        &self,
        filter: &OutcomeFilter,
    ) -> RepoResult<Vec<(DateTime<Utc>, u64)>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT date_trunc('hour', recorded_at AT TIME ZONE 'UTC') AT TIME ZONE 'UTC' AS bucket, \
             COUNT(*) AS count FROM reaction_outcomes",
        );
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY bucket ORDER BY bucket");

        let rows = qb
            .build_query_as::<HourlyCountModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.bucket, to_count(row.count)))
            .collect())
    }

    #[instrument(skip(self))]
    async fn distinct_chats(&self, filter: &OutcomeFilter) -> RepoResult<u64> {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(DISTINCT chat_id) FROM reaction_outcomes");
        push_filter(&mut qb, filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(to_count(count))
    }

    #[instrument(skip(self))]
    async fn top_chats(
        &self,
        filter: &OutcomeFilter,
        limit: usize,
    ) -> RepoResult<Vec<(ChatId, u64)>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT chat_id, COUNT(*) AS count FROM reaction_outcomes",
        );
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY chat_id ORDER BY count DESC, chat_id LIMIT ")
            .push_bind(to_limit(limit));

        let rows = qb
            .build_query_as::<ChatCountModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (ChatId::new(row.chat_id), to_count(row.count)))
            .collect())
    }
}

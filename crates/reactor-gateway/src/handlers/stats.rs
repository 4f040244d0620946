//! Stats handlers
//!
//! Read-only views over the outcome log. Aggregation failures degrade to
//! empty results inside the aggregator, so these only fail on bad input.

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use reactor_core::{AggregateSnapshot, ChatStats, DailySummary, TopChat};
use reactor_service::{RuntimeStats, SnapshotProvider};

use crate::extractors::{ChatIdPath, ValidatedQuery};
use crate::response::ApiResult;
use crate::server::GatewayState;

const DEFAULT_DAYS: i64 = 7;
const DEFAULT_TOP_LIMIT: usize = 10;

/// `?days=` window
#[derive(Debug, Default, Deserialize, Validate)]
pub struct WindowQuery {
    #[validate(range(min = 1, max = 365))]
    pub days: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TopChatsQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
    #[validate(range(min = 1, max = 365))]
    pub days: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct DailyQuery {
    /// `YYYY-MM-DD`, today (UTC) when absent
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/stats
pub async fn snapshot(State(state): State<GatewayState>) -> Json<AggregateSnapshot> {
    Json(state.stats().snapshot().await)
}

/// GET /api/v1/stats/runtime
pub async fn runtime(State(state): State<GatewayState>) -> Json<RuntimeStats> {
    Json(state.services().counters().snapshot())
}

/// GET /api/v1/stats/chat/:chat_id
pub async fn chat(
    State(state): State<GatewayState>,
    ChatIdPath(chat_id): ChatIdPath,
    ValidatedQuery(query): ValidatedQuery<WindowQuery>,
) -> ApiResult<Json<ChatStats>> {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    Ok(Json(state.stats().chat_stats(chat_id, days).await))
}

/// GET /api/v1/stats/daily
pub async fn daily(
    State(state): State<GatewayState>,
    ValidatedQuery(query): ValidatedQuery<DailyQuery>,
) -> ApiResult<Json<DailySummary>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(state.stats().daily_summary(date).await))
}

/// GET /api/v1/stats/top-chats
pub async fn top_chats(
    State(state): State<GatewayState>,
    ValidatedQuery(query): ValidatedQuery<TopChatsQuery>,
) -> ApiResult<Json<Vec<TopChat>>> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    Ok(Json(state.stats().top_chats(limit, days).await))
}

//! Outcome record -> insert values mapper

use chrono::{DateTime, Utc};
use reactor_core::entities::OutcomeRecord;

/// Outcome record values for database insertion
pub struct OutcomeInsert<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub emoji: &'a str,
    pub recorded_at: DateTime<Utc>,
    pub status: &'static str,
    pub error: Option<&'a str>,
    pub retry_count: i32,
}

impl<'a> OutcomeInsert<'a> {
    pub fn new(record: &'a OutcomeRecord) -> Self {
        Self {
            chat_id: record.chat_id.into_inner(),
            message_id: record.message_id.into_inner(),
            emoji: &record.emoji,
            recorded_at: record.timestamp,
            status: record.status.as_str(),
            error: record.error.as_deref(),
            retry_count: i32::try_from(record.retry_count).unwrap_or(i32::MAX),
        }
    }
}

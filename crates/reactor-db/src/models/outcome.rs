//! Outcome aggregate row models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Records per emoji (from query)
#[derive(Debug, Clone, FromRow)]
pub struct EmojiCountModel {
    pub emoji: String,
    pub count: i64,
}

/// Records per UTC hour (from query)
#[derive(Debug, Clone, FromRow)]
pub struct HourlyCountModel {
    pub bucket: DateTime<Utc>,
    pub count: i64,
}

/// Records per chat (from query)
#[derive(Debug, Clone, FromRow)]
pub struct ChatCountModel {
    pub chat_id: i64,
    pub count: i64,
}

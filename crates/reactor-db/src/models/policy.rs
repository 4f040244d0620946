//! Chat policy database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chat_policies table
#[derive(Debug, Clone, FromRow)]
pub struct ChatPolicyModel {
    pub chat_id: i64,
    pub chat_title: String,
    pub enabled: bool,
    pub reaction_mode: String,
    pub emojis: Vec<String>,
    pub delay_min: i32,
    pub delay_max: i32,
    pub react_to_text: bool,
    pub react_to_media: bool,
    pub react_to_forwards: bool,
    pub sequential_cursor: i32,
    pub added_at: DateTime<Utc>,
}

/// Chat id with its display title (from query)
#[derive(Debug, Clone, FromRow)]
pub struct ChatTitleModel {
    pub chat_id: i64,
    pub chat_title: String,
}

//! Chat policy entity - per-chat reaction configuration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::value_objects::ChatId;

/// Emoji sent when a policy has no usable emoji list
pub const DEFAULT_EMOJI: &str = "❤️";

/// How the emoji for a reaction is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReactionMode {
    /// Uniform choice from the emoji list
    #[default]
    Random,
    /// Always the first emoji
    Fixed,
    /// Round-robin through the list, cursor persisted per chat
    Sequential,
}

impl ReactionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Fixed => "fixed",
            Self::Sequential => "sequential",
        }
    }

    /// Parse a stored mode; unknown values fall back to random
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "fixed" => Self::Fixed,
            "sequential" => Self::Sequential,
            _ => Self::Random,
        }
    }
}

/// Chat policy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatPolicy {
    pub chat_id: ChatId,
    #[validate(length(max = 255, message = "Chat title must be at most 255 characters"))]
    pub chat_title: String,
    pub enabled: bool,
    pub reaction_mode: ReactionMode,
    #[validate(length(max = 50, message = "At most 50 emojis per chat"))]
    pub emojis: Vec<String>,
    /// Minimum pre-send delay in seconds
    pub delay_min: u32,
    /// Maximum pre-send delay in seconds
    pub delay_max: u32,
    pub react_to_text: bool,
    pub react_to_media: bool,
    pub react_to_forwards: bool,
    /// Rotation cursor, only meaningful in sequential mode
    pub sequential_cursor: i32,
    pub added_at: DateTime<Utc>,
}

impl ChatPolicy {
    /// Create a policy with platform defaults
    pub fn new(chat_id: ChatId, chat_title: impl Into<String>) -> Self {
        Self {
            chat_id,
            chat_title: chat_title.into(),
            enabled: true,
            reaction_mode: ReactionMode::Random,
            emojis: vec!["❤️".to_string(), "🔥".to_string(), "👍".to_string()],
            delay_min: 1,
            delay_max: 5,
            react_to_text: true,
            react_to_media: true,
            react_to_forwards: false,
            sequential_cursor: 0,
            added_at: Utc::now(),
        }
    }

    /// Builder-style setter for the mode and emoji list
    #[must_use]
    pub fn with_emojis(mut self, mode: ReactionMode, emojis: &[&str]) -> Self {
        self.reaction_mode = mode;
        self.emojis = emojis.iter().map(|e| (*e).to_string()).collect();
        self
    }

    /// Builder-style setter for the delay window
    #[must_use]
    pub fn with_delay(mut self, delay_min: u32, delay_max: u32) -> Self {
        self.delay_min = delay_min;
        self.delay_max = delay_max;
        self
    }

    /// Cursor reduced into `[0, len(emojis))`, or 0 for an empty list
    pub fn normalized_cursor(&self) -> usize {
        let len = self.emojis.len();
        if len == 0 {
            return 0;
        }
        let cursor = i64::from(self.sequential_cursor).rem_euclid(len as i64);
        cursor as usize
    }

    /// Delay window as an ordered pair, tolerating a swapped configuration
    pub fn delay_bounds(&self) -> (u32, u32) {
        if self.delay_min <= self.delay_max {
            (self.delay_min, self.delay_max)
        } else {
            (self.delay_max, self.delay_min)
        }
    }

    /// Validate field constraints and cross-field invariants
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        if !self.chat_id.is_valid() {
            return Err(DomainError::ValidationError("chat_id must be non-zero".to_string()));
        }
        if self.delay_min > self.delay_max {
            return Err(DomainError::InvalidDelayWindow {
                min: self.delay_min,
                max: self.delay_max,
            });
        }
        if self.enabled && self.emojis.is_empty() {
            return Err(DomainError::EmptyEmojiList(self.chat_id));
        }
        Ok(())
    }
}

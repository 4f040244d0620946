//! Outcome records - one immutable log entry per dispatch attempt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{ChatId, MessageId};

/// Result class of a single dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    FloodWait,
    Error,
}

impl OutcomeStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::FloodWait => "flood_wait",
            Self::Error => "error",
        }
    }

    /// Parse a stored status string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "flood_wait" => Some(Self::FloodWait),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Flood waits and errors both count as failed attempts
    #[inline]
    #[must_use]
    pub const fn is_failure(self) -> bool {
        !matches!(self, Self::Success)
    }

    /// Statuses counted as failures in error-rate metrics
    pub const FAILURES: [Self; 2] = [Self::Error, Self::FloodWait];
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-flight reaction send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchAttempt {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub emoji: String,
    pub attempt_number: u32,
}

impl DispatchAttempt {
    /// First attempt for a message
    pub fn first(chat_id: ChatId, message_id: MessageId, emoji: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id,
            emoji: emoji.into(),
            attempt_number: 0,
        }
    }

    /// The attempt that follows this one
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            attempt_number: self.attempt_number + 1,
            ..self.clone()
        }
    }

    /// Build the outcome record concluding this attempt
    pub fn conclude(
        &self,
        status: OutcomeStatus,
        error: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> OutcomeRecord {
        OutcomeRecord {
            chat_id: self.chat_id,
            message_id: self.message_id,
            emoji: self.emoji.clone(),
            timestamp,
            status,
            error,
            retry_count: self.attempt_number,
        }
    }
}

/// Durable outcome record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub emoji: String,
    pub timestamp: DateTime<Utc>,
    pub status: OutcomeStatus,
    pub error: Option<String>,
    pub retry_count: u32,
}

impl OutcomeRecord {
    /// Check if the attempt delivered the reaction
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

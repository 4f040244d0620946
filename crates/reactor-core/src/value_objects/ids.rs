//! Platform identifiers
//!
//! Chat and message IDs are assigned by the messaging platform. Chat IDs are
//! signed 64-bit (groups and channels are negative), message IDs are unique
//! only within their chat.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform chat identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(i64);

impl ChatId {
    /// Create a new ChatId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// A chat id of zero is never issued by the platform
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| IdParseError::InvalidFormat)
    }
}

/// Platform message identifier (scoped to a chat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

/// Error when parsing an identifier from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid identifier format")]
    InvalidFormat,
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ChatId> for i64 {
    fn from(id: ChatId) -> Self {
        id.0
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<MessageId> for i64 {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ChatId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChatId::parse(s)
    }
}

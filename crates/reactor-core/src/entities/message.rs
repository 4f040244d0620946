//! Inbound message - a classified chat message received from the platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ChatId, MessageId};

/// Inbound message event
///
/// Only the attributes the policy filter needs are kept; message content is
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub has_text: bool,
    pub has_media: bool,
    pub is_forward: bool,
    pub timestamp: DateTime<Utc>,
}

impl InboundMessage {
    /// Create a plain text message
    pub fn text(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
            has_text: true,
            has_media: false,
            is_forward: false,
            timestamp: Utc::now(),
        }
    }

    /// Create a media message without caption text
    pub fn media(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            has_text: false,
            has_media: true,
            ..Self::text(chat_id, message_id)
        }
    }

    /// Mark this message as forwarded
    #[must_use]
    pub fn forwarded(mut self) -> Self {
        self.is_forward = true;
        self
    }
}

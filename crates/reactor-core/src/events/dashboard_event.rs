//! Dashboard events
//!
//! Emitted by the pipeline and administration collaborators, relayed
//! out of band from the periodic stats push.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::OutcomeStatus;
use crate::value_objects::{ChatId, MessageId};

/// All discrete dashboard events
///
/// Serializes as `{"type": ..., "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DashboardEvent {
    Reaction {
        chat_id: ChatId,
        message_id: MessageId,
        emoji: String,
        status: OutcomeStatus,
    },
    ChatAdded {
        chat_id: ChatId,
        chat_title: String,
    },
    ChatUpdated {
        chat_id: ChatId,
        changes: Value,
    },
    Error {
        error_type: String,
        message: String,
        details: Value,
    },
}

impl DashboardEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Reaction { .. } => "reaction",
            Self::ChatAdded { .. } => "chat_added",
            Self::ChatUpdated { .. } => "chat_updated",
            Self::Error { .. } => "error",
        }
    }

    /// Get the chat this event concerns, if any
    pub fn chat_id(&self) -> Option<ChatId> {
        match self {
            Self::Reaction { chat_id, .. }
            | Self::ChatAdded { chat_id, .. }
            | Self::ChatUpdated { chat_id, .. } => Some(*chat_id),
            Self::Error { .. } => None,
        }
    }

    /// Split into the envelope type name and its `data` payload
    pub fn into_parts(self) -> (&'static str, Value) {
        let event_type = self.event_type();
        let data = match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove("data").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        (event_type, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reaction_payload() {
        let event = DashboardEvent::Reaction {
            chat_id: ChatId::new(-42),
            message_id: MessageId::new(7),
            emoji: "🔥".to_string(),
            status: OutcomeStatus::Success,
        };
        assert_eq!(event.chat_id(), Some(ChatId::new(-42)));

        let (event_type, data) = event.into_parts();
        assert_eq!(event_type, "reaction");
        assert_eq!(
            data,
            json!({"chat_id": -42, "message_id": 7, "emoji": "🔥", "status": "success"})
        );
    }

    #[test]
    fn test_error_payload() {
        let event = DashboardEvent::Error {
            error_type: "outcome_persistence".to_string(),
            message: "disk full".to_string(),
            details: json!({}),
        };
        assert_eq!(event.chat_id(), None);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["data"]["error_type"], "outcome_persistence");
        assert_eq!(value["data"]["details"], json!({}));
    }
}

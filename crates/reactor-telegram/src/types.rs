//! Bot API wire types
//!
//! Only the fields this service reads are modelled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use reactor_core::{ChatId, DashboardEvent, InboundMessage, MessageId};

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub channel_post: Option<Message>,
    pub my_chat_member: Option<ChatMemberUpdated>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
}

impl Chat {
    /// Groups, supergroups and channels; private chats are ignored
    pub fn is_multi_user(&self) -> bool {
        matches!(self.kind.as_str(), "group" | "supergroup" | "channel")
    }

    fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Chat {}", self.id))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    /// Unix seconds
    pub date: i64,
    pub text: Option<String>,
    pub photo: Option<Value>,
    pub video: Option<Value>,
    pub document: Option<Value>,
    pub forward_origin: Option<Value>,
    pub forward_date: Option<i64>,
    pub new_chat_title: Option<String>,
}

impl Message {
    pub fn has_media(&self) -> bool {
        self.photo.is_some() || self.video.is_some() || self.document.is_some()
    }

    pub fn is_forward(&self) -> bool {
        self.forward_origin.is_some() || self.forward_date.is_some()
    }

    /// Reactable content, as opposed to a service message
    fn has_content(&self) -> bool {
        self.text.is_some() || self.has_media()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMember {
    pub status: String,
}

impl ChatMember {
    fn is_present(&self) -> bool {
        matches!(
            self.status.as_str(),
            "member" | "administrator" | "creator" | "restricted"
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMemberUpdated {
    pub chat: Chat,
    pub old_chat_member: ChatMember,
    pub new_chat_member: ChatMember,
}

/// What an update means for the service
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    Message(InboundMessage),
    Event(DashboardEvent),
    Ignored,
}

impl Update {
    pub fn route(&self) -> Routed {
        if let Some(member) = &self.my_chat_member {
            if member.chat.is_multi_user()
                && member.new_chat_member.is_present()
                && !member.old_chat_member.is_present()
            {
                return Routed::Event(DashboardEvent::ChatAdded {
                    chat_id: ChatId::new(member.chat.id),
                    chat_title: member.chat.display_title(),
                });
            }
            return Routed::Ignored;
        }

        let Some(message) = self.message.as_ref().or(self.channel_post.as_ref()) else {
            return Routed::Ignored;
        };
        if !message.chat.is_multi_user() {
            return Routed::Ignored;
        }
        if let Some(title) = &message.new_chat_title {
            return Routed::Event(DashboardEvent::ChatUpdated {
                chat_id: ChatId::new(message.chat.id),
                changes: json!({ "chat_title": title }),
            });
        }
        if !message.has_content() {
            return Routed::Ignored;
        }

        Routed::Message(InboundMessage {
            chat_id: ChatId::new(message.chat.id),
            message_id: MessageId::new(message.message_id),
            has_text: message.text.is_some(),
            has_media: message.has_media(),
            is_forward: message.is_forward(),
            timestamp: DateTime::<Utc>::from_timestamp(message.date, 0).unwrap_or_else(Utc::now),
        })
    }
}

/// `getUpdates` parameters
#[derive(Debug, Serialize)]
pub struct GetUpdates<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

/// `setMessageReaction` parameters
#[derive(Debug, Serialize)]
pub struct SetMessageReaction<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub reaction: [ReactionType<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct ReactionType<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub emoji: &'a str,
}

impl<'a> SetMessageReaction<'a> {
    pub fn emoji(chat_id: ChatId, message_id: MessageId, emoji: &'a str) -> Self {
        Self {
            chat_id: chat_id.into_inner(),
            message_id: message_id.into_inner(),
            reaction: [ReactionType {
                kind: "emoji",
                emoji,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(value: Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_group_text_message() {
        let routed = update(json!({
            "update_id": 10,
            "message": {
                "message_id": 5,
                "date": 1_714_557_600,
                "chat": {"id": -1001, "type": "supergroup", "title": "Main"},
                "text": "hello"
            }
        }))
        .route();

        let Routed::Message(msg) = routed else {
            panic!("expected message, got {routed:?}");
        };
        assert_eq!(msg.chat_id, ChatId::new(-1001));
        assert_eq!(msg.message_id, MessageId::new(5));
        assert!(msg.has_text && !msg.has_media && !msg.is_forward);
        assert_eq!(msg.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_forwarded_channel_photo() {
        let routed = update(json!({
            "update_id": 11,
            "channel_post": {
                "message_id": 6,
                "date": 1_714_557_600,
                "chat": {"id": -1002, "type": "channel", "title": "News"},
                "photo": [{"file_id": "x"}],
                "forward_origin": {"type": "channel"}
            }
        }))
        .route();

        let Routed::Message(msg) = routed else {
            panic!("expected message, got {routed:?}");
        };
        assert!(!msg.has_text && msg.has_media && msg.is_forward);
    }

    #[test]
    fn test_private_chat_and_service_messages_ignored() {
        let private = update(json!({
            "update_id": 12,
            "message": {
                "message_id": 1, "date": 0,
                "chat": {"id": 42, "type": "private"},
                "text": "/start"
            }
        }));
        assert_eq!(private.route(), Routed::Ignored);

        let pinned = update(json!({
            "update_id": 13,
            "message": {
                "message_id": 2, "date": 0,
                "chat": {"id": -1, "type": "group", "title": "G"},
                "pinned_message": {}
            }
        }));
        assert_eq!(pinned.route(), Routed::Ignored);
    }

    #[test]
    fn test_membership_and_title_events() {
        let added = update(json!({
            "update_id": 14,
            "my_chat_member": {
                "chat": {"id": -1003, "type": "supergroup", "title": "Fresh"},
                "old_chat_member": {"status": "left"},
                "new_chat_member": {"status": "administrator"}
            }
        }));
        assert_eq!(
            added.route(),
            Routed::Event(DashboardEvent::ChatAdded {
                chat_id: ChatId::new(-1003),
                chat_title: "Fresh".to_string(),
            })
        );

        let renamed = update(json!({
            "update_id": 15,
            "message": {
                "message_id": 3, "date": 0,
                "chat": {"id": -1003, "type": "supergroup", "title": "Renamed"},
                "new_chat_title": "Renamed"
            }
        }));
        assert!(matches!(
            renamed.route(),
            Routed::Event(DashboardEvent::ChatUpdated { changes, .. }) if changes["chat_title"] == "Renamed"
        ));
    }

    #[test]
    fn test_reaction_body() {
        let body = SetMessageReaction::emoji(ChatId::new(-5), MessageId::new(9), "🔥");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"chat_id": -5, "message_id": 9, "reaction": [{"type": "emoji", "emoji": "🔥"}]})
        );
    }
}

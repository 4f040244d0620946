//! Chat policy entity <-> model mapper

use reactor_core::entities::{ChatPolicy, ReactionMode};
use reactor_core::value_objects::ChatId;

use crate::models::ChatPolicyModel;

/// Convert ChatPolicyModel to ChatPolicy entity
impl From<ChatPolicyModel> for ChatPolicy {
    fn from(model: ChatPolicyModel) -> Self {
        ChatPolicy {
            chat_id: ChatId::new(model.chat_id),
            chat_title: model.chat_title,
            enabled: model.enabled,
            reaction_mode: ReactionMode::from_str_lossy(&model.reaction_mode),
            emojis: model.emojis,
            delay_min: model.delay_min.max(0) as u32,
            delay_max: model.delay_max.max(0) as u32,
            react_to_text: model.react_to_text,
            react_to_media: model.react_to_media,
            react_to_forwards: model.react_to_forwards,
            sequential_cursor: model.sequential_cursor,
            added_at: model.added_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_model_to_entity() {
        let model = ChatPolicyModel {
            chat_id: -1001,
            chat_title: "News".to_string(),
            enabled: true,
            reaction_mode: "sequential".to_string(),
            emojis: vec!["👍".to_string(), "🔥".to_string()],
            delay_min: -3,
            delay_max: 4,
            react_to_text: true,
            react_to_media: false,
            react_to_forwards: true,
            sequential_cursor: 5,
            added_at: Utc::now(),
        };

        let policy = ChatPolicy::from(model);
        assert_eq!(policy.chat_id, ChatId::new(-1001));
        assert_eq!(policy.reaction_mode, ReactionMode::Sequential);
        assert_eq!((policy.delay_min, policy.delay_max), (0, 4));
        assert_eq!(policy.normalized_cursor(), 1);
    }
}

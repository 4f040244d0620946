//! Test fixtures
//!
//! Scripted platform client and ready-made chat policies.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use reactor_core::{ChatId, ChatPolicy, MessageId, PlatformError, ReactionClient, ReactionMode};

/// Chat used by most tests
pub const TEST_CHAT: ChatId = ChatId::new(-100_200_300);

/// Enabled policy reacting with a fixed emoji and no pre-send delay
pub fn fixed_policy(chat_id: ChatId, emoji: &str) -> ChatPolicy {
    ChatPolicy::new(chat_id, "Test Chat")
        .with_emojis(ReactionMode::Fixed, &[emoji])
        .with_delay(0, 0)
}

/// Platform client answering from a queue of canned results
///
/// Succeeds once the queue is empty.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<(), PlatformError>>>,
    sent: Mutex<Vec<(ChatId, MessageId, String)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next call
    pub fn push_reply(&self, reply: Result<(), PlatformError>) {
        self.replies.lock().push_back(reply);
    }

    /// Every call received, in order
    pub fn sent(&self) -> Vec<(ChatId, MessageId, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ReactionClient for ScriptedClient {
    async fn send_reaction(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), PlatformError> {
        self.sent.lock().push((chat_id, message_id, emoji.to_string()));
        self.replies.lock().pop_front().unwrap_or(Ok(()))
    }
}

//! Emoji selector
//!
//! Picks the emoji for a qualifying message according to the chat's
//! reaction mode. Sequential rotation keeps one cursor per chat behind an
//! async lock so concurrent messages in the same chat never share a slot.

use std::sync::Arc;

use dashmap::DashMap;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use tracing::{instrument, warn};

use reactor_core::{ChatId, ChatPolicy, PolicyRepository, ReactionMode, DEFAULT_EMOJI};

type Cursor = Arc<Mutex<Option<usize>>>;

/// Emoji selection service
pub struct EmojiSelector {
    policies: Arc<dyn PolicyRepository>,
    cursors: DashMap<ChatId, Cursor>,
}

impl EmojiSelector {
    pub fn new(policies: Arc<dyn PolicyRepository>) -> Self {
        Self {
            policies,
            cursors: DashMap::new(),
        }
    }

    /// Select an emoji for one reaction
    ///
    /// An empty emoji list yields [`DEFAULT_EMOJI`] in every mode.
    #[instrument(skip(self, policy), fields(chat_id = %policy.chat_id, mode = policy.reaction_mode.as_str()))]
    pub async fn select(&self, policy: &ChatPolicy) -> String {
        if policy.emojis.is_empty() {
            return DEFAULT_EMOJI.to_string();
        }
        match policy.reaction_mode {
            ReactionMode::Fixed => policy.emojis[0].clone(),
            ReactionMode::Random => random_choice(&policy.emojis),
            ReactionMode::Sequential => self.next_in_rotation(policy).await,
        }
    }

    /// Drop the cached cursor of a chat; the next pick reseeds from storage
    pub fn reset(&self, chat_id: ChatId) {
        self.cursors.remove(&chat_id);
    }

    async fn next_in_rotation(&self, policy: &ChatPolicy) -> String {
        let cursor = self
            .cursors
            .entry(policy.chat_id)
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();

        let mut slot = cursor.lock().await;
        let len = policy.emojis.len();
        let current = slot.unwrap_or_else(|| policy.normalized_cursor()) % len;
        let next = (current + 1) % len;

        if let Err(e) = self
            .policies
            .update_cursor(policy.chat_id, next as i32)
            .await
        {
            warn!(chat_id = %policy.chat_id, error = %e, "Failed to persist rotation cursor");
        }
        *slot = Some(next);

        policy.emojis[current].clone()
    }
}

fn random_choice(emojis: &[String]) -> String {
    emojis
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| DEFAULT_EMOJI.to_string())
}

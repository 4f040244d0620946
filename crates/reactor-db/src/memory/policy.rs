//! In-memory PolicyRepository

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use reactor_core::entities::ChatPolicy;
use reactor_core::traits::{PolicyRepository, RepoResult};
use reactor_core::value_objects::ChatId;

/// Policy store backed by a map
#[derive(Debug, Default)]
pub struct MemoryPolicyRepository {
    policies: RwLock<HashMap<ChatId, ChatPolicy>>,
}

impl MemoryPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a policy
    pub fn insert(&self, policy: ChatPolicy) {
        self.policies.write().insert(policy.chat_id, policy);
    }

    /// Remove a policy
    pub fn remove(&self, chat_id: ChatId) -> Option<ChatPolicy> {
        self.policies.write().remove(&chat_id)
    }

    /// Current stored copy of a policy
    pub fn get(&self, chat_id: ChatId) -> Option<ChatPolicy> {
        self.policies.read().get(&chat_id).cloned()
    }
}

#[async_trait]
impl PolicyRepository for MemoryPolicyRepository {
    async fn find_by_chat(&self, chat_id: ChatId) -> RepoResult<Option<ChatPolicy>> {
        Ok(self.get(chat_id))
    }

    async fn find_titles(&self, chat_ids: &[ChatId]) -> RepoResult<HashMap<ChatId, String>> {
        let policies = self.policies.read();
        Ok(chat_ids
            .iter()
            .filter_map(|id| policies.get(id).map(|p| (*id, p.chat_title.clone())))
            .collect())
    }

    async fn count_enabled(&self) -> RepoResult<u64> {
        Ok(self.policies.read().values().filter(|p| p.enabled).count() as u64)
    }

    async fn update_cursor(&self, chat_id: ChatId, cursor: i32) -> RepoResult<()> {
        if let Some(policy) = self.policies.write().get_mut(&chat_id) {
            policy.sequential_cursor = cursor;
        }
        Ok(())
    }
}

//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{BotSettings, ChatPolicy, OutcomeRecord, OutcomeStatus};
use crate::error::DomainError;
use crate::value_objects::ChatId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Policy Repository
// ============================================================================

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Find the policy of a chat
    async fn find_by_chat(&self, chat_id: ChatId) -> RepoResult<Option<ChatPolicy>>;

    /// Display titles of the given chats; chats without a policy are absent
    async fn find_titles(&self, chat_ids: &[ChatId]) -> RepoResult<HashMap<ChatId, String>>;

    /// Count enabled chats
    async fn count_enabled(&self) -> RepoResult<u64>;

    /// Persist the sequential rotation cursor of a chat
    async fn update_cursor(&self, chat_id: ChatId, cursor: i32) -> RepoResult<()>;
}

// ============================================================================
// Outcome Repository
// ============================================================================

/// Selection of outcome records for aggregate queries
///
/// Empty `statuses` matches every status. `since` is inclusive, `until`
/// exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeFilter {
    pub statuses: Vec<OutcomeStatus>,
    pub chat_id: Option<ChatId>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl OutcomeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only successful attempts
    pub fn successes() -> Self {
        Self::new().status(OutcomeStatus::Success)
    }

    /// Only failed attempts, flood waits included
    pub fn failures() -> Self {
        Self {
            statuses: OutcomeStatus::FAILURES.to_vec(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn status(mut self, status: OutcomeStatus) -> Self {
        self.statuses.push(status);
        self
    }

    #[must_use]
    pub fn chat(mut self, chat_id: ChatId) -> Self {
        self.chat_id = Some(chat_id);
        self
    }

    #[must_use]
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    #[must_use]
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Check whether a record falls inside this selection
    pub fn matches(&self, record: &OutcomeRecord) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&record.status))
            && self.chat_id.map_or(true, |id| id == record.chat_id)
            && self.since.map_or(true, |since| record.timestamp >= since)
            && self.until.map_or(true, |until| record.timestamp < until)
    }
}

#[async_trait]
pub trait OutcomeRepository: Send + Sync {
    /// Append one record to the log
    async fn append(&self, record: &OutcomeRecord) -> RepoResult<()>;

    /// Count matching records
    async fn count(&self, filter: &OutcomeFilter) -> RepoResult<u64>;

    /// Emoji counts of matching records, descending by count, at most `limit`
    async fn emoji_histogram(
        &self,
        filter: &OutcomeFilter,
        limit: usize,
    ) -> RepoResult<Vec<(String, u64)>>;

    /// Matching record counts per UTC calendar hour, ascending by hour start
    async fn hourly_counts(&self, filter: &OutcomeFilter)
        -> RepoResult<Vec<(DateTime<Utc>, u64)>>;

    /// Number of distinct chats among matching records
    async fn distinct_chats(&self, filter: &OutcomeFilter) -> RepoResult<u64>;

    /// Chats ranked by matching record count, descending, at most `limit`
    async fn top_chats(&self, filter: &OutcomeFilter, limit: usize)
        -> RepoResult<Vec<(ChatId, u64)>>;
}

// ============================================================================
// Settings Repository
// ============================================================================

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load the global bot settings, if any were stored
    async fn bot_settings(&self) -> RepoResult<Option<BotSettings>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DispatchAttempt;
    use crate::value_objects::MessageId;
    use chrono::Duration;

    fn record(status: OutcomeStatus, at: DateTime<Utc>) -> OutcomeRecord {
        DispatchAttempt::first(ChatId::new(-7), MessageId::new(1), "👍").conclude(status, None, at)
    }

    #[test]
    fn test_filter_window_bounds() {
        let now = Utc::now();
        let filter = OutcomeFilter::new()
            .since(now - Duration::hours(1))
            .until(now);

        assert!(filter.matches(&record(OutcomeStatus::Success, now - Duration::minutes(30))));
        assert!(filter.matches(&record(OutcomeStatus::Error, now - Duration::hours(1))));
        assert!(!filter.matches(&record(OutcomeStatus::Success, now)));
        assert!(!filter.matches(&record(OutcomeStatus::Success, now - Duration::hours(2))));
    }

    #[test]
    fn test_filter_status_and_chat() {
        let now = Utc::now();
        assert!(OutcomeFilter::failures().matches(&record(OutcomeStatus::FloodWait, now)));
        assert!(!OutcomeFilter::failures().matches(&record(OutcomeStatus::Success, now)));
        assert!(!OutcomeFilter::successes()
            .chat(ChatId::new(-8))
            .matches(&record(OutcomeStatus::Success, now)));
    }
}

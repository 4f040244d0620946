//! In-memory OutcomeRepository

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use parking_lot::RwLock;

use reactor_core::entities::OutcomeRecord;
use reactor_core::traits::{OutcomeFilter, OutcomeRepository, RepoResult};
use reactor_core::value_objects::ChatId;

/// Append-only outcome log held in a vector
#[derive(Debug, Default)]
pub struct MemoryOutcomeRepository {
    records: RwLock<Vec<OutcomeRecord>>,
}

/// Start of the UTC hour containing `ts`
fn hour_start(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

impl MemoryOutcomeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record in append order
    pub fn records(&self) -> Vec<OutcomeRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn group_by<K, F>(&self, filter: &OutcomeFilter, key: F) -> HashMap<K, u64>
    where
        K: std::hash::Hash + Eq,
        F: Fn(&OutcomeRecord) -> K,
    {
        let mut counts = HashMap::new();
        for record in self.records.read().iter().filter(|r| filter.matches(r)) {
            *counts.entry(key(record)).or_insert(0) += 1;
        }
        counts
    }
}

#[async_trait]
impl OutcomeRepository for MemoryOutcomeRepository {
    async fn append(&self, record: &OutcomeRecord) -> RepoResult<()> {
        self.records.write().push(record.clone());
        Ok(())
    }

    async fn count(&self, filter: &OutcomeFilter) -> RepoResult<u64> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| filter.matches(r))
            .count() as u64)
    }

    async fn emoji_histogram(
        &self,
        filter: &OutcomeFilter,
        limit: usize,
    ) -> RepoResult<Vec<(String, u64)>> {
        let mut counts: Vec<_> = self
            .group_by(filter, |r| r.emoji.clone())
            .into_iter()
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(limit);
        Ok(counts)
    }

    async fn hourly_counts(
        &self,
        filter: &OutcomeFilter,
    ) -> RepoResult<Vec<(DateTime<Utc>, u64)>> {
        let mut buckets = BTreeMap::new();
        for record in self.records.read().iter().filter(|r| filter.matches(r)) {
            *buckets.entry(hour_start(record.timestamp)).or_insert(0) += 1;
        }
        Ok(buckets.into_iter().collect())
    }

    async fn distinct_chats(&self, filter: &OutcomeFilter) -> RepoResult<u64> {
        let chats: HashSet<ChatId> = self
            .records
            .read()
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.chat_id)
            .collect();
        Ok(chats.len() as u64)
    }

    async fn top_chats(
        &self,
        filter: &OutcomeFilter,
        limit: usize,
    ) -> RepoResult<Vec<(ChatId, u64)>> {
        let mut counts: Vec<_> = self.group_by(filter, |r| r.chat_id).into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(limit);
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use reactor_core::entities::{DispatchAttempt, OutcomeStatus};
    use reactor_core::value_objects::MessageId;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
    }

    async fn seed(repo: &MemoryOutcomeRepository) {
        let rows = [
            (-1, "🔥", OutcomeStatus::Success, at(10, 5)),
            (-1, "🔥", OutcomeStatus::Success, at(10, 40)),
            (-1, "👍", OutcomeStatus::Success, at(11, 1)),
            (-2, "🔥", OutcomeStatus::Success, at(12, 0)),
            (-2, "🔥", OutcomeStatus::FloodWait, at(12, 1)),
            (-3, "❤️", OutcomeStatus::Error, at(12, 2)),
        ];
        for (i, (chat, emoji, status, ts)) in rows.into_iter().enumerate() {
            let record = DispatchAttempt::first(ChatId::new(chat), MessageId::new(i as i64), emoji)
                .conclude(status, None, ts);
            repo.append(&record).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_counts_and_histogram() {
        let repo = MemoryOutcomeRepository::new();
        seed(&repo).await;

        assert_eq!(repo.count(&OutcomeFilter::new()).await.unwrap(), 6);
        assert_eq!(repo.count(&OutcomeFilter::failures()).await.unwrap(), 2);
        assert_eq!(
            repo.count(&OutcomeFilter::successes().since(at(11, 0))).await.unwrap(),
            2
        );

        let histogram = repo
            .emoji_histogram(&OutcomeFilter::successes(), 20)
            .await
            .unwrap();
        assert_eq!(histogram, vec![("🔥".to_string(), 3), ("👍".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_hourly_buckets_ascend() {
        let repo = MemoryOutcomeRepository::new();
        seed(&repo).await;

        let hourly = repo.hourly_counts(&OutcomeFilter::successes()).await.unwrap();
        assert_eq!(hourly, vec![(at(10, 0), 2), (at(11, 0), 1), (at(12, 0), 1)]);
    }

    #[tokio::test]
    async fn test_chat_rankings() {
        let repo = MemoryOutcomeRepository::new();
        seed(&repo).await;

        let all = OutcomeFilter::new();
        assert_eq!(repo.distinct_chats(&all).await.unwrap(), 3);

        let top = repo.top_chats(&OutcomeFilter::successes(), 1).await.unwrap();
        assert_eq!(top, vec![(ChatId::new(-1), 3)]);

        let later = all.since(at(12, 0) + Duration::seconds(30));
        assert_eq!(repo.distinct_chats(&later).await.unwrap(), 2);
    }
}

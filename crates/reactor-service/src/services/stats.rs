//! Stats aggregator
//!
//! Read-only queries over the outcome log. Every query degrades to a zero
//! or empty result when storage fails; callers never see an error.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use tracing::{instrument, warn};

use reactor_core::{
    percentage, round2, AggregateSnapshot, ChatId, ChatStats, DailySummary, EmojiUsage,
    HourlyStat, OutcomeFilter, OutcomeRepository, OutcomeStatus, PolicyRepository, RepoResult,
    TopChat,
};

use super::counters::RuntimeCounters;

/// Emoji entries in the dashboard snapshot
pub const SNAPSHOT_EMOJI_LIMIT: usize = 20;
/// Emoji entries in per-chat stats
pub const CHAT_EMOJI_LIMIT: usize = 10;
/// Trailing window of the snapshot metrics, in hours
pub const SNAPSHOT_WINDOW_HOURS: i64 = 24;
/// Trailing window of the reaction rate, in hours
pub const RATE_WINDOW_HOURS: i64 = 1;
/// Title of a ranked chat with no stored policy
pub const UNKNOWN_CHAT_TITLE: &str = "Unknown";

/// Source of dashboard snapshots
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn snapshot(&self) -> AggregateSnapshot;
}

/// Aggregation queries over the outcome log
pub struct StatsAggregator {
    policies: Arc<dyn PolicyRepository>,
    outcomes: Arc<dyn OutcomeRepository>,
    counters: Arc<RuntimeCounters>,
}

fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

fn degrade<T>(query: &'static str, result: RepoResult<T>, fallback: T) -> T {
    result.unwrap_or_else(|e| {
        warn!(query, error = %e, "Stats query failed, returning empty result");
        fallback
    })
}

impl StatsAggregator {
    pub fn new(
        policies: Arc<dyn PolicyRepository>,
        outcomes: Arc<dyn OutcomeRepository>,
        counters: Arc<RuntimeCounters>,
    ) -> Self {
        Self {
            policies,
            outcomes,
            counters,
        }
    }

    /// All-time successful reactions
    pub async fn total_reactions(&self) -> u64 {
        degrade(
            "total_reactions",
            self.outcomes.count(&OutcomeFilter::successes()).await,
            0,
        )
    }

    /// Successful reactions per second over the trailing `hours`
    pub async fn reactions_per_second(&self, hours: i64) -> f64 {
        if hours <= 0 {
            return 0.0;
        }
        let filter = OutcomeFilter::successes().since(hours_ago(hours));
        let count = degrade("reactions_per_second", self.outcomes.count(&filter).await, 0);
        round2(count as f64 / (hours * 3600) as f64)
    }

    /// Number of enabled chats
    pub async fn active_chats(&self) -> u64 {
        degrade("active_chats", self.policies.count_enabled().await, 0)
    }

    /// Flood-wait outcomes over the trailing `hours`
    pub async fn flood_waits(&self, hours: i64) -> u64 {
        let filter = OutcomeFilter::new()
            .status(OutcomeStatus::FloodWait)
            .since(hours_ago(hours));
        degrade("flood_waits", self.outcomes.count(&filter).await, 0)
    }

    /// Failed attempts as a percentage of all attempts over the trailing `hours`
    pub async fn error_rate(&self, hours: i64) -> f64 {
        let window = OutcomeFilter::new().since(hours_ago(hours));
        degrade("error_rate", self.error_rate_in(window).await, 0.0)
    }

    /// Emoji histogram of successful reactions over the trailing `hours`
    pub async fn emoji_usage(&self, hours: i64, limit: usize) -> EmojiUsage {
        let filter = OutcomeFilter::successes().since(hours_ago(hours));
        let counts = degrade(
            "emoji_usage",
            self.outcomes.emoji_histogram(&filter, limit).await,
            Vec::new(),
        );
        EmojiUsage::from_counts(counts).top(limit)
    }

    /// Successful reactions per calendar hour over the trailing `hours`
    pub async fn hourly_stats(&self, hours: i64) -> Vec<HourlyStat> {
        let filter = OutcomeFilter::successes().since(hours_ago(hours));
        degrade(
            "hourly_stats",
            self.outcomes.hourly_counts(&filter).await,
            Vec::new(),
        )
        .into_iter()
        .map(|(timestamp, count)| HourlyStat {
            timestamp,
            hour: timestamp.hour(),
            count,
        })
        .collect()
    }

    /// Statistics of one chat over the trailing `days`
    #[instrument(skip(self))]
    pub async fn chat_stats(&self, chat_id: ChatId, days: i64) -> ChatStats {
        degrade(
            "chat_stats",
            self.try_chat_stats(chat_id, days).await,
            ChatStats::empty(chat_id),
        )
    }

    /// Summary of one UTC calendar day
    #[instrument(skip(self))]
    pub async fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        degrade(
            "daily_summary",
            self.try_daily_summary(date).await,
            DailySummary::empty(date),
        )
    }

    /// Chats ranked by successful reactions over the trailing `days`
    #[instrument(skip(self))]
    pub async fn top_chats(&self, limit: usize, days: i64) -> Vec<TopChat> {
        degrade(
            "top_chats",
            self.try_top_chats(limit, days).await,
            Vec::new(),
        )
    }

    async fn error_rate_in(&self, window: OutcomeFilter) -> RepoResult<f64> {
        let total = self.outcomes.count(&window).await?;
        let failures = OutcomeFilter {
            statuses: OutcomeFilter::failures().statuses,
            ..window
        };
        let failed = self.outcomes.count(&failures).await?;
        Ok(percentage(failed, total))
    }

    async fn try_chat_stats(&self, chat_id: ChatId, days: i64) -> RepoResult<ChatStats> {
        let since = Utc::now() - Duration::days(days);
        let successes = OutcomeFilter::successes().chat(chat_id).since(since);
        let failures = OutcomeFilter::failures().chat(chat_id).since(since);

        let total_reactions = self.outcomes.count(&successes).await?;
        let errors = self.outcomes.count(&failures).await?;
        let histogram = self
            .outcomes
            .emoji_histogram(&successes, CHAT_EMOJI_LIMIT)
            .await?;

        Ok(ChatStats {
            chat_id,
            total_reactions,
            errors,
            error_rate: percentage(errors, total_reactions + errors),
            emoji_usage: EmojiUsage::from_counts(histogram).top(CHAT_EMOJI_LIMIT),
        })
    }

    async fn try_daily_summary(&self, date: NaiveDate) -> RepoResult<DailySummary> {
        let Some(start) = date.and_hms_opt(0, 0, 0).map(|t| t.and_utc()) else {
            return Ok(DailySummary::empty(date));
        };
        let day = OutcomeFilter::new().since(start).until(start + Duration::days(1));

        let total_attempts = self.outcomes.count(&day).await?;
        let total_reactions = self
            .outcomes
            .count(&OutcomeFilter {
                statuses: OutcomeFilter::successes().statuses,
                ..day.clone()
            })
            .await?;
        let active_chats = self.outcomes.distinct_chats(&day).await?;
        let errors = total_attempts - total_reactions.min(total_attempts);

        Ok(DailySummary {
            date,
            total_reactions,
            total_attempts,
            errors,
            success_rate: percentage(total_reactions, total_attempts),
            active_chats,
        })
    }

    async fn try_top_chats(&self, limit: usize, days: i64) -> RepoResult<Vec<TopChat>> {
        let filter = OutcomeFilter::successes().since(Utc::now() - Duration::days(days));
        let ranked = self.outcomes.top_chats(&filter, limit).await?;
        let ids: Vec<ChatId> = ranked.iter().map(|(id, _)| *id).collect();
        let mut titles = self.policies.find_titles(&ids).await?;

        Ok(ranked
            .into_iter()
            .map(|(chat_id, reactions)| TopChat {
                chat_id,
                chat_title: titles
                    .remove(&chat_id)
                    .unwrap_or_else(|| UNKNOWN_CHAT_TITLE.to_string()),
                reactions,
            })
            .collect())
    }
}

#[async_trait]
impl SnapshotProvider for StatsAggregator {
    /// Dashboard snapshot; queries run concurrently
    async fn snapshot(&self) -> AggregateSnapshot {
        let (
            total_reactions,
            reactions_per_second,
            active_chats,
            flood_waits,
            error_rate,
            emoji_usage,
            hourly_stats,
        ) = tokio::join!(
            self.total_reactions(),
            self.reactions_per_second(RATE_WINDOW_HOURS),
            self.active_chats(),
            self.flood_waits(SNAPSHOT_WINDOW_HOURS),
            self.error_rate(SNAPSHOT_WINDOW_HOURS),
            self.emoji_usage(SNAPSHOT_WINDOW_HOURS, SNAPSHOT_EMOJI_LIMIT),
            self.hourly_stats(SNAPSHOT_WINDOW_HOURS),
        );

        AggregateSnapshot {
            total_reactions,
            reactions_per_second,
            active_chats,
            bot_uptime: self.counters.uptime_secs(),
            flood_waits,
            error_rate,
            emoji_usage,
            hourly_stats,
        }
    }
}

//! Derived statistics - shapes computed from the outcome log, never stored

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::value_objects::ChatId;

/// Percentage `part / total * 100` rounded to two decimals, 0 when `total` is 0
#[must_use]
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Emoji histogram, ordered by count descending
///
/// Serialized as a JSON object whose key order follows the histogram order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "std::collections::BTreeMap<String, u64>")]
pub struct EmojiUsage(Vec<(String, u64)>);

impl EmojiUsage {
    /// Build from `(emoji, count)` pairs; sorts by count descending, then emoji
    pub fn from_counts(mut counts: Vec<(String, u64)>) -> Self {
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self(counts)
    }

    /// Keep only the first `n` entries
    #[must_use]
    pub fn top(mut self, n: usize) -> Self {
        self.0.truncate(n);
        self
    }

    pub fn get(&self, emoji: &str) -> Option<u64> {
        self.0.iter().find(|(e, _)| e == emoji).map(|(_, c)| *c)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<std::collections::BTreeMap<String, u64>> for EmojiUsage {
    fn from(map: std::collections::BTreeMap<String, u64>) -> Self {
        Self::from_counts(map.into_iter().collect())
    }
}

impl Serialize for EmojiUsage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (emoji, count) in &self.0 {
            map.serialize_entry(emoji, count)?;
        }
        map.end()
    }
}

/// Successful reactions within one calendar hour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyStat {
    /// Start of the hour
    pub timestamp: DateTime<Utc>,
    pub hour: u32,
    pub count: u64,
}

/// Point-in-time summary pushed to dashboard subscribers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub total_reactions: u64,
    pub reactions_per_second: f64,
    pub active_chats: u64,
    /// Seconds since the process started
    pub bot_uptime: u64,
    pub flood_waits: u64,
    pub error_rate: f64,
    pub emoji_usage: EmojiUsage,
    pub hourly_stats: Vec<HourlyStat>,
}

/// Per-chat statistics over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStats {
    pub chat_id: ChatId,
    pub total_reactions: u64,
    /// Failed attempts, flood waits included
    pub errors: u64,
    pub error_rate: f64,
    pub emoji_usage: EmojiUsage,
}

impl ChatStats {
    pub fn empty(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            total_reactions: 0,
            errors: 0,
            error_rate: 0.0,
            emoji_usage: EmojiUsage::default(),
        }
    }
}

/// Summary of one UTC calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_reactions: u64,
    pub total_attempts: u64,
    pub errors: u64,
    pub success_rate: f64,
    /// Distinct chats with at least one attempt that day
    pub active_chats: u64,
}

impl DailySummary {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_reactions: 0,
            total_attempts: 0,
            errors: 0,
            success_rate: 0.0,
            active_chats: 0,
        }
    }
}

/// Chat ranked by successful reactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopChat {
    pub chat_id: ChatId,
    pub chat_title: String,
    pub reactions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert!((percentage(5, 105) - 4.76).abs() < f64::EPSILON);
        assert!((percentage(1, 3) - 33.33).abs() < f64::EPSILON);
        assert_eq!(percentage(7, 0), 0.0);
    }

    #[test]
    fn test_emoji_usage_orders_by_count() {
        let usage = EmojiUsage::from_counts(vec![
            ("👍".to_string(), 2),
            ("🔥".to_string(), 9),
            ("❤️".to_string(), 5),
        ]);
        let json = serde_json::to_string(&usage).unwrap();
        assert_eq!(json, r#"{"🔥":9,"❤️":5,"👍":2}"#);
        assert_eq!(usage.clone().top(1).entries(), &[("🔥".to_string(), 9)]);
        assert_eq!(usage.get("❤️"), Some(5));
    }

    #[test]
    fn test_snapshot_default_shape() {
        let value = serde_json::to_value(AggregateSnapshot::default()).unwrap();
        assert_eq!(value["total_reactions"], 0);
        assert_eq!(value["error_rate"], 0.0);
        assert_eq!(value["emoji_usage"], serde_json::json!({}));
        assert_eq!(value["hourly_stats"], serde_json::json!([]));
    }

    #[test]
    fn test_daily_summary_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let value = serde_json::to_value(DailySummary::empty(date)).unwrap();
        assert_eq!(value["date"], "2024-05-01");
    }
}

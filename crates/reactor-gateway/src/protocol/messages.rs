//! Push message format
//!
//! Every message is `{"type": ..., "data": ..., "timestamp": ...}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use reactor_core::{AggregateSnapshot, DashboardEvent};

/// Push message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushType {
    /// Snapshot sent once on connect
    InitialStats,
    /// Periodic snapshot
    StatsUpdate,
    Reaction,
    ChatAdded,
    ChatUpdated,
    Error,
}

impl PushType {
    pub fn of(event: &DashboardEvent) -> Self {
        match event {
            DashboardEvent::Reaction { .. } => Self::Reaction,
            DashboardEvent::ChatAdded { .. } => Self::ChatAdded,
            DashboardEvent::ChatUpdated { .. } => Self::ChatUpdated,
            DashboardEvent::Error { .. } => Self::Error,
        }
    }
}

/// Server push message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    #[serde(rename = "type")]
    pub kind: PushType,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

impl PushMessage {
    fn new(kind: PushType, data: Value) -> Self {
        Self {
            kind,
            data,
            timestamp: Utc::now(),
        }
    }

    fn snapshot(kind: PushType, snapshot: &AggregateSnapshot) -> Self {
        let mut data = serde_json::to_value(snapshot).unwrap_or_default();
        if let Value::Object(map) = &mut data {
            map.insert("timestamp".to_string(), Value::String(Utc::now().to_rfc3339()));
        }
        Self::new(kind, data)
    }

    #[must_use]
    pub fn initial_stats(snapshot: &AggregateSnapshot) -> Self {
        Self::snapshot(PushType::InitialStats, snapshot)
    }

    #[must_use]
    pub fn stats_update(snapshot: &AggregateSnapshot) -> Self {
        Self::snapshot(PushType::StatsUpdate, snapshot)
    }

    #[must_use]
    pub fn event(event: DashboardEvent) -> Self {
        let kind = PushType::of(&event);
        let (_, data) = event.into_parts();
        Self::new(kind, data)
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

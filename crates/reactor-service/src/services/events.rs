//! In-process event bus for dashboard events

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::trace;

use reactor_core::{ChatId, DashboardEvent, MessageId, OutcomeStatus};

/// Default channel capacity; slow relays lag instead of blocking publishers
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Fan-out channel of [`DashboardEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DashboardEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; returns the number of receivers reached
    pub fn publish(&self, event: DashboardEvent) -> usize {
        let event_type = event.event_type();
        let delivered = self.tx.send(event).unwrap_or(0);
        trace!(event_type, delivered, "Dashboard event published");
        delivered
    }

    pub fn reaction(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: impl Into<String>,
        status: OutcomeStatus,
    ) -> usize {
        self.publish(DashboardEvent::Reaction {
            chat_id,
            message_id,
            emoji: emoji.into(),
            status,
        })
    }

    pub fn chat_added(&self, chat_id: ChatId, chat_title: impl Into<String>) -> usize {
        self.publish(DashboardEvent::ChatAdded {
            chat_id,
            chat_title: chat_title.into(),
        })
    }

    pub fn chat_updated(&self, chat_id: ChatId, changes: Value) -> usize {
        self.publish(DashboardEvent::ChatUpdated { chat_id, changes })
    }

    /// Publish an error event; `details` defaults to an empty object
    pub fn error(
        &self,
        error_type: impl Into<String>,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> usize {
        self.publish(DashboardEvent::Error {
            error_type: error_type.into(),
            message: message.into(),
            details: details.unwrap_or_else(|| Value::Object(serde_json::Map::new())),
        })
    }
}

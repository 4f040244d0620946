//! Subscriber registry
//!
//! Holds all connected dashboard subscribers in a `DashMap` keyed by
//! session ID. Fan-out iterates over a snapshot of the set, so connects
//! and disconnects during a broadcast never block it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::Subscriber;
use crate::protocol::PushMessage;

#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: DashMap<String, Arc<Subscriber>>,
}

impl SubscriberRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber
    pub fn add(&self, session_id: String, sender: mpsc::Sender<PushMessage>) -> Arc<Subscriber> {
        let subscriber = Subscriber::new(session_id.clone(), sender);
        self.subscribers.insert(session_id.clone(), subscriber.clone());
        debug!(session_id = %session_id, total = self.subscribers.len(), "Subscriber added");
        subscriber
    }

    /// Remove a subscriber; returns whether it was present
    pub fn remove(&self, session_id: &str) -> bool {
        let removed = self.subscribers.remove(session_id).is_some();
        if removed {
            debug!(session_id = %session_id, total = self.subscribers.len(), "Subscriber removed");
        }
        removed
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<Subscriber>> {
        self.subscribers.get(session_id).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.subscribers.iter().map(|r| r.key().clone()).collect()
    }

    /// Push to one subscriber, dropping it on failure
    pub fn push(&self, subscriber: &Subscriber, message: PushMessage) -> bool {
        match subscriber.try_push(message) {
            Ok(()) => true,
            Err(e) => {
                warn!(session_id = %subscriber.session_id(), error = %e, "Dropping subscriber");
                self.remove(subscriber.session_id());
                false
            }
        }
    }

    /// Push to every subscriber; returns the number reached
    pub fn broadcast(&self, message: &PushMessage) -> usize {
        let targets: Vec<Arc<Subscriber>> =
            self.subscribers.iter().map(|r| r.value().clone()).collect();

        let sent = targets
            .iter()
            .filter(|subscriber| self.push(subscriber, message.clone()))
            .count();

        debug!(sent, targets = targets.len(), kind = ?message.kind, "Broadcast complete");
        sent
    }
}

impl std::fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

//! Runtime counters
//!
//! Fast-path running totals kept alongside the outcome log. Advisory only;
//! the outcome log is the source of truth for statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashSet;
use serde::Serialize;
use tokio::time::Instant;

use reactor_core::ChatId;

/// Process-lifetime counters
#[derive(Debug)]
pub struct RuntimeCounters {
    total_reactions: AtomicU64,
    flood_waits: AtomicU64,
    errors: AtomicU64,
    active_chats: DashSet<ChatId>,
    started_at: Instant,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeStats {
    pub total_reactions: u64,
    pub flood_waits: u64,
    pub errors: u64,
    pub active_chats: u64,
    pub uptime_secs: u64,
}

impl Default for RuntimeCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeCounters {
    pub fn new() -> Self {
        Self {
            total_reactions: AtomicU64::new(0),
            flood_waits: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            active_chats: DashSet::new(),
            started_at: Instant::now(),
        }
    }

    /// Count a delivered reaction and mark its chat active
    pub fn record_success(&self, chat_id: ChatId) {
        self.total_reactions.fetch_add(1, Ordering::Relaxed);
        self.active_chats.insert(chat_id);
    }

    pub fn record_flood_wait(&self) {
        self.flood_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Whole seconds since the counters were created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn snapshot(&self) -> RuntimeStats {
        RuntimeStats {
            total_reactions: self.total_reactions.load(Ordering::Relaxed),
            flood_waits: self.flood_waits.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            active_chats: self.active_chats.len() as u64,
            uptime_secs: self.uptime_secs(),
        }
    }
}

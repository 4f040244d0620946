//! A single dashboard subscriber

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::protocol::PushMessage;

/// Generate a new session ID
#[must_use]
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Why a push could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("subscriber connection closed")]
    Closed,
    #[error("subscriber queue full")]
    Full,
}

/// Connected dashboard client
pub struct Subscriber {
    session_id: String,
    sender: mpsc::Sender<PushMessage>,
    pushed: AtomicU64,
    connected_at: Instant,
}

impl Subscriber {
    pub fn new(session_id: String, sender: mpsc::Sender<PushMessage>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            sender,
            pushed: AtomicU64::new(0),
            connected_at: Instant::now(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Queue a message without waiting
    pub fn try_push(&self, message: PushMessage) -> Result<(), PushError> {
        self.sender.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => PushError::Closed,
            mpsc::error::TrySendError::Full(_) => PushError::Full,
        })?;
        self.pushed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Messages queued so far
    pub fn pushed(&self) -> u64 {
        self.pushed.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn connected_for(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("session_id", &self.session_id)
            .field("pushed", &self.pushed())
            .finish()
    }
}

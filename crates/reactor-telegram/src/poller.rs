//! Long-poll update source
//!
//! Pulls updates with `getUpdates`, routes each one, and acknowledges it by
//! advancing the offset. Transport failures back off exponentially and the
//! loop resumes; it only ends on shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use reactor_common::TelegramConfig;
use reactor_core::InboundSink;

use crate::client::TelegramClient;
use crate::types::Routed;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Server-side long-poll timeout
    pub timeout_secs: u64,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl PollerConfig {
    pub fn from_settings(config: &TelegramConfig) -> Self {
        Self {
            timeout_secs: config.poll_timeout_secs,
            ..Self::default()
        }
    }

    fn backoff(&self, failures: u32) -> Duration {
        let multiplier = 1_u32 << failures.min(16);
        self.base_backoff
            .saturating_mul(multiplier)
            .min(self.max_backoff)
    }
}

pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    config: PollerConfig,
}

impl UpdatePoller {
    pub fn new(client: Arc<TelegramClient>, config: PollerConfig) -> Self {
        Self { client, config }
    }

    /// Poll until `shutdown` resolves
    pub async fn run<F>(&self, sink: Arc<dyn InboundSink>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset: Option<i64> = None;
        let mut failures: u32 = 0;
        info!(timeout_secs = self.config.timeout_secs, "Update poller started");

        loop {
            let polled = tokio::select! {
                () = &mut shutdown => break,
                polled = self.client.get_updates(offset, self.config.timeout_secs) => polled,
            };

            match polled {
                Ok(updates) => {
                    failures = 0;
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        match update.route() {
                            Routed::Message(message) => sink.submit(message),
                            Routed::Event(event) => {
                                info!(event_type = event.event_type(), chat_id = ?event.chat_id(), "Chat change observed");
                                sink.notify(event);
                            }
                            Routed::Ignored => debug!(update_id = update.update_id, "Update ignored"),
                        }
                    }
                }
                Err(e) => {
                    let delay = self.config.backoff(failures);
                    failures = failures.saturating_add(1);
                    warn!(error = %e, failures, delay_ms = delay.as_millis() as u64, "getUpdates failed, backing off");
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        info!("Update poller stopped");
    }
}

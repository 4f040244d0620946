//! Reaction dispatcher
//!
//! Sends one reaction with bounded retries. Flood waits sleep for the
//! platform-mandated duration scaled by a multiplier; other failures back
//! off exponentially with jitter. Every attempt produces exactly one
//! outcome record.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, instrument, warn};

use reactor_common::RetryConfig;
use reactor_core::{
    BotSettings, ChatId, DispatchAttempt, MessageId, OutcomeStatus, PlatformError,
    ReactionClient,
};

use super::counters::RuntimeCounters;
use super::events::EventBus;
use super::recorder::OutcomeRecorder;
use super::shutdown::ShutdownSignal;

/// Largest exponent applied to the base delay
const MAX_BACKOFF_EXPONENT: u32 = 30;

/// What to do after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stop,
    RetryAfter(Duration),
}

/// Retry budget and delay rules
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Cap of the exponential backoff, jitter excluded
    pub max_delay: Duration,
    pub flood_wait_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            flood_wait_multiplier: 1.5,
        }
    }
}

impl RetryPolicy {
    /// Backoff bounds from configuration, default budget
    pub fn from_config(config: &RetryConfig) -> Self {
        let defaults = Self::default();
        Self {
            base_delay: secs_f64(config.base_delay_secs, defaults.base_delay),
            max_delay: secs_f64(config.max_delay_secs, defaults.max_delay),
            ..defaults
        }
    }

    /// Apply stored bot settings; the base delay is kept
    #[must_use]
    pub fn with_settings(&self, settings: &BotSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: self.base_delay,
            max_delay: Duration::from_secs(u64::from(settings.retry_delay)),
            flood_wait_multiplier: settings.flood_wait_multiplier,
        }
    }

    /// Backoff before retry `attempt + 1`, without jitter
    pub fn backoff_ceiling(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(MAX_BACKOFF_EXPONENT);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Backoff plus uniform jitter in `[0, 1)` seconds
    pub fn exponential_backoff(&self, attempt: u32) -> Duration {
        let jitter: f64 = rand::thread_rng().gen_range(0.0..1.0);
        self.backoff_ceiling(attempt) + Duration::from_secs_f64(jitter)
    }

    /// Sleep mandated by a flood wait of `wait_secs`
    pub fn flood_wait_delay(&self, wait_secs: u64) -> Duration {
        let fallback = Duration::from_secs(wait_secs);
        secs_f64(wait_secs as f64 * self.flood_wait_multiplier, fallback)
    }

    /// Decide the step after attempt number `attempt` returned `result`
    pub fn next_step(&self, result: &Result<(), PlatformError>, attempt: u32) -> Step {
        match result {
            Ok(()) => Step::Stop,
            Err(_) if attempt >= self.max_retries => Step::Stop,
            Err(PlatformError::FloodWait(wait)) => Step::RetryAfter(self.flood_wait_delay(*wait)),
            Err(e) if e.is_rate_limit() => Step::Stop,
            Err(_) => Step::RetryAfter(self.exponential_backoff(attempt)),
        }
    }
}

fn secs_f64(secs: f64, fallback: Duration) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(fallback)
}

/// Summary of one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub emoji: String,
    /// Attempts made, at least one
    pub attempts: u32,
    pub final_status: OutcomeStatus,
    /// Stopped early by shutdown
    pub interrupted: bool,
}

impl DispatchReport {
    pub fn delivered(&self) -> bool {
        self.final_status == OutcomeStatus::Success
    }
}

/// Retrying reaction sender
pub struct ReactionDispatcher {
    client: Arc<dyn ReactionClient>,
    recorder: OutcomeRecorder,
    counters: Arc<RuntimeCounters>,
    events: EventBus,
    shutdown: ShutdownSignal,
}

impl ReactionDispatcher {
    pub fn new(
        client: Arc<dyn ReactionClient>,
        recorder: OutcomeRecorder,
        counters: Arc<RuntimeCounters>,
        events: EventBus,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            client,
            recorder,
            counters,
            events,
            shutdown,
        }
    }

    /// Send `emoji` to a message, retrying per `policy`
    #[instrument(skip(self, policy), fields(chat_id = %chat_id, message_id = %message_id))]
    pub async fn dispatch(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: String,
        policy: &RetryPolicy,
    ) -> DispatchReport {
        let mut attempt = DispatchAttempt::first(chat_id, message_id, emoji);
        let mut last_recorded: Option<DateTime<Utc>> = None;

        loop {
            let result = self
                .client
                .send_reaction(chat_id, message_id, &attempt.emoji)
                .await;

            let (status, error) = match &result {
                Ok(()) => (OutcomeStatus::Success, None),
                Err(e @ PlatformError::FloodWait(_)) => (OutcomeStatus::FloodWait, Some(e.to_string())),
                Err(e) => (OutcomeStatus::Error, Some(e.to_string())),
            };

            let timestamp = strictly_after(last_recorded);
            last_recorded = Some(timestamp);
            let record = attempt.conclude(status, error, timestamp);

            match status {
                OutcomeStatus::Success => {
                    self.counters.record_success(chat_id);
                    info!(emoji = %attempt.emoji, attempt = attempt.attempt_number, "Reaction delivered");
                }
                OutcomeStatus::FloodWait => {
                    self.counters.record_flood_wait();
                    warn!(attempt = attempt.attempt_number, error = ?record.error, "Flood wait");
                }
                OutcomeStatus::Error => {
                    self.counters.record_error();
                    warn!(attempt = attempt.attempt_number, error = ?record.error, "Reaction failed");
                }
            }

            // The recorder logs and surfaces its own failures.
            let _ = self.recorder.append(&record).await;

            if status == OutcomeStatus::Success {
                self.events
                    .reaction(chat_id, message_id, attempt.emoji.clone(), status);
            }

            let report = |interrupted| DispatchReport {
                emoji: attempt.emoji.clone(),
                attempts: attempt.attempt_number + 1,
                final_status: status,
                interrupted,
            };

            match policy.next_step(&result, attempt.attempt_number) {
                Step::Stop => {
                    if status.is_failure() {
                        warn!(attempts = attempt.attempt_number + 1, "Giving up on reaction");
                    }
                    return report(false);
                }
                Step::RetryAfter(delay) => {
                    if !self.shutdown.sleep(delay).await {
                        info!("Shutdown during retry wait");
                        return report(true);
                    }
                }
            }
            attempt = attempt.next();
        }
    }
}

/// Current time, nudged forward so it is strictly later than `previous`
fn strictly_after(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if now <= prev => prev + chrono::Duration::microseconds(1),
        _ => now,
    }
}

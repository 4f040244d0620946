//! Ingest pipeline
//!
//! Inbound message → policy lookup → filter → pre-send delay → emoji
//! selection → dispatch. Each message runs in its own task.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use reactor_core::{BotSettings, ChatPolicy, DashboardEvent, InboundMessage, InboundSink};

use super::context::ServiceContext;
use super::dispatcher::{DispatchReport, ReactionDispatcher, RetryPolicy};
use super::filter::{evaluate, FilterDecision, RejectReason};
use super::recorder::OutcomeRecorder;
use super::selector::EmojiSelector;

/// How a message left the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Rejected(RejectReason),
    Dispatched(DispatchReport),
    /// Shutdown fired during the pre-send delay
    Interrupted,
    /// The policy could not be loaded
    Failed,
}

/// Reaction pipeline, cheap to clone
#[derive(Clone)]
pub struct ReactionPipeline {
    ctx: ServiceContext,
    selector: Arc<EmojiSelector>,
    dispatcher: Arc<ReactionDispatcher>,
}

impl ReactionPipeline {
    pub fn new(ctx: ServiceContext) -> Self {
        let selector = Arc::new(EmojiSelector::new(ctx.policy_repo()));
        let recorder = OutcomeRecorder::new(ctx.outcome_repo(), ctx.events().clone());
        let dispatcher = Arc::new(ReactionDispatcher::new(
            ctx.client(),
            recorder,
            Arc::clone(ctx.counters()),
            ctx.events().clone(),
            ctx.shutdown().clone(),
        ));
        Self {
            ctx,
            selector,
            dispatcher,
        }
    }

    /// Run one message through the pipeline
    #[instrument(skip(self, message), fields(chat_id = %message.chat_id, message_id = %message.message_id))]
    pub async fn handle(&self, message: InboundMessage) -> PipelineOutcome {
        let policy = match self.ctx.policy_repo().find_by_chat(message.chat_id).await {
            Ok(Some(policy)) => policy,
            Ok(None) => {
                debug!("No policy for chat");
                return PipelineOutcome::Rejected(RejectReason::UnknownChat);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load chat policy");
                self.ctx.counters().record_error();
                return PipelineOutcome::Failed;
            }
        };

        let (settings, retry) = self.settings().await;

        if let FilterDecision::Reject(reason) = evaluate(&policy, &settings, &message) {
            debug!(reason = reason.as_str(), "Message filtered");
            return PipelineOutcome::Rejected(reason);
        }

        let delay = pre_send_delay(&policy);
        debug!(delay_ms = delay.as_millis() as u64, "Waiting before reaction");
        if !self.ctx.shutdown().sleep(delay).await {
            return PipelineOutcome::Interrupted;
        }

        let emoji = self.selector.select(&policy).await;
        let report = self
            .dispatcher
            .dispatch(message.chat_id, message.message_id, emoji, &retry)
            .await;
        PipelineOutcome::Dispatched(report)
    }

    /// Handle a message on its own task
    pub fn spawn(&self, message: InboundMessage) -> JoinHandle<PipelineOutcome> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.handle(message).await })
    }

    /// Stored settings with their retry policy, or the defaults
    async fn settings(&self) -> (BotSettings, RetryPolicy) {
        match self.ctx.settings_repo().bot_settings().await {
            Ok(Some(settings)) => {
                let retry = self.ctx.retry().with_settings(&settings);
                (settings, retry)
            }
            Ok(None) => (BotSettings::default(), self.ctx.retry().clone()),
            Err(e) => {
                warn!(error = %e, "Failed to load bot settings, using defaults");
                (BotSettings::default(), self.ctx.retry().clone())
            }
        }
    }
}

impl InboundSink for ReactionPipeline {
    fn submit(&self, message: InboundMessage) {
        drop(self.spawn(message));
    }

    fn notify(&self, event: DashboardEvent) {
        if let DashboardEvent::ChatUpdated { chat_id, .. } = &event {
            self.selector.reset(*chat_id);
        }
        self.ctx.events().publish(event);
    }
}

/// Uniform delay within the policy's window
fn pre_send_delay(policy: &ChatPolicy) -> Duration {
    let (min, max) = policy.delay_bounds();
    if min == max {
        return Duration::from_secs(u64::from(min));
    }
    let secs = rand::thread_rng().gen_range(f64::from(min)..=f64::from(max));
    Duration::from_secs_f64(secs)
}

//! Service context - dependency container for services
//!
//! Holds the repositories, the platform client, and the shared runtime
//! handles (event bus, counters, shutdown signal).

use std::sync::Arc;

use reactor_core::{OutcomeRepository, PolicyRepository, ReactionClient, SettingsRepository};

use super::counters::RuntimeCounters;
use super::dispatcher::RetryPolicy;
use super::error::{ServiceError, ServiceResult};
use super::events::EventBus;
use super::pipeline::ReactionPipeline;
use super::shutdown::ShutdownSignal;
use super::stats::StatsAggregator;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    policy_repo: Arc<dyn PolicyRepository>,
    outcome_repo: Arc<dyn OutcomeRepository>,
    settings_repo: Arc<dyn SettingsRepository>,

    // Platform
    client: Arc<dyn ReactionClient>,

    // Runtime
    events: EventBus,
    counters: Arc<RuntimeCounters>,
    shutdown: ShutdownSignal,
    retry: RetryPolicy,
}

impl ServiceContext {
    // === Repositories ===

    pub fn policy_repo(&self) -> Arc<dyn PolicyRepository> {
        Arc::clone(&self.policy_repo)
    }

    pub fn outcome_repo(&self) -> Arc<dyn OutcomeRepository> {
        Arc::clone(&self.outcome_repo)
    }

    pub fn settings_repo(&self) -> Arc<dyn SettingsRepository> {
        Arc::clone(&self.settings_repo)
    }

    // === Platform ===

    pub fn client(&self) -> Arc<dyn ReactionClient> {
        Arc::clone(&self.client)
    }

    // === Runtime ===

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn counters(&self) -> &Arc<RuntimeCounters> {
        &self.counters
    }

    pub fn shutdown(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Retry policy used when no bot settings are stored
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    // === Services ===

    /// Build the ingest pipeline over this context
    pub fn pipeline(&self) -> ReactionPipeline {
        ReactionPipeline::new(self.clone())
    }

    /// Build a stats aggregator over this context
    pub fn stats(&self) -> StatsAggregator {
        StatsAggregator::new(
            self.policy_repo(),
            self.outcome_repo(),
            Arc::clone(&self.counters),
        )
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("retry", &self.retry)
            .field("shutdown", &self.shutdown.is_triggered())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    policy_repo: Option<Arc<dyn PolicyRepository>>,
    outcome_repo: Option<Arc<dyn OutcomeRepository>>,
    settings_repo: Option<Arc<dyn SettingsRepository>>,
    client: Option<Arc<dyn ReactionClient>>,
    events: Option<EventBus>,
    counters: Option<Arc<RuntimeCounters>>,
    shutdown: Option<ShutdownSignal>,
    retry: Option<RetryPolicy>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy_repo(mut self, repo: Arc<dyn PolicyRepository>) -> Self {
        self.policy_repo = Some(repo);
        self
    }

    pub fn outcome_repo(mut self, repo: Arc<dyn OutcomeRepository>) -> Self {
        self.outcome_repo = Some(repo);
        self
    }

    pub fn settings_repo(mut self, repo: Arc<dyn SettingsRepository>) -> Self {
        self.settings_repo = Some(repo);
        self
    }

    pub fn client(mut self, client: Arc<dyn ReactionClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn counters(mut self, counters: Arc<RuntimeCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    pub fn shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            policy_repo: self
                .policy_repo
                .ok_or_else(|| ServiceError::validation("policy_repo is required"))?,
            outcome_repo: self
                .outcome_repo
                .ok_or_else(|| ServiceError::validation("outcome_repo is required"))?,
            settings_repo: self
                .settings_repo
                .ok_or_else(|| ServiceError::validation("settings_repo is required"))?,
            client: self
                .client
                .ok_or_else(|| ServiceError::validation("client is required"))?,
            shutdown: self
                .shutdown
                .ok_or_else(|| ServiceError::validation("shutdown is required"))?,
            events: self.events.unwrap_or_default(),
            counters: self.counters.unwrap_or_default(),
            retry: self.retry.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::shutdown::shutdown_channel;
    use async_trait::async_trait;
    use reactor_core::{ChatId, MessageId, PlatformError};
    use reactor_db::{MemoryOutcomeRepository, MemoryPolicyRepository, MemorySettingsRepository};

    struct Noop;

    #[async_trait]
    impl ReactionClient for Noop {
        async fn send_reaction(&self, _: ChatId, _: MessageId, _: &str) -> Result<(), PlatformError> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_dependency() {
        let err = ServiceContextBuilder::new()
            .policy_repo(Arc::new(MemoryPolicyRepository::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("outcome_repo is required"));
    }

    #[test]
    fn test_defaults_filled_in() {
        let (_trigger, signal) = shutdown_channel();
        let ctx = ServiceContextBuilder::new()
            .policy_repo(Arc::new(MemoryPolicyRepository::new()))
            .outcome_repo(Arc::new(MemoryOutcomeRepository::new()))
            .settings_repo(Arc::new(MemorySettingsRepository::new()))
            .client(Arc::new(Noop))
            .shutdown(signal)
            .build()
            .unwrap();
        assert_eq!(ctx.retry(), &RetryPolicy::default());
        assert_eq!(ctx.counters().snapshot().total_reactions, 0);
    }
}

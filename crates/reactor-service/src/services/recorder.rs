//! Outcome recorder
//!
//! Appends one record per dispatch attempt to the outcome log.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error};

use reactor_core::{OutcomeRecord, OutcomeRepository};

use super::error::ServiceResult;
use super::events::EventBus;

/// Error type published when an append fails
pub const PERSISTENCE_ERROR: &str = "outcome_persistence";

/// Outcome log writer
#[derive(Clone)]
pub struct OutcomeRecorder {
    outcomes: Arc<dyn OutcomeRepository>,
    events: EventBus,
}

impl OutcomeRecorder {
    pub fn new(outcomes: Arc<dyn OutcomeRepository>, events: EventBus) -> Self {
        Self { outcomes, events }
    }

    /// Append a record
    ///
    /// A storage failure is logged and surfaced as an error event before
    /// being returned to the caller.
    pub async fn append(&self, record: &OutcomeRecord) -> ServiceResult<()> {
        match self.outcomes.append(record).await {
            Ok(()) => {
                debug!(
                    chat_id = %record.chat_id,
                    message_id = %record.message_id,
                    status = %record.status,
                    retry_count = record.retry_count,
                    "Outcome recorded"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    chat_id = %record.chat_id,
                    message_id = %record.message_id,
                    status = %record.status,
                    error = %e,
                    "Failed to record outcome"
                );
                self.events.error(
                    PERSISTENCE_ERROR,
                    e.to_string(),
                    Some(json!({
                        "chat_id": record.chat_id,
                        "message_id": record.message_id,
                        "status": record.status,
                    })),
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use reactor_core::{
        ChatId, DashboardEvent, DispatchAttempt, DomainError, MessageId, OutcomeFilter,
        OutcomeStatus, RepoResult,
    };
    use crate::services::error::ServiceError;
    use reactor_db::MemoryOutcomeRepository;

    fn record() -> OutcomeRecord {
        DispatchAttempt::first(ChatId::new(-3), MessageId::new(4), "✨").conclude(
            OutcomeStatus::Success,
            None,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_append_stores_record() {
        let repo = Arc::new(MemoryOutcomeRepository::new());
        let recorder = OutcomeRecorder::new(repo.clone(), EventBus::default());
        let record = record();
        recorder.append(&record).await.unwrap();
        assert_eq!(repo.records(), vec![record]);
    }

    struct FullDisk;

    #[async_trait]
    impl OutcomeRepository for FullDisk {
        async fn append(&self, _: &OutcomeRecord) -> RepoResult<()> {
            Err(DomainError::DatabaseError("disk full".to_string()))
        }
        async fn count(&self, _: &OutcomeFilter) -> RepoResult<u64> {
            Ok(0)
        }
        async fn emoji_histogram(&self, _: &OutcomeFilter, _: usize) -> RepoResult<Vec<(String, u64)>> {
            Ok(Vec::new())
        }
        async fn hourly_counts(&self, _: &OutcomeFilter) -> RepoResult<Vec<(DateTime<Utc>, u64)>> {
            Ok(Vec::new())
        }
        async fn distinct_chats(&self, _: &OutcomeFilter) -> RepoResult<u64> {
            Ok(0)
        }
        async fn top_chats(&self, _: &OutcomeFilter, _: usize) -> RepoResult<Vec<(ChatId, u64)>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_failure_publishes_error_event() {
        let events = EventBus::new(4);
        let mut rx = events.subscribe();
        let recorder = OutcomeRecorder::new(Arc::new(FullDisk), events);

        let err = recorder.append(&record()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::DatabaseError(_))));

        match rx.recv().await.unwrap() {
            DashboardEvent::Error { error_type, details, .. } => {
                assert_eq!(error_type, PERSISTENCE_ERROR);
                assert_eq!(details["chat_id"], -3);
                assert_eq!(details["status"], "success");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}

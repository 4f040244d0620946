//! # reactor-service
//!
//! Application layer: the reaction decision-and-dispatch pipeline and the
//! read side over the outcome log.

pub mod services;

pub use services::{
    evaluate, shutdown_channel, DispatchReport, EmojiSelector, EventBus, FilterDecision,
    OutcomeRecorder, PipelineOutcome, ReactionDispatcher, ReactionPipeline, RejectReason,
    RetryPolicy, RuntimeCounters, RuntimeStats, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, ShutdownSignal, ShutdownTrigger, SnapshotProvider,
    StatsAggregator, Step,
};

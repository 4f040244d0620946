//! Business logic services
//!
//! Components in dependency order: policy filter, emoji selector, outcome
//! recorder, reaction dispatcher, stats aggregator, and the ingest pipeline
//! that wires them together.

pub mod context;
pub mod counters;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod filter;
pub mod pipeline;
pub mod recorder;
pub mod selector;
pub mod shutdown;
pub mod stats;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use counters::{RuntimeCounters, RuntimeStats};
pub use dispatcher::{DispatchReport, ReactionDispatcher, RetryPolicy, Step};
pub use error::{ServiceError, ServiceResult};
pub use events::EventBus;
pub use filter::{evaluate, FilterDecision, RejectReason};
pub use pipeline::{PipelineOutcome, ReactionPipeline};
pub use recorder::OutcomeRecorder;
pub use selector::EmojiSelector;
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
pub use stats::{SnapshotProvider, StatsAggregator};

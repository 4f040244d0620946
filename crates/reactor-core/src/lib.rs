//! # reactor-core
//!
//! Domain layer containing entities, value objects, repository and platform
//! traits, and dashboard events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    percentage, round2, AggregateSnapshot, BotSettings, ChatPolicy, ChatStats, DailySummary,
    DispatchAttempt, EmojiUsage, HourlyStat, InboundMessage, OutcomeRecord, OutcomeStatus,
    ReactionMode, TopChat, DEFAULT_EMOJI,
};
pub use error::{DomainError, PlatformError};
pub use events::DashboardEvent;
pub use traits::{
    InboundSink, OutcomeFilter, OutcomeRepository, PolicyRepository, ReactionClient, RepoResult,
    SettingsRepository,
};
pub use value_objects::{ChatId, IdParseError, MessageId};

//! Domain entities - core business objects

mod message;
mod outcome;
mod policy;
mod settings;
mod stats;

pub use message::InboundMessage;
pub use outcome::{DispatchAttempt, OutcomeRecord, OutcomeStatus};
pub use policy::{ChatPolicy, ReactionMode, DEFAULT_EMOJI};
pub use settings::BotSettings;
pub use stats::{
    percentage, round2, AggregateSnapshot, ChatStats, DailySummary, EmojiUsage, HourlyStat, TopChat,
};

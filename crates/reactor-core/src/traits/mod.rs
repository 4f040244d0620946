//! Traits (ports) implemented by the infrastructure crates

mod platform;
mod repositories;

pub use platform::{InboundSink, ReactionClient};
pub use repositories::{
    OutcomeFilter, OutcomeRepository, PolicyRepository, RepoResult, SettingsRepository,
};

//! In-memory repositories
//!
//! Implement the same traits as the PostgreSQL repositories. Used when no
//! database is configured and as test doubles.

mod outcome;
mod policy;
mod settings;

pub use outcome::MemoryOutcomeRepository;
pub use policy::MemoryPolicyRepository;
pub use settings::MemorySettingsRepository;

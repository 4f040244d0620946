//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in reactor-core.

mod error;
mod outcome;
mod policy;
mod settings;

pub use outcome::PgOutcomeRepository;
pub use policy::PgPolicyRepository;
pub use settings::PgSettingsRepository;

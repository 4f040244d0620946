//! # reactor-db
//!
//! Storage layer implementing the repository traits of `reactor-core`.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx, with connection pool management and
//!   the bundled schema
//! - In-memory repositories for running without a database and for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reactor_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use reactor_db::repositories::PgOutcomeRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/reactor")).await?;
//!     run_migrations(&pool).await?;
//!     let outcomes = PgOutcomeRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryOutcomeRepository, MemoryPolicyRepository, MemorySettingsRepository};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgOutcomeRepository, PgPolicyRepository, PgSettingsRepository};

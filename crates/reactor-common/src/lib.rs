//! # reactor-common
//!
//! Shared utilities including configuration, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, BroadcastConfig, ConfigError, DatabaseConfig, Environment,
    RetryConfig, ServerConfig, TelegramConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};

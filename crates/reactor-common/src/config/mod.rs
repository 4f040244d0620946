//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BroadcastConfig, ConfigError, DatabaseConfig, Environment,
    RetryConfig, ServerConfig, TelegramConfig,
};

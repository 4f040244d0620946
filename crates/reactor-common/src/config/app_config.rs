//! Application configuration structs
//!
//! Loads configuration from environment variables and an optional `.env` file.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub database: DatabaseConfig,
    pub telegram: TelegramConfig,
    pub broadcast: BroadcastConfig,
    pub retry: RetryConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse_lossy(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
///
/// Without a URL the service runs on the in-memory store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Update polling is disabled without a token
    pub bot_token: Option<String>,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

/// Dashboard broadcast configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    #[serde(default = "default_broadcast_interval_secs")]
    pub interval_secs: u64,
    /// Outbound queue length per subscriber
    #[serde(default = "default_broadcast_buffer")]
    pub buffer: usize,
}

impl BroadcastConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Exponential backoff bounds of the reaction dispatcher
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_retry_base_delay")]
    pub base_delay_secs: f64,
    #[serde(default = "default_retry_max_delay")]
    pub max_delay_secs: f64,
}

// Default value functions
fn default_app_name() -> String {
    "reactor".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_broadcast_interval_secs() -> u64 {
    5
}

fn default_broadcast_buffer() -> usize {
    64
}

fn default_retry_base_delay() -> f64 {
    1.0
}

fn default_retry_max_delay() -> f64 {
    60.0
}

/// Parse an optional variable, reporting malformed values instead of ignoring them
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(default()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("GATEWAY_PORT").ok_or(ConfigError::MissingVar("GATEWAY_PORT"))?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse_lossy(&s))
                    .unwrap_or_default(),
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: port
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("GATEWAY_PORT", port.clone()))?,
            },
            database: DatabaseConfig {
                url: non_empty(lookup("DATABASE_URL")),
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            telegram: TelegramConfig {
                bot_token: non_empty(lookup("TELEGRAM_BOT_TOKEN")),
                api_base: lookup("TELEGRAM_API_BASE").unwrap_or_else(default_telegram_api_base),
                poll_timeout_secs: parse_or(&lookup, "TELEGRAM_POLL_TIMEOUT_SECS", default_poll_timeout_secs)?,
            },
            broadcast: BroadcastConfig {
                interval_secs: parse_or(&lookup, "BROADCAST_INTERVAL_SECS", default_broadcast_interval_secs)?,
                buffer: parse_or(&lookup, "BROADCAST_BUFFER", default_broadcast_buffer)?,
            },
            retry: RetryConfig {
                base_delay_secs: parse_or(&lookup, "RETRY_BASE_DELAY_SECS", default_retry_base_delay)?,
                max_delay_secs: parse_or(&lookup, "RETRY_MAX_DELAY_SECS", default_retry_max_delay)?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

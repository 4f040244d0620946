//! PostgreSQL connection pool management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Schema scripts, applied in order; each is idempotent
const MIGRATIONS: &[(&str, &str)] = &[("0001_init", include_str!("../../migrations/0001_init.sql"))];

/// Database configuration for connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    /// Maximum idle time before a connection is closed
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Pool configuration with default timeouts
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }

    /// Build from application settings; `None` when no URL is configured
    pub fn from_settings(settings: &reactor_common::DatabaseConfig) -> Option<Self> {
        let url = settings.url.as_ref()?;
        Some(Self {
            max_connections: settings.max_connections,
            min_connections: settings.min_connections.min(settings.max_connections),
            ..Self::new(url.clone())
        })
    }
}

/// Create a new PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await
}

/// Apply the bundled schema scripts
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for &(name, script) in MIGRATIONS {
        sqlx::raw_sql(script).execute(pool).await?;
        info!(migration = name, "Schema migration applied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = DatabaseConfig::new("postgres://localhost/reactor");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_settings() {
        let mut settings = reactor_common::DatabaseConfig {
            url: None,
            max_connections: 4,
            min_connections: 8,
        };
        assert!(DatabaseConfig::from_settings(&settings).is_none());

        settings.url = Some("postgres://localhost/reactor".to_string());
        let config = DatabaseConfig::from_settings(&settings).unwrap();
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.min_connections, 4);
    }

    #[test]
    fn test_migrations_are_idempotent_scripts() {
        for &(_, script) in MIGRATIONS {
            for stmt in ["CREATE TABLE", "CREATE INDEX"] {
                let guarded = format!("{stmt} IF NOT EXISTS");
                assert_eq!(script.matches(stmt).count(), script.matches(guarded.as_str()).count());
            }
        }
    }
}

//! Application error types
//!
//! Errors that stop the gateway binary from starting or serving.

use reactor_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal error: {0:#}")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use reactor_core::ChatId;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Database("test".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(AppError::Config("port".to_string()).error_code(), "CONFIG_ERROR");

        let err = AppError::from(DomainError::EmptyEmojiList(ChatId::new(-1)));
        assert_eq!(err.error_code(), "EMPTY_EMOJI_LIST");
        assert_eq!(err.to_string(), "Chat -1 is enabled but has no emojis");
    }

    #[test]
    fn test_internal_keeps_context() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = AppError::internal(
            Err::<(), _>(io)
                .context("Failed to bind to 0.0.0.0:8080")
                .unwrap_err(),
        );
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(
            err.to_string(),
            "Internal error: Failed to bind to 0.0.0.0:8080: address in use"
        );
    }
}

//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::ChatId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid delay window: min {min}s exceeds max {max}s")]
    InvalidDelayWindow { min: u32, max: u32 },

    #[error("Chat {0} is enabled but has no emojis")]
    EmptyEmojiList(ChatId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidDelayWindow { .. } => "INVALID_DELAY_WINDOW",
            Self::EmptyEmojiList(_) => "EMPTY_EMOJI_LIST",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::EmptyEmojiList(ChatId::new(-1));
        assert_eq!(err.code(), "EMPTY_EMOJI_LIST");

        let err = DomainError::InvalidDelayWindow { min: 5, max: 1 };
        assert_eq!(err.code(), "INVALID_DELAY_WINDOW");

        let err = DomainError::DatabaseError("down".into());
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::EmptyEmojiList(ChatId::new(-100123));
        assert_eq!(err.to_string(), "Chat -100123 is enabled but has no emojis");

        let err = DomainError::InvalidDelayWindow { min: 9, max: 2 };
        assert_eq!(err.to_string(), "Invalid delay window: min 9s exceeds max 2s");
    }
}

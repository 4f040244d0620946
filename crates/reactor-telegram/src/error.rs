//! Bot API error types

use thiserror::Error;

use reactor_core::PlatformError;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered `ok: false`
    #[error("Telegram API error {code}: {description}")]
    Api {
        code: i64,
        description: String,
        retry_after: Option<u64>,
    },

    #[error("Malformed API response: {0}")]
    Decode(String),
}

impl TelegramError {
    /// Seconds the API asked us to wait, if rate limited
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Api {
                retry_after: Some(secs),
                ..
            } => Some(*secs),
            Self::Api { code: 429, .. } => Some(1),
            _ => None,
        }
    }
}

impl From<TelegramError> for PlatformError {
    fn from(err: TelegramError) -> Self {
        match err.retry_after() {
            Some(secs) => PlatformError::FloodWait(secs),
            None => PlatformError::rpc(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_flood_wait() {
        let err = TelegramError::Api {
            code: 429,
            description: "Too Many Requests: retry after 17".to_string(),
            retry_after: Some(17),
        };
        assert_eq!(PlatformError::from(err), PlatformError::FloodWait(17));

        let bare = TelegramError::Api {
            code: 429,
            description: "Too Many Requests".to_string(),
            retry_after: None,
        };
        assert_eq!(PlatformError::from(bare), PlatformError::FloodWait(1));
    }

    #[test]
    fn test_other_errors_map_to_rpc() {
        let err = TelegramError::Api {
            code: 400,
            description: "Bad Request: REACTION_INVALID".to_string(),
            retry_after: None,
        };
        let mapped = PlatformError::from(err);
        assert_eq!(
            mapped,
            PlatformError::rpc("Telegram API error 400: Bad Request: REACTION_INVALID")
        );
        assert!(!mapped.is_rate_limit());
    }
}

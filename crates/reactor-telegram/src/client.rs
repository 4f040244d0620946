//! Bot API HTTP client

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use reactor_common::TelegramConfig;
use reactor_core::{ChatId, MessageId, PlatformError, ReactionClient};

use crate::error::TelegramError;
use crate::types::{ApiResponse, GetUpdates, SetMessageReaction, Update};

/// Update kinds requested from `getUpdates`
pub const ALLOWED_UPDATES: &[&str] = &["message", "channel_post", "my_chat_member"];

/// Headroom added to the HTTP timeout of a long poll
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Telegram Bot API client
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    /// `{api_base}/bot{token}`
    endpoint: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, bot_token: &str) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/bot{}", api_base.trim_end_matches('/'), bot_token),
        })
    }

    /// Client for the configured bot, if a token is set
    pub fn from_config(config: &TelegramConfig) -> Result<Option<Self>, TelegramError> {
        config
            .bot_token
            .as_deref()
            .map(|token| Self::new(&config.api_base, token))
            .transpose()
    }

    /// Attach a single emoji reaction to a message
    #[instrument(skip(self))]
    pub async fn set_message_reaction(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), TelegramError> {
        let body = SetMessageReaction::emoji(chat_id, message_id, emoji);
        let _: bool = self.call("setMessageReaction", &body, None).await?;
        Ok(())
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdates {
            offset,
            timeout: timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        let timeout = Duration::from_secs(timeout_secs) + POLL_GRACE;
        self.call("getUpdates", &body, Some(timeout)).await
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(format!("{}/{}", self.endpoint, method))
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let payload: ApiResponse<T> = response.json().await.map_err(|e| {
            TelegramError::Decode(format!("{method} returned HTTP {status}: {e}"))
        })?;

        if payload.ok {
            debug!(method, "Bot API call succeeded");
            return payload
                .result
                .ok_or_else(|| TelegramError::Decode(format!("{method} returned no result")));
        }

        Err(TelegramError::Api {
            code: payload
                .error_code
                .unwrap_or_else(|| i64::from(status.as_u16())),
            description: payload
                .description
                .unwrap_or_else(|| status.to_string()),
            retry_after: payload.parameters.and_then(|p| p.retry_after),
        })
    }
}

#[async_trait]
impl ReactionClient for TelegramClient {
    async fn send_reaction(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), PlatformError> {
        self.set_message_reaction(chat_id, message_id, emoji)
            .await
            .map_err(PlatformError::from)
    }
}

//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use reactor_core::ChatId;

use crate::response::ApiError;

/// `:chat_id` path segment parsed as a [`ChatId`]
#[derive(Debug, Clone, Copy)]
pub struct ChatIdPath(pub ChatId);

#[async_trait]
impl<S> FromRequestParts<S> for ChatIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        raw.parse()
            .map(ChatIdPath)
            .map_err(|_| ApiError::invalid_path("Invalid chat_id format"))
    }
}

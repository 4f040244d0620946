//! Platform errors - failure classes of the send-reaction call

use thiserror::Error;

/// Failure returned by a [`ReactionClient`](crate::traits::ReactionClient)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Rate limited; the platform requires waiting this many seconds
    #[error("FloodWait {0}s")]
    FloodWait(u64),

    /// Any other failure of the call
    #[error("{0}")]
    Rpc(String),
}

impl PlatformError {
    /// Build an RPC error from anything displayable
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Check whether the error is a rate-limit signal
    ///
    /// RPC failures that mention flooding are rate limits without an
    /// authoritative wait and must not be retried speculatively.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::FloodWait(_) => true,
            Self::Rpc(msg) => {
                msg.to_ascii_uppercase().contains("FLOOD") || msg.contains("Too Many Requests")
            }
        }
    }
}

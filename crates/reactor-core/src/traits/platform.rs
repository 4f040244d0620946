//! Platform ports - the messaging platform as seen by the core

use async_trait::async_trait;

use crate::entities::InboundMessage;
use crate::error::PlatformError;
use crate::events::DashboardEvent;
use crate::value_objects::{ChatId, MessageId};

/// Sends reactions to the messaging platform
#[async_trait]
pub trait ReactionClient: Send + Sync {
    /// Attach `emoji` to a message
    async fn send_reaction(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), PlatformError>;
}

/// Receives classified updates from an update source
pub trait InboundSink: Send + Sync {
    /// Hand over one message; must not block on its processing
    fn submit(&self, message: InboundMessage);

    /// Chat membership or metadata change observed on the platform
    fn notify(&self, _event: DashboardEvent) {}
}

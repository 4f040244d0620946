//! Policy filter
//!
//! Decides whether an inbound message qualifies for a reaction. Pure: no
//! I/O and no side effects.

use std::fmt;

use reactor_core::{BotSettings, ChatPolicy, InboundMessage};

/// Why a message was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// No policy exists for the chat
    UnknownChat,
    ChatDisabled,
    AutoReactDisabled,
    TextFiltered,
    MediaFiltered,
    ForwardFiltered,
}

impl RejectReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownChat => "unknown_chat",
            Self::ChatDisabled => "chat_disabled",
            Self::AutoReactDisabled => "auto_react_disabled",
            Self::TextFiltered => "text_filtered",
            Self::MediaFiltered => "media_filtered",
            Self::ForwardFiltered => "forward_filtered",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Pass,
    Reject(RejectReason),
}

impl FilterDecision {
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Evaluate a message against its chat policy and the global settings
///
/// Checks run in a fixed order and the first failing one names the reason.
pub fn evaluate(
    policy: &ChatPolicy,
    settings: &BotSettings,
    message: &InboundMessage,
) -> FilterDecision {
    let reason = if !policy.enabled {
        RejectReason::ChatDisabled
    } else if !settings.auto_react {
        RejectReason::AutoReactDisabled
    } else if message.has_text && !policy.react_to_text {
        RejectReason::TextFiltered
    } else if message.has_media && !policy.react_to_media {
        RejectReason::MediaFiltered
    } else if message.is_forward && !policy.react_to_forwards {
        RejectReason::ForwardFiltered
    } else {
        return FilterDecision::Pass;
    };
    FilterDecision::Reject(reason)
}

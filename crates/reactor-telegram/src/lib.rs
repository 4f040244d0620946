//! # reactor-telegram
//!
//! Telegram Bot API adapter.
//!
//! - [`TelegramClient`] sends reactions with `setMessageReaction` and reads
//!   updates with `getUpdates`
//! - [`UpdatePoller`] long-polls for chat messages and hands them to an
//!   [`InboundSink`](reactor_core::InboundSink)

pub mod client;
pub mod error;
pub mod poller;
pub mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use poller::{PollerConfig, UpdatePoller};

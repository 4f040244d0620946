//! Subscriber connection management
//!
//! Tracks dashboard subscribers and their outbound queues.

mod manager;
mod subscriber;

pub use manager::SubscriberRegistry;
pub use subscriber::{generate_session_id, PushError, Subscriber};

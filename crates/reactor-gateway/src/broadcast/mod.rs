//! Dashboard broadcast
//!
//! Periodic stats pushes plus out-of-band relay of dashboard events.

mod service;

pub use service::BroadcastService;

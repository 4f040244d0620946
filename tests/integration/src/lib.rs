//! Integration test utilities for the reactor gateway
//!
//! Spawns the gateway on a local port with in-memory storage and a
//! scripted platform client, and drives it over HTTP and WebSocket.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;

//! # reactor-gateway
//!
//! Dashboard-facing surface: the WebSocket stats broadcast and the
//! read-only stats API, plus the process wiring that runs the reaction
//! pipeline behind them.

pub mod broadcast;
pub mod connection;
pub mod extractors;
pub mod handlers;
pub mod protocol;
pub mod response;
pub mod server;

pub use server::{run, Gateway, Stores};

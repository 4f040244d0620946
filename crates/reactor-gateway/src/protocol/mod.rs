//! Push protocol
//!
//! Server-to-client messages of the dashboard socket.

mod messages;

pub use messages::{PushMessage, PushType};

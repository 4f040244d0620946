//! Database models
//!
//! Row shapes with SQLx `FromRow` derives.

mod outcome;
mod policy;

pub use outcome::{ChatCountModel, EmojiCountModel, HourlyCountModel};
pub use policy::{ChatPolicyModel, ChatTitleModel};

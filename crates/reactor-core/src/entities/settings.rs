//! Bot settings - global tunables owned by the administration surface

use serde::{Deserialize, Serialize};

/// Global bot settings
///
/// Missing fields in a stored document fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Global auto-react switch
    pub auto_react: bool,
    pub default_emojis: Vec<String>,
    pub default_delay_min: u32,
    pub default_delay_max: u32,
    /// Retry budget of the dispatcher
    pub max_retries: u32,
    /// Upper bound of the exponential backoff, in seconds
    pub retry_delay: u32,
    /// Factor applied to a platform flood-wait duration
    pub flood_wait_multiplier: f64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            auto_react: true,
            default_emojis: ["❤️", "🔥", "👍", "😍", "✨"]
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
            default_delay_min: 1,
            default_delay_max: 5,
            max_retries: 3,
            retry_delay: 60,
            flood_wait_multiplier: 1.5,
        }
    }
}

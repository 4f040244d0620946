//! In-memory SettingsRepository

use async_trait::async_trait;
use parking_lot::RwLock;

use reactor_core::entities::BotSettings;
use reactor_core::traits::{RepoResult, SettingsRepository};

/// Settings holder; empty until [`set`](Self::set) is called
#[derive(Debug, Default)]
pub struct MemorySettingsRepository {
    settings: RwLock<Option<BotSettings>>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BotSettings) -> Self {
        Self {
            settings: RwLock::new(Some(settings)),
        }
    }

    pub fn set(&self, settings: BotSettings) {
        *self.settings.write() = Some(settings);
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn bot_settings(&self) -> RepoResult<Option<BotSettings>> {
        Ok(self.settings.read().clone())
    }
}

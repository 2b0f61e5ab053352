use std::sync::Arc;

use wordhoard_types::UserSettings;

use crate::error::StoreError;
use crate::storage::{SETTINGS_KEY, Storage};

/// Persistence for the user settings object. Missing storage yields the
/// defaults rather than an error.
pub struct SettingsStore {
    storage: Arc<dyn Storage>,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn load(&self) -> Result<UserSettings, StoreError> {
        let raw = self.storage.get(SETTINGS_KEY).await?;
        Ok(match raw {
            Some(value) => serde_json::from_value(value)?,
            None => UserSettings::default(),
        })
    }

    pub async fn save(&self, settings: &UserSettings) -> Result<(), StoreError> {
        let value = serde_json::to_value(settings)?;
        self.storage.set(SETTINGS_KEY, value).await
    }
}

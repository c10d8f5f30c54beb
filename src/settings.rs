use crate::error::{SettingsError, StorageError};
use crate::models::{Settings, SettingsPatch};
use crate::storage::{KeyValueStore, SETTINGS_KEY};

#[derive(Debug, Default)]
pub struct SettingsStore {
    current: Settings,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self { current: settings }
    }

    pub fn get(&self) -> &Settings {
        &self.current
    }

    /// Merges `patch` over the current settings and returns the result.
    pub fn update(&mut self, patch: &SettingsPatch) -> Settings {
        self.current.apply(patch);
        self.current.clone()
    }
}

/// Validates a partial update coming from outside the typed API.
/// Values outside an enum's domain are rejected instead of stored.
pub fn parse_patch(json: &str) -> Result<SettingsPatch, SettingsError> {
    Ok(serde_json::from_str(json)?)
}

/// Loads stored settings merged over the defaults.
/// Missing or unknown keys keep defaults; an unparsable record yields an error.
pub fn load_settings(store: &dyn KeyValueStore) -> Result<Settings, StorageError> {
    let mut settings = Settings::default();
    if let Some(raw) = store.get(SETTINGS_KEY)? {
        let patch: SettingsPatch =
            serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
                key: SETTINGS_KEY.to_string(),
                source,
            })?;
        settings.apply(&patch);
    }
    Ok(settings)
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), StorageError> {
    let json = serde_json::to_string(settings)?;
    store.set(SETTINGS_KEY, &json)
}

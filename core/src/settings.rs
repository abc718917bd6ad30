//! Persisted widget settings: the API credential and the target data source.
//!
//! Settings are loaded once at startup through a `KeyValueStore`, handed to the
//! controller, and written back only when the user saves the settings form.

use std::collections::HashMap;
use std::fmt;

use crate::error::SettingsError;

/// Storage key of the bearer credential.
pub const API_KEY_KEY: &str = "notion_api_key";
/// Storage key of the data source id.
pub const DATA_SOURCE_KEY: &str = "notion_database_id";

/// Simple string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// In-memory store, used by tests and as a fallback when no file is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub data_source_id: String,
}

impl Settings {
    /// Builds settings from form input, trimming both values.
    pub fn new(api_key: &str, data_source_id: &str) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            data_source_id: data_source_id.trim().to_string(),
        }
    }

    /// Missing keys read as empty strings.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, SettingsError> {
        Ok(Self {
            api_key: store.get(API_KEY_KEY)?.unwrap_or_default(),
            data_source_id: store.get(DATA_SOURCE_KEY)?.unwrap_or_default(),
        })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), SettingsError> {
        store.set(API_KEY_KEY, &self.api_key)?;
        store.set(DATA_SOURCE_KEY, &self.data_source_id)
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.data_source_id.trim().is_empty()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("data_source_id", &self.data_source_id)
            .finish()
    }
}

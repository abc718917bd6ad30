//! Settings persisted as a flat JSON object on disk.
//!
//! A missing file is an empty store. Every `set` rewrites the whole file
//! through a uniquely named temporary sibling that is synced and then
//! persisted over the target, so readers only ever see a complete file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use quicknote_core::{KeyValueStore, SettingsError};
use tempfile::NamedTempFile;

pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| SettingsError::Decode(format!("{}: {e}", path.display())))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no settings file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(&self.values)
            .map_err(|e| SettingsError::Encode(e.to_string()))?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).map_err(|e| SettingsError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicknote_core::Settings;

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get("notion_api_key").unwrap(), None);
        assert!(!Settings::load(&store).unwrap().is_configured());
    }

    #[test]
    fn saved_settings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = FileStore::open(&path).unwrap();
        Settings::new("secret_abc", "db1").save(&mut store).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(Settings::load(&reopened).unwrap(), Settings::new("secret_abc", "db1"));
    }

    #[test]
    fn writes_leave_only_the_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("notion_api_key", "secret_abc").unwrap();
        store.set("notion_database_id", "db1").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("settings.json")]);
    }

    #[test]
    fn interleaved_writers_never_publish_a_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut first = FileStore::open(&path).unwrap();
        let mut second = FileStore::open(&path).unwrap();
        for round in 0..20 {
            first.set("notion_api_key", &format!("key-{round}")).unwrap();
            second.set("notion_database_id", &format!("db-{round}")).unwrap();
            let reopened = FileStore::open(&path).unwrap();
            assert_eq!(
                reopened.get("notion_database_id").unwrap(),
                Some(format!("db-{round}"))
            );
        }
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).err().unwrap();
        assert!(matches!(err, SettingsError::Decode(_)));
    }
}

//! Client-local persistence
//!
//! JSON blobs under fixed keys, loaded once at startup and rewritten whole
//! on every mutation — the same contract the web client has with
//! localStorage, expressed as files in an app directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::journal::{DailyLog, UserSettings};

pub const LOGS_KEY: &str = "rokubun_logs";
pub const SETTINGS_KEY: &str = "rokubun_settings";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store blob is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Whole-blob JSON store keyed by name.
#[derive(Debug, Clone)]
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    /// Open (and create) the store directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load a blob; `None` when the key has never been written.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Rewrite a blob in full.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        fs::write(self.path_for(key), raw)?;
        Ok(())
    }
}

/// Diary-shaped view over the blob store.
#[derive(Debug, Clone)]
pub struct JournalStore {
    blobs: BlobStore,
}

impl JournalStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            blobs: BlobStore::open(dir)?,
        })
    }

    pub fn load_logs(&self) -> Result<Vec<DailyLog>, StoreError> {
        Ok(self.blobs.load(LOGS_KEY)?.unwrap_or_default())
    }

    pub fn save_logs(&self, logs: &[DailyLog]) -> Result<(), StoreError> {
        self.blobs.save(LOGS_KEY, &logs)
    }

    pub fn load_settings(&self) -> Result<UserSettings, StoreError> {
        Ok(self.blobs.load(SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &UserSettings) -> Result<(), StoreError> {
        self.blobs.save(SETTINGS_KEY, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::journal::Personality;

    #[test]
    fn missing_keys_read_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JournalStore::open(dir.path()).unwrap();

        assert!(store.load_logs().unwrap().is_empty());
        assert_eq!(
            store.load_settings().unwrap().personality,
            Personality::Philosopher
        );
    }

    #[test]
    fn logs_rewrite_whole_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = JournalStore::open(dir.path()).unwrap();

        let first = vec![DailyLog {
            date: "2026-08-06".to_string(),
            ..DailyLog::default()
        }];
        store.save_logs(&first).unwrap();

        let second = vec![DailyLog {
            date: "2026-08-07".to_string(),
            ..DailyLog::default()
        }];
        store.save_logs(&second).unwrap();

        let loaded = store.load_logs().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].date, "2026-08-07");
    }

    #[test]
    fn settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JournalStore::open(dir.path()).unwrap();

        store
            .save_settings(&UserSettings {
                personality: Personality::Jinnai,
            })
            .unwrap();
        assert_eq!(
            store.load_settings().unwrap().personality,
            Personality::Jinnai
        );
    }

    #[test]
    fn corrupt_blob_is_an_error_not_a_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JournalStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("rokubun_logs.json"), "not json").unwrap();

        assert!(matches!(
            store.load_logs(),
            Err(StoreError::Serde(_))
        ));
    }
}

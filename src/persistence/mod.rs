//! Key-value persistence for the best score and settings
//!
//! Values are stored as JSON strings under short keys. Hosts pick a backend:
//! [`MemoryStorage`] for tests and sessions that should not outlive the
//! process, [`FileStorage`] for the native runner.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "best_score";

/// A string key-value store
pub trait Storage: std::fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage, lost on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys in one JSON object on disk
///
/// Writes go to a sibling `.tmp` file which is then renamed over the save.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Load and decode a JSON value; `None` if the key is absent
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>, StorageError> {
    match storage.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and store a JSON value
pub fn save<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

/// Best score on record, 0 if none
pub fn load_best_score(storage: &dyn Storage) -> Result<u32, StorageError> {
    Ok(load(storage, BEST_SCORE_KEY)?.unwrap_or(0))
}

pub fn save_best_score(storage: &mut dyn Storage, best: u32) -> Result<(), StorageError> {
    save(storage, BEST_SCORE_KEY, &best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rocket_gap_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_best_score() {
        let mut storage = MemoryStorage::new();
        assert_eq!(load_best_score(&storage).unwrap(), 0);
        save_best_score(&mut storage, 17).unwrap();
        assert_eq!(load_best_score(&storage).unwrap(), 17);
    }

    #[test]
    fn test_malformed_value() {
        let mut storage = MemoryStorage::new();
        storage.set(BEST_SCORE_KEY, "not a number").unwrap();
        assert!(matches!(load_best_score(&storage), Err(StorageError::Malformed(_))));
    }

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let path = temp_path("keys");
        let _ = fs::remove_file(&path);
        let mut storage = FileStorage::new(&path);

        assert_eq!(storage.get("missing").unwrap(), None);
        storage.set("a", "1").unwrap();
        save_best_score(&mut storage, 42).unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(load_best_score(&reopened).unwrap(), 42);
        assert!(!path.with_extension("tmp").exists());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ truncated").unwrap();
        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get("a"), Err(StorageError::Malformed(_))));
        fs::remove_file(&path).unwrap();
    }
}

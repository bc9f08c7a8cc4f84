//! JSON key/value file shared by the watchlist and timer settings.
//!
//! The file is a single JSON object. Each top-level key holds one list or
//! settings blob, mirroring the keys the website keeps in `localStorage`.
//! Reads never fail: a missing file is empty and corrupt data is logged and
//! treated as empty. Writes take an exclusive lock on a sibling lock file,
//! re-read the object, apply the change and atomically replace the file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::paths;

/// Errors raised while writing the storage file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Handle to a storage file on disk
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
    lock_path: PathBuf,
}

impl Storage {
    /// Storage backed by `path`; the file is created on first write
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = paths::lock_file_for(&path);
        Self { path, lock_path }
    }

    /// Storage at `$FLOWSTATE_HOME/storage.json`
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::open(paths::storage_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode one key, `None` if absent or corrupt
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.read_object().remove(key)?;
        decode_value(key, value)
    }

    /// Keys currently present in the file
    pub fn keys(&self) -> Vec<String> {
        self.read_object().keys().cloned().collect()
    }

    /// Replace the value stored under `key`
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_value(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.with_lock(|object| {
            object.insert(key.to_string(), encoded);
            Ok(())
        })
    }

    /// Delete `key`, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.with_lock(|object| Ok(object.remove(key).is_some()))
    }

    /// Read-modify-write one key under the file lock.
    ///
    /// An absent value starts from `T::default()`. A value that fails to
    /// decode is moved to `<key>.corrupt` before starting from the default.
    pub fn update<T, R, F>(&self, key: &str, f: F) -> Result<R, StorageError>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> R,
    {
        self.with_lock(|object| {
            let mut current: T = match object.remove(key) {
                None => T::default(),
                Some(raw) => match serde_json::from_value(raw.clone()) {
                    Ok(v) => v,
                    Err(e) => {
                        let backup = corrupt_key(key);
                        warn!(key, backup = %backup, error = %e, "Corrupt stored value, moving aside");
                        object.insert(backup, raw);
                        T::default()
                    }
                },
            };
            let result = f(&mut current);
            let encoded =
                serde_json::to_value(&current).map_err(|source| StorageError::Serialize {
                    key: key.to_string(),
                    source,
                })?;
            object.insert(key.to_string(), encoded);
            Ok(result)
        })
    }

    // ========================================================================
    // File handling
    // ========================================================================

    fn read_object(&self) -> Map<String, Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read storage file");
                return Map::new();
            }
        };

        if content.trim().is_empty() {
            return Map::new();
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                warn!(path = %self.path.display(), "Storage file is not a JSON object, ignoring");
                Map::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt storage file, ignoring");
                Map::new()
            }
        }
    }

    fn with_lock<R>(
        &self,
        f: impl FnOnce(&mut Map<String, Value>) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|source| StorageError::Io {
                path: self.lock_path.clone(),
                source,
            })?;
        lock.lock_exclusive().map_err(|source| StorageError::Lock {
            path: self.lock_path.clone(),
            source,
        })?;

        let mut object = self.read_object();
        let result = f(&mut object).and_then(|r| {
            self.write_object(&object)?;
            Ok(r)
        });

        if let Err(e) = FileExt::unlock(&lock) {
            debug!(path = %self.lock_path.display(), error = %e, "Failed to release storage lock");
        }
        result
    }

    fn write_object(&self, object: &Map<String, Value>) -> Result<(), StorageError> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };
        let content = serde_json::to_string_pretty(object).map_err(|source| {
            StorageError::Serialize {
                key: "*".to_string(),
                source,
            }
        })?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!(path = %self.path.display(), keys = object.len(), "Storage written");
        Ok(())
    }
}

/// Key a corrupt value is moved to on write
pub fn corrupt_key(key: &str) -> String {
    format!("{}.corrupt", key)
}

fn decode_value<T: DeserializeOwned>(key: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, error = %e, "Corrupt stored value, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> Storage {
        Storage::open(dir.path().join("storage.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = storage(&dir);
        assert!(store.get::<Vec<String>>("anything").is_none());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let dir = TempDir::new().unwrap();
        let store = storage(&dir);
        store.set("list", &vec!["a", "b"]).unwrap();

        let list: Vec<String> = store.get("list").unwrap();
        assert_eq!(list, vec!["a", "b"]);
        assert!(dir.path().join("storage.json.lock").exists());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = storage(&dir);
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.get::<Vec<String>>("list").is_none());

        // Writing replaces the corrupt file
        store.set("list", &vec!["x"]).unwrap();
        assert_eq!(store.get::<Vec<String>>("list").unwrap(), vec!["x"]);
    }

    #[test]
    fn test_corrupt_key_leaves_others_readable() {
        let dir = TempDir::new().unwrap();
        let store = storage(&dir);
        fs::write(store.path(), r#"{"list": 5, "other": ["ok"]}"#).unwrap();

        assert!(store.get::<Vec<String>>("list").is_none());
        assert_eq!(store.get::<Vec<String>>("other").unwrap(), vec!["ok"]);
    }

    #[test]
    fn test_update_starts_from_default() {
        let dir = TempDir::new().unwrap();
        let store = storage(&dir);

        let len = store
            .update("list", |list: &mut Vec<u32>| {
                list.push(7);
                list.len()
            })
            .unwrap();
        assert_eq!(len, 1);
        assert_eq!(store.get::<Vec<u32>>("list").unwrap(), vec![7]);
    }

    #[test]
    fn test_update_moves_corrupt_value_aside() {
        let dir = TempDir::new().unwrap();
        let store = storage(&dir);
        fs::write(store.path(), r#"{"list": {"not": "a list"}}"#).unwrap();

        store
            .update("list", |list: &mut Vec<u32>| list.push(1))
            .unwrap();

        assert_eq!(store.get::<Vec<u32>>("list").unwrap(), vec![1]);
        let kept: Value = store.get(&corrupt_key("list")).unwrap();
        assert_eq!(kept, serde_json::json!({"not": "a list"}));
    }

    #[test]
    fn test_remove_key() {
        let dir = TempDir::new().unwrap();
        let store = storage(&dir);
        store.set("a", &1).unwrap();

        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert!(store.get::<u32>("a").is_none());
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = Storage::open(dir.path().join("nested/home/storage.json"));
        store.set("k", &true).unwrap();
        assert_eq!(store.get::<bool>("k"), Some(true));
    }
}

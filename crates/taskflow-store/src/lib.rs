//! Key-value storage backends for taskflow.
//!
//! Values are opaque strings addressed by short keys, mirroring what a browser's
//! local storage offers. [`FileStore`] keeps one file per key on disk and
//! [`MemoryStore`] keeps everything in process.

/// Store error type.
pub mod error;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use tracing::{debug, info};

pub use error::StoreError;

const VALUE_EXTENSION: &str = "json";

/// Minimal string key-value interface.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns an error when the key is invalid or the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error when the key is invalid or the write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Missing keys are not an error.
    ///
    /// # Errors
    /// Returns an error when the key is invalid or the delete fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reject keys that are empty, hidden, or could escape the store directory.
///
/// # Errors
/// Returns [`StoreError::InvalidKey`] for unusable keys.
pub fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}

/// Directory-backed store: each key lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the store directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StoreError::io(&dir, source))?;
        debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// Directory holding the values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing `key`.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for unusable keys.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StoreError::NotUtf8 { key: key.to_owned() }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // Write beside the target and rename so readers never see a partial value.
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|source| StoreError::io(&self.dir, source))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|source| StoreError::io(tmp.path(), source))?;
        tmp.persist(&path)
            .map_err(|err| StoreError::io(&path, err.error))?;
        info!(key, bytes = value.len(), path = %path.display(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(key, path = %path.display(), "Removed value");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        let values = self.values.lock().map_err(|_| StoreError::LockError)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let mut values = self.values.lock().map_err(|_| StoreError::LockError)?;
        values.insert(key.to_owned(), value.to_owned());
        debug!(key, bytes = value.len(), "Stored value in memory");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let mut values = self.values.lock().map_err(|_| StoreError::LockError)?;
        values.remove(key);
        Ok(())
    }
}

impl<S> KeyValueStore for &S
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (*self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (*self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (*self).remove(key)
    }
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn check_key_rejects_path_tricks() {
        assert!(check_key("todoTasks").is_ok());
        assert!(check_key("tasks-v2.backup").is_ok());
        assert!(matches!(check_key(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(check_key("../escape"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(check_key(".hidden"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(check_key("a/b"), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn memory_store_roundtrip() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get("todoTasks")?, None);
        store.set("todoTasks", "[]")?;
        assert_eq!(store.get("todoTasks")?.as_deref(), Some("[]"));
        store.set("todoTasks", "[1]")?;
        assert_eq!(store.get("todoTasks")?.as_deref(), Some("[1]"));
        store.remove("todoTasks")?;
        assert_eq!(store.get("todoTasks")?, None);
        Ok(())
    }

    #[test]
    fn memory_store_with_entries_is_seeded() -> Result<()> {
        let store = MemoryStore::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(store.get("b")?.as_deref(), Some("2"));
        Ok(())
    }

    #[test]
    fn shared_references_delegate() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let by_ref: &MemoryStore = &store;
        by_ref.set("k", "v")?;
        assert_eq!(KeyValueStore::get(&store, "k")?.as_deref(), Some("v"));
        Ok(())
    }
}

//! Per-device key/value storage, separate from the catalog store.
//!
//! Holds values that belong to this installation only, such as the
//! generated viewer identity.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LocalStoreError {
    #[error("local store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("local store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("local store lock poisoned")]
    Poisoned,
}

pub trait LocalStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;
}

/// A JSON object on disk. Writes go to a sibling temp file that is then renamed
/// over the original, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileLocalStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Store file `local_store.json` inside `dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError::Io` if the directory cannot be created.
    pub fn in_dir(dir: &Path) -> Result<Self, LocalStoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self::new(dir.join("local_store.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, LocalStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| LocalStoreError::Poisoned)?;

        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());
        let encoded = serde_json::to_string_pretty(&entries)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLocalStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryLocalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for InMemoryLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        let guard = self.entries.lock().map_err(|_| LocalStoreError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let mut guard = self.entries.lock().map_err(|_| LocalStoreError::Poisoned)?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

//! Persisted key-value storage and the access token store built on it.
//!
//! The only thing the dashboard persists is the access token, under a
//! single fixed key. The backing storage is a trait so the session can be
//! driven against an in-memory map in tests and a JSON file otherwise.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::{config, error::StorageError};

/// Key under which the access token is persisted.
pub const TOKEN_KEY: &str = "spotify_access_token";

/// A string-to-string store that survives process restarts.
pub trait KeyValueStorage: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// JSON object file, by default `<data_local_dir>/sporlstats/storage.json`.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        config::data_dir().join("storage.json")
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.is_file() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// In-process storage. Clones share the same entries, so a test can keep a
/// handle and inspect what the session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.lock().insert(key.to_string(), value.to_string());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // a poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Owner of the persisted access token.
///
/// The backing storage is read once, on the first [`TokenStore::load`];
/// afterwards the in-memory copy is authoritative and every write goes
/// through to storage before it becomes visible. No expiry is tracked: an
/// expired token looks exactly like a valid one until an API call fails.
pub struct TokenStore {
    storage: Box<dyn KeyValueStorage>,
    token: Option<String>,
    hydrated: bool,
}

impl TokenStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            token: None,
            hydrated: false,
        }
    }

    pub fn load(&mut self) -> Option<String> {
        if !self.hydrated {
            self.hydrated = true;
            self.token = match self.storage.get(TOKEN_KEY) {
                Ok(token) => token.filter(|t| !t.is_empty()),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "failed to read persisted token, treating as logged out"
                    );
                    None
                }
            };
        }
        self.token.clone()
    }

    pub fn save(&mut self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.token = Some(token.to_string());
        self.hydrated = true;
        Ok(())
    }

    /// Forgets the token in memory even if removing it from storage fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.token = None;
        self.hydrated = true;
        self.storage.remove(TOKEN_KEY)
    }
}

//! Local persistence of researched profiles
//!
//! The store is a single JSON object mapping lowercase queries to results.
//! It is a cache, so read and write failures are logged and never surface
//! to the caller: a missing or corrupt file reads as empty, and a failed
//! write leaves the previous contents in place.

use crate::model::{AgentResult, Store, store_key};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Storage for saved results
pub trait ProfileStore: Send + Sync {
    /// All saved results; empty if nothing could be read
    fn get_all(&self) -> Store;

    /// Save `result` under the lowercase form of `key`, replacing any
    /// previous entry
    fn save(&self, key: &str, result: &AgentResult);
}

/// Store backed by one JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Default store file
    pub const DEFAULT_FILE: &'static str = "ai_company_agent_db.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Store {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Store::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Failed to read store");
                return Store::new();
            }
        };

        if content.trim().is_empty() {
            return Store::new();
        }

        serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "Failed to parse store, starting empty"
            );
            Store::new()
        })
    }

    fn write(&self, store: &Store) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(store).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, json)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

impl ProfileStore for JsonFileStore {
    fn get_all(&self) -> Store {
        self.read()
    }

    fn save(&self, key: &str, result: &AgentResult) {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut store = self.read();
        store.insert(store_key(key), result.clone());

        match self.write(&store) {
            Ok(()) => tracing::debug!(key = %store_key(key), entries = store.len(), "Saved result"),
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "Failed to save store");
            }
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Store>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `entries`
    pub fn with_entries(entries: Store) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl ProfileStore for MemoryStore {
    fn get_all(&self) -> Store {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn save(&self, key: &str, result: &AgentResult) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(store_key(key), result.clone());
        }
    }
}

//! # Encounter Stores
//!
//! Persistence seam for ledger snapshots. Loading is asynchronous; saving is
//! fire-and-forget, so store implementations report their own failures.

use crate::{EncounterSnapshot, WarbandError, WarbandResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Key/value store holding encounter snapshots.
#[async_trait]
pub trait EncounterStore: Send + Sync {
    /// Loads the snapshot stored under `key`, if any.
    async fn get(&self, key: &str) -> WarbandResult<Option<EncounterSnapshot>>;

    /// Stores a snapshot under `key`. Never fails from the caller's view.
    fn set(&self, key: &str, snapshot: &EncounterSnapshot);
}

/// In-process store, mostly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, EncounterSnapshot>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one snapshot.
    pub fn with_snapshot(key: impl Into<String>, snapshot: EncounterSnapshot) -> Self {
        let store = Self::new();
        store.lock().insert(key.into(), snapshot);
        store
    }

    /// Returns the snapshot currently stored under `key`.
    pub fn snapshot(&self, key: &str) -> Option<EncounterSnapshot> {
        self.lock().get(key).cloned()
    }

    /// Number of `set` calls received so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, EncounterSnapshot>> {
        // A panicked writer leaves a whole snapshot behind, never a partial one
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EncounterStore for MemoryStore {
    async fn get(&self, key: &str) -> WarbandResult<Option<EncounterSnapshot>> {
        Ok(self.snapshot(key))
    }

    fn set(&self, key: &str, snapshot: &EncounterSnapshot) {
        self.lock().insert(key.to_string(), snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store writing one pretty-printed JSON file per key into a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a key is stored in.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write(&self, key: &str, snapshot: &EncounterSnapshot) -> WarbandResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = snapshot.save_to_json()?;
        std::fs::write(self.path_for(key), json)?;
        Ok(())
    }
}

#[async_trait]
impl EncounterStore for JsonFileStore {
    async fn get(&self, key: &str) -> WarbandResult<Option<EncounterSnapshot>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(json) => EncounterSnapshot::load_from_json(&json).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(WarbandError::from(err)),
        }
    }

    fn set(&self, key: &str, snapshot: &EncounterSnapshot) {
        if let Err(err) = self.write(key, snapshot) {
            log::warn!(
                "Failed to save encounter {} to {}: {}",
                key,
                self.dir.display(),
                err
            );
        }
    }
}

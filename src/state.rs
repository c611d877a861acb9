//! Persisted key-value state shared between the restore and save phases
//!
//! The two phases run as separate invocations and share no memory; the
//! only channel between them is this flat map. Restore writes, save reads,
//! nothing else touches it.

use crate::error::{StashError, StashResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;

/// State slot holding the key computed at restore time
pub const STATE_CACHE_PRIMARY_KEY: &str = "cache-primary-key";

/// State slot holding the key the artifact store actually matched
pub const STATE_CACHE_MATCHED_KEY: &str = "cache-matched-key";

/// Flat key-value store surviving between the two phases of a job
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a slot; `None` when it was never written
    async fn get(&self, name: &str) -> StashResult<Option<String>>;

    /// Write a slot (idempotent to retry)
    async fn set(&self, name: &str, value: &str) -> StashResult<()>;
}

/// State store backed by a JSON file
///
/// The file is created on first write; a missing file reads as empty.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_map(&self) -> StashResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StashError::io(format!("reading state file {}", self.path.display()), e))?;
        let map = serde_json::from_str(&content)?;
        Ok(map)
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> StashResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StashError::io("creating state directory", e))?;
        }
        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| StashError::io(format!("writing state file {}", self.path.display()), e))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, name: &str) -> StashResult<Option<String>> {
        Ok(self.read_map().await?.remove(name))
    }

    async fn set(&self, name: &str, value: &str) -> StashResult<()> {
        let mut map = self.read_map().await?;
        map.insert(name.to_string(), value.to_string());
        self.write_map(&map).await
    }
}

/// In-memory state store for tests
#[derive(Default)]
pub struct MemoryStateStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot synchronously (test setup convenience)
    pub fn preset(&self, name: &str, value: &str) {
        self.map
            .lock()
            .expect("state map lock")
            .insert(name.to_string(), value.to_string());
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, name: &str) -> StashResult<Option<String>> {
        Ok(self.map.lock().expect("state map lock").get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> StashResult<()> {
        self.map
            .lock()
            .expect("state map lock")
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

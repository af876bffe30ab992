//! Key-value document stores holding the persisted blob.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CenterError, CenterResult};

/// A remote key-value document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches the document stored under `key`, if any.
    async fn get(&self, key: &str) -> CenterResult<Option<Value>>;

    /// Stores `blob` under `key`, replacing any previous document.
    async fn upsert(&self, key: &str, blob: &Value) -> CenterResult<()>;
}

/// A document store kept in memory.
///
/// It can be switched offline to simulate an unreachable remote.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Value>>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful upserts so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> CenterResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CenterError::Persistence {
                message: "remote store unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, key: &str) -> CenterResult<Option<Value>> {
        self.check_online()?;
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn upsert(&self, key: &str, blob: &Value) -> CenterResult<()> {
        self.check_online()?;
        self.documents
            .write()
            .await
            .insert(key.to_string(), blob.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A document store writing one JSON file per key into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryDocumentStore {
    dir: PathBuf,
}

impl DirectoryDocumentStore {
    /// Uses `dir` as the store; it is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl DocumentStore for DirectoryDocumentStore {
    async fn get(&self, key: &str) -> CenterResult<Option<Value>> {
        read_json(&self.path_for(key)).await
    }

    async fn upsert(&self, key: &str, blob: &Value) -> CenterResult<()> {
        write_json_atomic(&self.path_for(key), blob).await
    }
}

/// Reads a JSON file, treating a missing file as absent.
pub(crate) async fn read_json(path: &Path) -> CenterResult<Option<Value>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Writes JSON to a temp file and renames it over `path`.
///
/// Each write uses its own temp file, so concurrent writers never share one.
pub(crate) async fn write_json_atomic(path: &Path, blob: &Value) -> CenterResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
    tokio::fs::write(&temp_path, serde_json::to_vec(blob)?).await?;
    tokio::fs::rename(&temp_path, path).await?;
    debug!(path = %path.display(), "Wrote JSON document");
    Ok(())
}

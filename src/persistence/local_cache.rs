//! The local durable cache used as a fallback copy of the blob.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::document_store::{read_json, write_json_atomic};
use crate::error::CenterResult;

/// A local key-value cache of blobs.
#[async_trait]
pub trait LocalCache: Send + Sync {
    /// Returns the cached blob under `key`, if any.
    async fn get(&self, key: &str) -> CenterResult<Option<Value>>;

    /// Caches `blob` under `key`.
    async fn set(&self, key: &str, blob: &Value) -> CenterResult<()>;
}

/// A cache that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalCache for MemoryCache {
    async fn get(&self, key: &str) -> CenterResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, blob: &Value) -> CenterResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), blob.clone());
        Ok(())
    }
}

/// A cache storing each key as `<dir>/<key>.json`, written atomically.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    /// Uses `dir` for the cache files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl LocalCache for JsonFileCache {
    async fn get(&self, key: &str) -> CenterResult<Option<Value>> {
        read_json(&self.path_for(key)).await
    }

    async fn set(&self, key: &str, blob: &Value) -> CenterResult<()> {
        write_json_atomic(&self.path_for(key), blob).await
    }
}

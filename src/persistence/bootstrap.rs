//! Startup load order: remote, then local cache, then seed data.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::document_store::DocumentStore;
use super::local_cache::LocalCache;
use crate::error::CenterResult;
use crate::store::CenterStore;

/// Where the startup data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    /// The remote document store.
    Remote,
    /// The local cache.
    Cache,
    /// The bundled sample data.
    Seed,
}

/// The loaded store and its origin.
#[derive(Debug, Clone)]
pub struct Bootstrapped {
    /// The data to start with.
    pub store: CenterStore,
    /// Where it came from.
    pub source: LoadSource,
}

/// Keys the blob is stored under.
#[derive(Debug, Clone, Copy)]
pub struct BlobKeys<'a> {
    /// Record id in the remote store.
    pub record_id: &'a str,
    /// Key in the local cache.
    pub cache_key: &'a str,
}

/// Loads the initial data set.
///
/// The remote store is tried first. A failed fetch, a missing document, an
/// empty object or a blob that does not parse all count as "no data", and
/// the local cache is tried next the same way. The seed is used last.
pub async fn bootstrap(
    remote: Option<&dyn DocumentStore>,
    cache: &dyn LocalCache,
    keys: BlobKeys<'_>,
    seed: &CenterStore,
) -> Bootstrapped {
    if let Some(remote) = remote {
        if let Some(store) = usable("remote", remote.get(keys.record_id).await) {
            info!(record_id = %keys.record_id, "Loaded data from remote store");
            return Bootstrapped {
                store,
                source: LoadSource::Remote,
            };
        }
    } else {
        info!("No remote store configured");
    }

    if let Some(store) = usable("cache", cache.get(keys.cache_key).await) {
        info!(cache_key = %keys.cache_key, "Loaded data from local cache");
        return Bootstrapped {
            store,
            source: LoadSource::Cache,
        };
    }

    info!("No saved data found; starting from seed data");
    Bootstrapped {
        store: seed.clone(),
        source: LoadSource::Seed,
    }
}

fn usable(origin: &str, fetched: CenterResult<Option<Value>>) -> Option<CenterStore> {
    let blob = match fetched {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(err) => {
            warn!(origin, error = %err, "Could not fetch saved data");
            return None;
        }
    };
    if blob.as_object().is_none_or(|o| o.is_empty()) {
        return None;
    }
    match CenterStore::from_json(blob) {
        Ok(store) => Some(store),
        Err(err) => {
            warn!(origin, error = %err, "Saved data does not parse");
            None
        }
    }
}

//! Application state for the classroom ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::error::CenterResult;
use crate::persistence::LoadSource;
use crate::store::CenterStore;
use crate::sync::SyncScheduler;

/// Shared application state.
///
/// Holds the configuration, the single in-memory store and the sync
/// scheduler. Mutations go through [`AppState::mutate`], which hands the new
/// blob to the scheduler once the change has been committed.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<RwLock<CenterStore>>,
    sync: Arc<SyncScheduler>,
    load_source: LoadSource,
}

impl AppState {
    /// Creates the state from loaded configuration and data.
    pub fn new(
        config: ConfigLoader,
        store: CenterStore,
        sync: SyncScheduler,
        load_source: LoadSource,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
            sync: Arc::new(sync),
            load_source,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the sync scheduler.
    pub fn sync(&self) -> &SyncScheduler {
        &self.sync
    }

    /// Where the data was loaded from at startup.
    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Runs a read-only query against the store.
    pub async fn read<T>(&self, query: impl FnOnce(&CenterStore, &ConfigLoader) -> T) -> T {
        let store = self.store.read().await;
        query(&store, &self.config)
    }

    /// Applies a mutation and schedules a sync if it succeeded.
    ///
    /// The blob is handed to the scheduler before the write lock is
    /// released, so blobs reach it in commit order.
    pub async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut CenterStore, &ConfigLoader) -> CenterResult<T>,
    ) -> CenterResult<T> {
        let mut store = self.store.write().await;
        let value = change(&mut store, &self.config)?;
        let blob = store.to_json()?;
        self.sync.schedule(blob).await;
        Ok(value)
    }

    /// A copy of the current store.
    pub async fn snapshot(&self) -> CenterStore {
        self.store.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CenterConfig, CenterMetadata, FinanceConfig, ServerSettings, SyncSettings};
    use crate::persistence::testing::SlowFirstWriteCache;
    use crate::persistence::{DocumentStore, InMemoryDocumentStore, LocalCache, MemoryCache};
    use crate::store::StudentDraft;
    use std::time::Duration;

    fn make_state(cache: Arc<MemoryCache>) -> AppState {
        make_state_with(cache, None)
    }

    fn make_state_with(
        cache: Arc<dyn LocalCache>,
        remote: Option<Arc<dyn DocumentStore>>,
    ) -> AppState {
        let center = CenterConfig {
            center: CenterMetadata {
                code: "KAT".to_string(),
                name: "KAT Education".to_string(),
                record_id: "kat_edu_master_data".to_string(),
            },
            sync: SyncSettings {
                debounce_ms: 2000,
                cache_dir: "./data/cache".into(),
                cache_key: "KAT_EDU_ALL_DATA".to_string(),
                remote_dir: None,
                export_dir: "./data/exports".into(),
                export_prefix: "KAT_EDU_BACKUP".to_string(),
            },
            server: ServerSettings::default(),
        };
        let config = ConfigLoader::from_parts(center, FinanceConfig::default(), CenterStore::default());
        let sync = SyncScheduler::new(
            remote,
            cache,
            "kat_edu_master_data",
            "KAT_EDU_ALL_DATA",
            Duration::from_millis(2000),
        );
        AppState::new(config, CenterStore::default(), sync, LoadSource::Seed)
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_successful_mutation_reaches_cache() {
        let cache = Arc::new(MemoryCache::new());
        let state = make_state(cache.clone());
        state
            .mutate(|store, _| {
                store.create_student(StudentDraft {
                    name: "Le C".to_string(),
                    ..Default::default()
                })
            })
            .await
            .unwrap();

        let blob = cache.get("KAT_EDU_ALL_DATA").await.unwrap().unwrap();
        assert_eq!(blob["students"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_schedules_nothing() {
        let cache = Arc::new(MemoryCache::new());
        let state = make_state(cache.clone());
        let result = state
            .mutate(|store, _| store.create_student(StudentDraft::default()))
            .await;
        assert!(result.is_err());
        assert!(cache.get("KAT_EDU_ALL_DATA").await.unwrap().is_none());
        assert!(state.read(|store, _| store.students.is_empty()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_mutations_persist_latest_state() {
        let cache = Arc::new(SlowFirstWriteCache::default());
        let remote = Arc::new(InMemoryDocumentStore::new());
        let state = make_state_with(
            cache.clone(),
            Some(remote.clone() as Arc<dyn DocumentStore>),
        );

        let add = |state: AppState, name: &'static str| {
            tokio::spawn(async move {
                state
                    .mutate(|store, _| {
                        store.create_student(StudentDraft {
                            name: name.to_string(),
                            ..Default::default()
                        })
                    })
                    .await
                    .unwrap();
            })
        };
        let first = add(state.clone(), "Le C");
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = add(state.clone(), "Pham D");
        first.await.unwrap();
        second.await.unwrap();
        state.sync().flush().await;

        let cached = cache.get("KAT_EDU_ALL_DATA").await.unwrap().unwrap();
        assert_eq!(cached["students"].as_array().unwrap().len(), 2);
        let synced = remote.get("kat_edu_master_data").await.unwrap().unwrap();
        assert_eq!(synced["students"].as_array().unwrap().len(), 2);
        assert_eq!(state.read(|store, _| store.students.len()).await, 2);
    }
}

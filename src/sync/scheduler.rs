//! Debounced replication of the blob to the remote store.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SyncSettings;
use crate::persistence::{DocumentStore, LocalCache};

/// State of the remote copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// The last remote write succeeded.
    Synced,
    /// A remote write is in progress.
    Syncing,
    /// The last remote write failed; the next change retries.
    Error,
    /// No remote store is configured.
    Offline,
}

/// Schedules remote writes after a quiet period.
///
/// Every call to [`schedule`](Self::schedule) writes the local cache at once
/// and (re)starts the debounce timer. A pending write is aborted and replaced
/// by the newer one, so a burst of edits produces one remote write carrying
/// the last state. Writes never run concurrently.
///
/// Calls are handled one at a time in the order they arrive: a later blob
/// never reaches the cache or the pending slot before an earlier one.
pub struct SyncScheduler {
    remote: Option<Arc<dyn DocumentStore>>,
    cache: Arc<dyn LocalCache>,
    record_id: String,
    cache_key: String,
    debounce: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    ordering: tokio::sync::Mutex<()>,
    in_flight: Arc<tokio::sync::Mutex<()>>,
    status: Arc<watch::Sender<SyncStatus>>,
}

impl SyncScheduler {
    /// Creates a scheduler. Without a remote store it only maintains the cache.
    pub fn new(
        remote: Option<Arc<dyn DocumentStore>>,
        cache: Arc<dyn LocalCache>,
        record_id: impl Into<String>,
        cache_key: impl Into<String>,
        debounce: Duration,
    ) -> Self {
        let initial = if remote.is_some() {
            SyncStatus::Synced
        } else {
            SyncStatus::Offline
        };
        let (status, _) = watch::channel(initial);
        Self {
            remote,
            cache,
            record_id: record_id.into(),
            cache_key: cache_key.into(),
            debounce,
            pending: Mutex::new(None),
            ordering: tokio::sync::Mutex::new(()),
            in_flight: Arc::new(tokio::sync::Mutex::new(())),
            status: Arc::new(status),
        }
    }

    /// Creates a scheduler from the configured sync settings.
    pub fn from_settings(
        settings: &SyncSettings,
        record_id: &str,
        remote: Option<Arc<dyn DocumentStore>>,
        cache: Arc<dyn LocalCache>,
    ) -> Self {
        Self::new(
            remote,
            cache,
            record_id,
            settings.cache_key.clone(),
            Duration::from_millis(settings.debounce_ms),
        )
    }

    /// Current status.
    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    /// Subscribes to status changes.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Records a new state of the blob.
    ///
    /// Failures are logged and reflected in the status only; they never
    /// reach the caller, whose in-memory change stands.
    pub async fn schedule(&self, blob: Value) {
        let _ordered = self.ordering.lock().await;
        if let Err(err) = self.cache.set(&self.cache_key, &blob).await {
            warn!(cache_key = %self.cache_key, error = %err, "Local cache write failed");
        }

        let Some(remote) = self.remote.clone() else {
            self.status.send_replace(SyncStatus::Offline);
            return;
        };

        let in_flight = Arc::clone(&self.in_flight);
        let status = Arc::clone(&self.status);
        let record_id = self.record_id.clone();
        let debounce = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let _guard = in_flight.lock().await;
            status.send_replace(SyncStatus::Syncing);
            match remote.upsert(&record_id, &blob).await {
                Ok(()) => {
                    status.send_replace(SyncStatus::Synced);
                    info!(record_id = %record_id, "Synced data to remote store");
                }
                Err(err) => {
                    status.send_replace(SyncStatus::Error);
                    warn!(record_id = %record_id, error = %err, "Remote sync failed");
                }
            }
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
            debug!("Superseded pending sync");
        }
    }

    /// Waits for the pending write, if any, to finish.
    pub async fn flush(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            match handle.await {
                Err(err) if !err.is_cancelled() => warn!(error = %err, "Sync task failed"),
                _ => {}
            }
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::testing::SlowFirstWriteCache;
    use crate::persistence::{InMemoryDocumentStore, MemoryCache};
    use serde_json::json;

    const DEBOUNCE: Duration = Duration::from_millis(2000);

    fn make_scheduler(
        remote: Option<Arc<InMemoryDocumentStore>>,
    ) -> (SyncScheduler, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        let scheduler = SyncScheduler::new(
            remote.map(|r| r as Arc<dyn DocumentStore>),
            cache.clone() as Arc<dyn LocalCache>,
            "kat_edu_master_data",
            "KAT_EDU_ALL_DATA",
            DEBOUNCE,
        );
        (scheduler, cache)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_writes_once() {
        let remote = Arc::new(InMemoryDocumentStore::new());
        let (scheduler, _) = make_scheduler(Some(remote.clone()));

        scheduler.schedule(json!({"rev": 1})).await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        scheduler.schedule(json!({"rev": 2})).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(remote.write_count(), 0);

        scheduler.schedule(json!({"rev": 3})).await;
        scheduler.flush().await;

        assert_eq!(remote.write_count(), 1);
        assert_eq!(
            remote.get("kat_edu_master_data").await.unwrap(),
            Some(json!({"rev": 3}))
        );
        assert_eq!(scheduler.status(), SyncStatus::Synced);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_period_elapses_then_writes() {
        let remote = Arc::new(InMemoryDocumentStore::new());
        let (scheduler, _) = make_scheduler(Some(remote.clone()));

        scheduler.schedule(json!({"rev": 1})).await;
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(remote.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_written_immediately() {
        let remote = Arc::new(InMemoryDocumentStore::new());
        let (scheduler, cache) = make_scheduler(Some(remote));

        scheduler.schedule(json!({"rev": 7})).await;
        assert_eq!(
            cache.get("KAT_EDU_ALL_DATA").await.unwrap(),
            Some(json!({"rev": 7}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_sets_error_and_next_edit_retries() {
        let remote = Arc::new(InMemoryDocumentStore::new());
        remote.set_offline(true);
        let (scheduler, cache) = make_scheduler(Some(remote.clone()));
        let mut status = scheduler.subscribe();

        scheduler.schedule(json!({"rev": 1})).await;
        scheduler.flush().await;
        assert_eq!(scheduler.status(), SyncStatus::Error);
        assert!(status.has_changed().unwrap());
        assert_eq!(*status.borrow_and_update(), SyncStatus::Error);
        // local copy is intact
        assert!(cache.get("KAT_EDU_ALL_DATA").await.unwrap().is_some());

        remote.set_offline(false);
        scheduler.schedule(json!({"rev": 2})).await;
        scheduler.flush().await;
        assert_eq!(scheduler.status(), SyncStatus::Synced);
        assert_eq!(remote.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_schedules_keep_arrival_order() {
        let remote = Arc::new(InMemoryDocumentStore::new());
        let cache = Arc::new(SlowFirstWriteCache::default());
        let scheduler = Arc::new(SyncScheduler::new(
            Some(remote.clone() as Arc<dyn DocumentStore>),
            cache.clone() as Arc<dyn LocalCache>,
            "kat_edu_master_data",
            "KAT_EDU_ALL_DATA",
            DEBOUNCE,
        ));

        let first = tokio::spawn({
            let scheduler = Arc::clone(&scheduler);
            async move { scheduler.schedule(json!({"rev": 1})).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = tokio::spawn({
            let scheduler = Arc::clone(&scheduler);
            async move { scheduler.schedule(json!({"rev": 2})).await }
        });
        first.await.unwrap();
        second.await.unwrap();
        scheduler.flush().await;

        assert_eq!(
            cache.get("KAT_EDU_ALL_DATA").await.unwrap(),
            Some(json!({"rev": 2}))
        );
        assert_eq!(
            remote.get("kat_edu_master_data").await.unwrap(),
            Some(json!({"rev": 2}))
        );
        assert_eq!(remote.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_remote_is_offline() {
        let (scheduler, cache) = make_scheduler(None);
        assert_eq!(scheduler.status(), SyncStatus::Offline);

        scheduler.schedule(json!({"rev": 1})).await;
        scheduler.flush().await;
        assert_eq!(scheduler.status(), SyncStatus::Offline);
        assert!(cache.get("KAT_EDU_ALL_DATA").await.unwrap().is_some());
    }
}

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::KeyValueStore;
use crate::models::{MovieRecord, MovieStatus};

/// The last successful full-catalog load, stored as a JSON array under one key
///
/// Every failure here is logged and swallowed: a failed read is an empty cache and a
/// failed write is dropped.
pub struct SnapshotCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the snapshot; `None` when absent, unreadable or empty
    pub async fn read(&self) -> Option<Vec<MovieRecord>> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    backend = self.store.name(),
                    "Cache read failed, treating as empty"
                );
                return None;
            }
        };

        match serde_json::from_str::<Vec<MovieRecord>>(&raw) {
            Ok(records) if records.is_empty() => None,
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "Cached catalog is corrupt, ignoring");
                None
            }
        }
    }

    /// Replaces the snapshot with a full catalog
    pub async fn write(&self, records: &[MovieRecord]) {
        let _guard = self.write_lock.lock().await;
        self.put(records).await;
    }

    /// Replaces one partition of the snapshot, keeping the others
    ///
    /// Used when the catalog is fetched per status, so the key still holds a full catalog.
    pub async fn merge_partition(&self, status: MovieStatus, records: &[MovieRecord]) {
        let _guard = self.write_lock.lock().await;

        let incoming: HashSet<&str> = records.iter().map(|r| r.code.as_str()).collect();
        let mut merged: Vec<MovieRecord> = self
            .read()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.status != status && !incoming.contains(r.code.as_str()))
            .collect();
        merged.extend(records.iter().cloned());

        self.put(&merged).await;
    }

    async fn put(&self, records: &[MovieRecord]) {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        match self.store.set(&self.key, json).await {
            Ok(()) => tracing::debug!(
                key = %self.key,
                count = records.len(),
                backend = self.store.name(),
                "Catalog cached"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                backend = self.store.name(),
                "Cache write failed, dropping"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FileStore, MockKeyValueStore};
    use crate::error::AppError;

    fn file_cache(dir: &tempfile::TempDir) -> SnapshotCache {
        let store = FileStore::new(dir.path().join("cache.json"));
        SnapshotCache::new(Arc::new(store), "movies_cache")
    }

    fn record(code: &str, status: MovieStatus) -> MovieRecord {
        MovieRecord::new(code, format!("Movie {}", code), status)
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = file_cache(&dir);
        let records = vec![
            record("A", MovieStatus::InTheaters),
            record("B", MovieStatus::Watched),
        ];

        cache.write(&records).await;
        assert_eq!(cache.read().await, Some(records));
    }

    #[tokio::test]
    async fn test_empty_snapshot_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = file_cache(&dir);

        cache.write(&[]).await;
        assert_eq!(cache.read().await, None);
    }

    #[tokio::test]
    async fn test_merge_partition_keeps_other_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = file_cache(&dir);
        cache
            .write(&[
                record("A", MovieStatus::InTheaters),
                record("B", MovieStatus::Watched),
                record("C", MovieStatus::Watched),
            ])
            .await;

        // A moved to Watched server-side, C left the partition
        cache
            .merge_partition(
                MovieStatus::Watched,
                &[
                    record("A", MovieStatus::Watched),
                    record("B", MovieStatus::Watched),
                ],
            )
            .await;

        let cached = cache.read().await.unwrap();
        let codes: Vec<(&str, MovieStatus)> =
            cached.iter().map(|r| (r.code.as_str(), r.status)).collect();
        assert_eq!(
            codes,
            vec![("A", MovieStatus::Watched), ("B", MovieStatus::Watched)]
        );
    }

    #[tokio::test]
    async fn test_read_failure_is_swallowed() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(AppError::Storage("unavailable".to_string())));
        store.expect_name().return_const("mock");

        let cache = SnapshotCache::new(Arc::new(store), "movies_cache");
        assert_eq!(cache.read().await, None);
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_ignored() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some("{\"not\": \"an array\"}".to_string())));
        store.expect_name().return_const("mock");

        let cache = SnapshotCache::new(Arc::new(store), "movies_cache");
        assert_eq!(cache.read().await, None);
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .times(1)
            .returning(|_, _| Err(AppError::Storage("quota exceeded".to_string())));
        store.expect_name().return_const("mock");

        let cache = SnapshotCache::new(Arc::new(store), "movies_cache");
        cache.write(&[record("A", MovieStatus::InTheaters)]).await;
    }
}

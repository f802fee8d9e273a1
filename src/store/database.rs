//! File-backed collection store with a write-through in-memory snapshot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::clock::{Clock, SystemClock};
use super::error::{StoreError, StoreResult};
use super::persist;
use super::record::{Record, SearchCriteria};
use crate::observability::metrics;

/// Collection name → records in insertion order.
pub type Snapshot<R> = BTreeMap<String, Vec<R>>;

/// Durable, queryable collection storage.
///
/// The whole snapshot is mirrored in memory. Every mutation is applied and
/// persisted while holding the snapshot lock, so concurrent writers are
/// serialized and the file always matches the last completed mutation.
pub struct Store<R: Record> {
    path: PathBuf,
    snapshot: Mutex<Snapshot<R>>,
    clock: Arc<dyn Clock>,
}

impl<R: Record> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl<R: Record> Store<R> {
    /// Open the store backed by `path` using the wall clock.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock)).await
    }

    /// Open the store, loading the snapshot before returning.
    ///
    /// A missing or unparseable file yields an empty snapshot which is
    /// written back immediately, leaving a valid file on disk. An
    /// unparseable file is kept next to it as `<name>.corrupt-<timestamp>`.
    pub async fn open_with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> StoreResult<Self> {
        let path = path.into();
        let snapshot = match persist::load_snapshot::<Snapshot<R>>(&path).await? {
            Some(snapshot) => {
                tracing::info!(
                    path = %path.display(),
                    collections = snapshot.len(),
                    records = snapshot.values().map(Vec::len).sum::<usize>(),
                    "Database loaded"
                );
                snapshot
            }
            None => {
                let empty: Snapshot<R> = Snapshot::new();
                persist::write_snapshot(&path, &empty).await?;
                tracing::info!(path = %path.display(), "Initialized empty database");
                empty
            }
        };

        for (collection, records) in &snapshot {
            metrics::record_store_size(collection, records.len());
        }

        Ok(Self {
            path,
            snapshot: Mutex::new(snapshot),
            clock,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// All records of `collection`, optionally filtered by `criteria`.
    ///
    /// Unknown collections yield an empty list.
    pub async fn select(&self, collection: &str, criteria: Option<&SearchCriteria>) -> Vec<R> {
        let snapshot = self.snapshot.lock().await;
        let Some(records) = snapshot.get(collection) else {
            return Vec::new();
        };
        match criteria {
            Some(criteria) => records
                .iter()
                .filter(|record| criteria.matches(*record))
                .cloned()
                .collect(),
            None => records.clone(),
        }
    }

    /// Number of records in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.snapshot
            .lock()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Append `record` to `collection`, creating the collection if needed.
    pub async fn insert(&self, collection: &str, record: R) -> StoreResult<R> {
        self.mutate(collection, |records, _| {
            if records.iter().any(|existing| existing.id() == record.id()) {
                return Err(StoreError::Conflict {
                    collection: collection.to_string(),
                    id: record.id().to_string(),
                });
            }
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    /// Merge `patch` into the record, or mark it complete when `patch` is `None`.
    pub async fn update(&self, collection: &str, id: &str, patch: Option<R::Patch>) -> StoreResult<R> {
        match patch {
            Some(patch) => {
                self.mutate(collection, |records, now| {
                    let record = find_mut(records, collection, id)?;
                    record.merge(patch);
                    record.touch(now);
                    Ok(record.clone())
                })
                .await
            }
            None => self.complete(collection, id).await,
        }
    }

    /// Stamp `updatedAt` and `completedAt` on the record, leaving other fields as is.
    pub async fn complete(&self, collection: &str, id: &str) -> StoreResult<R> {
        self.mutate(collection, |records, now| {
            let record = find_mut(records, collection, id)?;
            record.touch(now);
            record.mark_completed(now);
            Ok(record.clone())
        })
        .await
    }

    /// Remove the record with `id` from `collection`.
    pub async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.mutate(collection, |records, _| {
            let index = records
                .iter()
                .position(|record| record.id() == id)
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            records.remove(index);
            Ok(())
        })
        .await
    }

    /// Write the current snapshot to disk.
    pub async fn flush(&self) -> StoreResult<()> {
        let snapshot = self.snapshot.lock().await;
        persist::write_snapshot(&self.path, &*snapshot).await
    }

    /// Apply `op` to one collection and persist, all under the snapshot lock.
    ///
    /// `op` works on a copy of the collection. The copy replaces the live
    /// records only for the duration of the write; if `op` or the write fails,
    /// memory is left exactly as it was before the call.
    async fn mutate<T, F>(&self, collection: &str, op: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Vec<R>, DateTime<Utc>) -> StoreResult<T>,
    {
        let mut snapshot = self.snapshot.lock().await;
        let now = self.clock.now();

        let mut records = snapshot.get(collection).cloned().unwrap_or_default();
        let value = op(&mut records, now)?;
        let size = records.len();
        let previous = snapshot.insert(collection.to_string(), records);

        if let Err(e) = persist::write_snapshot(&self.path, &*snapshot).await {
            match previous {
                Some(previous) => snapshot.insert(collection.to_string(), previous),
                None => snapshot.remove(collection),
            };
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist database, change rolled back");
            return Err(e);
        }

        metrics::record_store_size(collection, size);
        Ok(value)
    }
}

fn find_mut<'a, R: Record>(records: &'a mut [R], collection: &str, id: &str) -> StoreResult<&'a mut R> {
    records
        .iter_mut()
        .find(|record| record.id() == id)
        .ok_or_else(|| StoreError::not_found(collection, id))
}

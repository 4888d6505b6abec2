//! RUMBO Storage - cache and history store abstractions
//!
//! Defines the storage seams of the location pipeline: the ephemeral
//! per-subject cache (`cache` module) and the durable per-subject history
//! store (`LocationHistoryStore`). Each seam ships an in-memory
//! implementation that backs tests and single-process deployments; the
//! production database implementation lives behind the same traits.

pub mod cache;

pub use cache::{
    CacheBackend, CacheStats, InMemoryCacheBackend, LiveLocationCache, LiveSnapshot,
    SnapshotDecodeFailure,
};

use async_trait::async_trait;
use chrono::Utc;
use rumbo_core::{
    LocationId, NewPersistedLocation, PersistedLocation, StorageError, SubjectId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// Storage trait for durable per-subject location history.
///
/// Implementations must assign monotonically increasing, never-reused ids
/// on insert. Ordered queries sort by `created_at` with id as the stable
/// tie-break, are finite, and carry no cursor state between calls.
#[async_trait]
pub trait LocationHistoryStore: Send + Sync {
    /// Insert a new record, assigning its id and timestamps.
    ///
    /// `created_at` defaults to insert time when the payload carries none.
    async fn insert(&self, new: NewPersistedLocation) -> Result<PersistedLocation, StorageError>;

    /// Count records held for a subject.
    async fn count_for_subject(&self, subject_id: SubjectId) -> Result<usize, StorageError>;

    /// Up to `limit` most recent records for a subject, descending by
    /// `created_at` (id descending as tie-break).
    async fn most_recent(
        &self,
        subject_id: SubjectId,
        limit: usize,
    ) -> Result<Vec<PersistedLocation>, StorageError>;

    /// Up to `limit` oldest records for a subject, ascending by
    /// `created_at` (id ascending as tie-break).
    async fn oldest(
        &self,
        subject_id: SubjectId,
        limit: usize,
    ) -> Result<Vec<PersistedLocation>, StorageError>;

    /// Delete the given records. Returns how many were actually removed;
    /// absent ids are not an error.
    async fn delete(&self, ids: &[LocationId]) -> Result<u64, StorageError>;
}

/// In-memory history store.
///
/// Backs tests and single-process deployments. Ids come from an atomic
/// counter, so they are monotonic and never reused even across deletes.
#[derive(Debug)]
pub struct InMemoryLocationStore {
    records: Arc<RwLock<HashMap<LocationId, PersistedLocation>>>,
    next_id: AtomicI64,
}

impl Default for InMemoryLocationStore {
    fn default() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryLocationStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records held across all subjects.
    pub fn record_count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    fn sorted_for_subject(
        &self,
        subject_id: SubjectId,
        descending: bool,
    ) -> Result<Vec<PersistedLocation>, StorageError> {
        let records = self.records.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut matching: Vec<PersistedLocation> = records
            .values()
            .filter(|r| r.subject_id == subject_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            let ordering = a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id));
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        Ok(matching)
    }
}

#[async_trait]
impl LocationHistoryStore for InMemoryLocationStore {
    async fn insert(&self, new: NewPersistedLocation) -> Result<PersistedLocation, StorageError> {
        let now = Utc::now();
        let record = PersistedLocation {
            id: LocationId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            subject_id: new.subject_id,
            package_id: new.package_id,
            latitude: new.latitude,
            longitude: new.longitude,
            created_at: new.created_at.unwrap_or(now),
            updated_at: now,
        };
        let mut records = self.records.write().map_err(|_| StorageError::LockPoisoned)?;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn count_for_subject(&self, subject_id: SubjectId) -> Result<usize, StorageError> {
        let records = self.records.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records
            .values()
            .filter(|r| r.subject_id == subject_id)
            .count())
    }

    async fn most_recent(
        &self,
        subject_id: SubjectId,
        limit: usize,
    ) -> Result<Vec<PersistedLocation>, StorageError> {
        let mut matching = self.sorted_for_subject(subject_id, true)?;
        matching.truncate(limit);
        Ok(matching)
    }

    async fn oldest(
        &self,
        subject_id: SubjectId,
        limit: usize,
    ) -> Result<Vec<PersistedLocation>, StorageError> {
        let mut matching = self.sorted_for_subject(subject_id, false)?;
        matching.truncate(limit);
        Ok(matching)
    }

    async fn delete(&self, ids: &[LocationId]) -> Result<u64, StorageError> {
        let mut records = self.records.write().map_err(|_| StorageError::LockPoisoned)?;
        let mut removed = 0u64;
        for id in ids {
            if records.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

// ============================================================================
// TESTS
// ============================================================================

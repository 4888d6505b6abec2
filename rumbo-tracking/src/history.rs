//! Durable write paths and per-subject retention enforcement.
//!
//! Two bounds with different enforcement timing apply here. The direct
//! path checks its bound on every insert and either commits the whole
//! operation (evictions plus insert) or nothing. The archival path
//! inserts first and trims only once a subject passes a higher trigger,
//! so a sweep over many subjects does not pay a delete per insert.

use rumbo_core::policy::{ARCHIVE_SWEEP, DIRECT_WRITE};
use rumbo_core::{
    LiveLocation, LocationId, NewPersistedLocation, PackageId, PersistedLocation, SubjectId,
    TrackingResult,
};
use rumbo_storage::LocationHistoryStore;

/// Insert a direct durable write, evicting the oldest records first so
/// the subject ends at or below the synchronous cap.
///
/// Any storage failure during count, delete, or insert propagates whole:
/// no partial state is acceptable on this path.
pub async fn insert_direct<S>(
    store: &S,
    subject_id: SubjectId,
    package_id: Option<PackageId>,
    latitude: f64,
    longitude: f64,
) -> TrackingResult<PersistedLocation>
where
    S: LocationHistoryStore + ?Sized,
{
    let existing = store.count_for_subject(subject_id).await?;
    let surplus = DIRECT_WRITE.surplus_before_insert(existing);
    if surplus > 0 {
        let ids = oldest_ids(store, subject_id, surplus).await?;
        store.delete(&ids).await?;
        tracing::debug!(%subject_id, evicted = ids.len(), "evicted oldest history before direct insert");
    }
    let record = store
        .insert(NewPersistedLocation::direct(
            subject_id, package_id, latitude, longitude,
        ))
        .await?;
    Ok(record)
}

/// Copy a live cache entry into durable history, preserving the original
/// capture time as `created_at`.
///
/// Enforcement is deferred: nothing is deleted until the subject's count
/// passes the archival trigger, and a cleanup failure after a successful
/// insert never rolls the insert back. The count stays elevated, so the
/// next sweep retries the cleanup naturally.
pub async fn insert_from_archive<S>(
    store: &S,
    live: &LiveLocation,
) -> TrackingResult<PersistedLocation>
where
    S: LocationHistoryStore + ?Sized,
{
    let record = store.insert(NewPersistedLocation::from_live(live)).await?;
    match enforce_archive_cap(store, live.subject_id).await {
        Ok(0) => {}
        Ok(deleted) => {
            tracing::debug!(subject_id = %live.subject_id, deleted, "trimmed archived history");
        }
        Err(e) => {
            tracing::warn!(
                subject_id = %live.subject_id,
                error = %e,
                "history cleanup failed after archive insert; record preserved"
            );
        }
    }
    Ok(record)
}

/// Trim a subject to the archival bound if its count passes the trigger.
/// Returns the number of records deleted.
async fn enforce_archive_cap<S>(store: &S, subject_id: SubjectId) -> TrackingResult<u64>
where
    S: LocationHistoryStore + ?Sized,
{
    let count = store.count_for_subject(subject_id).await?;
    let excess = ARCHIVE_SWEEP.excess(count);
    if excess == 0 {
        return Ok(0);
    }
    let ids = oldest_ids(store, subject_id, excess).await?;
    let deleted = store.delete(&ids).await?;
    Ok(deleted)
}

async fn oldest_ids<S>(
    store: &S,
    subject_id: SubjectId,
    limit: usize,
) -> TrackingResult<Vec<LocationId>>
where
    S: LocationHistoryStore + ?Sized,
{
    let oldest = store.oldest(subject_id, limit).await?;
    Ok(oldest.into_iter().map(|r| r.id).collect())
}

//! Archival sweep background job.
//!
//! Once a day, pinned to a fixed local time, the sweep snapshots every
//! live cache entry and copies each one into durable history. Per-item
//! failure is the normal case, not exceptional: a record that cannot be
//! migrated is counted and logged, and the loop moves on. Only a failed
//! snapshot fails the run as a whole.
//!
//! The sweep never deletes cache entries; the cache TTL retires them. A
//! second sweep before expiry simply re-migrates the (possibly updated)
//! value as an independent row.
//!
//! Run lifecycle: idle until the scheduled time, then running, then
//! completed (even with a non-zero error count) or failed (snapshot
//! failure only).

use crate::history;
use crate::jobs::locks::JobLockProvider;
use chrono::{FixedOffset, NaiveTime, Offset, TimeZone, Utc};
use rumbo_core::{new_run_id, RunId, SubjectId, Timestamp, TrackingError};
use rumbo_storage::cache::LiveLocationCache;
use rumbo_storage::{CacheBackend, LocationHistoryStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::timeout;

/// Logical name of the sweep job; doubles as its coordination lock key.
pub const ARCHIVE_SWEEP_JOB: &str = "archive_sweep";

const DEFAULT_RUN_AT_HOUR: u32 = 3;
const DEFAULT_UTC_OFFSET_SECS: i32 = -5 * 3600;
const DEFAULT_OP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOCK_TTL_SECS: u64 = 3600;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the archival sweep job.
///
/// The retention caps and the cache TTL are compile-time constants in
/// `rumbo_core::policy`; only scheduling knobs live here.
#[derive(Debug, Clone)]
pub struct ArchiveSweepConfig {
    /// Local wall-clock time the sweep runs at (default 03:00).
    pub run_at: NaiveTime,

    /// Fixed UTC offset of the scheduling time zone, in seconds
    /// (default -18000, i.e. UTC-5).
    pub utc_offset_secs: i32,

    /// Bound on each cache/store operation inside the sweep. A per-item
    /// timeout counts as an ordinary per-item error.
    pub op_timeout: Duration,

    /// How long the job lock may be held before a crashed holder's lock
    /// is considered abandoned.
    pub lock_ttl: Duration,

    /// Identifies this worker as the lock holder.
    pub worker_id: String,
}

impl Default for ArchiveSweepConfig {
    fn default() -> Self {
        Self {
            run_at: NaiveTime::from_hms_opt(DEFAULT_RUN_AT_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
            op_timeout: Duration::from_secs(DEFAULT_OP_TIMEOUT_SECS),
            lock_ttl: Duration::from_secs(DEFAULT_LOCK_TTL_SECS),
            worker_id: "worker-1".to_string(),
        }
    }
}

impl ArchiveSweepConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `RUMBO_ARCHIVE_RUN_AT`: local run time as `HH:MM` (default: 03:00)
    /// - `RUMBO_ARCHIVE_UTC_OFFSET_SECS`: scheduling zone offset (default: -18000)
    /// - `RUMBO_ARCHIVE_OP_TIMEOUT_SECS`: per-operation bound (default: 10)
    /// - `RUMBO_ARCHIVE_LOCK_TTL_SECS`: lock abandonment threshold (default: 3600)
    /// - `RUMBO_ARCHIVE_WORKER_ID`: lock holder identity (default: worker-1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let run_at = std::env::var("RUMBO_ARCHIVE_RUN_AT")
            .ok()
            .and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M").ok())
            .unwrap_or(defaults.run_at);

        let utc_offset_secs = std::env::var("RUMBO_ARCHIVE_UTC_OFFSET_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.utc_offset_secs);

        let op_timeout = std::env::var("RUMBO_ARCHIVE_OP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.op_timeout);

        let lock_ttl = std::env::var("RUMBO_ARCHIVE_LOCK_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.lock_ttl);

        let worker_id = std::env::var("RUMBO_ARCHIVE_WORKER_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.worker_id);

        Self {
            run_at,
            utc_offset_secs,
            op_timeout,
            lock_ttl,
            worker_id,
        }
    }

    /// Configuration for development with tighter timings.
    pub fn development() -> Self {
        Self {
            op_timeout: Duration::from_secs(2),
            lock_ttl: Duration::from_secs(60),
            worker_id: "dev".to_string(),
            ..Self::default()
        }
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    /// Next scheduled run strictly after `now`, as UTC.
    pub fn next_run_after(&self, now: Timestamp) -> Timestamp {
        let offset = self.offset();
        let local_now = now.with_timezone(&offset);
        let today = local_now.date_naive().and_time(self.run_at);
        let candidate = offset
            .from_local_datetime(&today)
            .single()
            .unwrap_or(local_now);
        let next_local = if candidate > local_now {
            candidate
        } else {
            candidate + chrono::Duration::days(1)
        };
        next_local.with_timezone(&Utc)
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Counters for sweep job activity over the task's lifetime.
#[derive(Debug, Default)]
pub struct ArchiveSweepMetrics {
    /// Runs that reached a terminal Completed state.
    pub runs_completed: AtomicU64,

    /// Runs that failed at the snapshot step.
    pub runs_failed: AtomicU64,

    /// Scheduled runs skipped because the job lock was held.
    pub runs_skipped: AtomicU64,

    /// Live entries successfully copied into durable history.
    pub locations_migrated: AtomicU64,

    /// Per-item migration failures (decode, storage, timeout).
    pub migration_errors: AtomicU64,
}

impl ArchiveSweepMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> ArchiveSweepSnapshot {
        ArchiveSweepSnapshot {
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            runs_skipped: self.runs_skipped.load(Ordering::Relaxed),
            locations_migrated: self.locations_migrated.load(Ordering::Relaxed),
            migration_errors: self.migration_errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of sweep metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSweepSnapshot {
    pub runs_completed: u64,
    pub runs_failed: u64,
    pub runs_skipped: u64,
    pub locations_migrated: u64,
    pub migration_errors: u64,
}

// ============================================================================
// SWEEP EXECUTION
// ============================================================================

/// Terminal state of one sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    /// The snapshot succeeded and every entry was attempted, possibly
    /// with per-item errors.
    Completed,
    /// The snapshot itself failed; nothing was attempted.
    Failed,
}

/// Per-item migration failure recorded during a sweep.
#[derive(Debug, Clone)]
pub struct SweepFailure {
    /// Subject whose entry failed, when the key identified one.
    pub subject_id: Option<SubjectId>,
    pub reason: String,
}

/// Summary of one sweep run.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub run_id: RunId,
    pub started_at: Timestamp,
    pub elapsed: Duration,
    /// Entries seen in the snapshot, decodable or not.
    pub processed: usize,
    pub migrated: usize,
    pub errors: usize,
    pub failures: Vec<SweepFailure>,
    pub status: SweepStatus,
}

/// Outcome of one sweep run.
#[derive(Debug, Clone)]
pub enum SweepOutcome {
    Completed(SweepReport),
    Failed { run_id: RunId, error: TrackingError },
}

/// Execute one archival sweep: snapshot the cache, then migrate each
/// entry independently.
pub async fn run_sweep<B, S>(
    cache: &LiveLocationCache<B>,
    store: &S,
    config: &ArchiveSweepConfig,
) -> SweepOutcome
where
    B: CacheBackend,
    S: LocationHistoryStore + ?Sized,
{
    let run_id = new_run_id();
    let started_at = Utc::now();
    let started = Instant::now();
    tracing::info!(%run_id, "archive sweep started");

    let snapshot = match timeout(config.op_timeout, cache.list_all()).await {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(e)) => {
            tracing::error!(%run_id, error = %e, "cache snapshot failed; aborting sweep");
            return SweepOutcome::Failed {
                run_id,
                error: e.into(),
            };
        }
        Err(_) => {
            tracing::error!(%run_id, "cache snapshot timed out; aborting sweep");
            return SweepOutcome::Failed {
                run_id,
                error: TrackingError::Timeout {
                    operation: "cache snapshot",
                },
            };
        }
    };

    let processed = snapshot.len();
    let mut migrated = 0usize;
    let mut failures: Vec<SweepFailure> = snapshot
        .decode_failures
        .iter()
        .map(|f| SweepFailure {
            subject_id: None,
            reason: format!("undecodable entry at {}: {}", f.key, f.reason),
        })
        .collect();

    for (subject_id, live) in &snapshot.entries {
        match timeout(config.op_timeout, history::insert_from_archive(store, live)).await {
            Ok(Ok(_)) => migrated += 1,
            Ok(Err(e)) => {
                tracing::warn!(%run_id, %subject_id, error = %e, "failed to archive live location");
                failures.push(SweepFailure {
                    subject_id: Some(*subject_id),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                tracing::warn!(%run_id, %subject_id, "archiving live location timed out");
                failures.push(SweepFailure {
                    subject_id: Some(*subject_id),
                    reason: "operation timed out".to_string(),
                });
            }
        }
    }

    let elapsed = started.elapsed();
    let errors = failures.len();
    tracing::info!(
        %run_id,
        migrated,
        errors,
        processed,
        elapsed_ms = elapsed.as_millis() as u64,
        "archive sweep completed"
    );
    SweepOutcome::Completed(SweepReport {
        run_id,
        started_at,
        elapsed,
        processed,
        migrated,
        errors,
        failures,
        status: SweepStatus::Completed,
    })
}

/// One scheduled attempt: take the job lock (or skip the run entirely if
/// it is held), sweep, record metrics, release.
///
/// Returns `None` for a skipped run.
pub async fn run_locked_sweep<B, S, L>(
    cache: &LiveLocationCache<B>,
    store: &S,
    locks: &L,
    config: &ArchiveSweepConfig,
    metrics: &ArchiveSweepMetrics,
) -> Option<SweepOutcome>
where
    B: CacheBackend,
    S: LocationHistoryStore + ?Sized,
    L: JobLockProvider + ?Sized,
{
    let Some(lock) = locks
        .try_acquire(ARCHIVE_SWEEP_JOB, &config.worker_id, config.lock_ttl)
        .await
    else {
        metrics.runs_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            job = ARCHIVE_SWEEP_JOB,
            worker_id = %config.worker_id,
            "job lock held; skipping this run"
        );
        return None;
    };

    let outcome = run_sweep(cache, store, config).await;
    match &outcome {
        SweepOutcome::Completed(report) => {
            metrics.runs_completed.fetch_add(1, Ordering::Relaxed);
            metrics
                .locations_migrated
                .fetch_add(report.migrated as u64, Ordering::Relaxed);
            metrics
                .migration_errors
                .fetch_add(report.errors as u64, Ordering::Relaxed);
        }
        SweepOutcome::Failed { .. } => {
            metrics.runs_failed.fetch_add(1, Ordering::Relaxed);
        }
    }
    locks.release(lock).await;
    Some(outcome)
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// Background task that runs the archival sweep on its daily schedule.
///
/// Sleeps until the next scheduled time, attempts one locked sweep, and
/// repeats until the shutdown signal flips to `true`. Returns the metrics
/// collected over the task's lifetime.
pub async fn archive_sweep_task<B, S, L>(
    cache: Arc<LiveLocationCache<B>>,
    store: Arc<S>,
    locks: Arc<L>,
    config: ArchiveSweepConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Arc<ArchiveSweepMetrics>
where
    B: CacheBackend,
    S: LocationHistoryStore + ?Sized,
    L: JobLockProvider + ?Sized,
{
    let metrics = Arc::new(ArchiveSweepMetrics::new());

    tracing::info!(
        run_at = %config.run_at,
        utc_offset_secs = config.utc_offset_secs,
        worker_id = %config.worker_id,
        "archive sweep task started"
    );

    loop {
        let next = config.next_run_after(Utc::now());
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!(next_run = %next, "archive sweep sleeping until next scheduled run");

        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    tracing::info!("archive sweep task shutting down");
                    break;
                }
            }

            _ = tokio::time::sleep(wait) => {
                run_locked_sweep(
                    cache.as_ref(),
                    store.as_ref(),
                    locks.as_ref(),
                    &config,
                    &metrics,
                )
                .await;
            }
        }
    }

    let snapshot = metrics.snapshot();
    tracing::info!(
        runs_completed = snapshot.runs_completed,
        runs_failed = snapshot.runs_failed,
        runs_skipped = snapshot.runs_skipped,
        locations_migrated = snapshot.locations_migrated,
        migration_errors = snapshot.migration_errors,
        "archive sweep task completed"
    );

    metrics
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::locks::InMemoryJobLocks;
    use async_trait::async_trait;
    use rumbo_core::{
        CacheError, LocationId, NewPersistedLocation, PackageId, PersistedLocation, StorageError,
    };
    use rumbo_storage::{InMemoryCacheBackend, InMemoryLocationStore};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Store wrapper that rejects inserts for chosen subjects.
    struct RejectingStore {
        inner: InMemoryLocationStore,
        rejected: Mutex<HashSet<SubjectId>>,
    }

    impl RejectingStore {
        fn rejecting(subjects: impl IntoIterator<Item = i64>) -> Self {
            Self {
                inner: InMemoryLocationStore::new(),
                rejected: Mutex::new(subjects.into_iter().map(SubjectId).collect()),
            }
        }
    }

    #[async_trait]
    impl LocationHistoryStore for RejectingStore {
        async fn insert(
            &self,
            new: NewPersistedLocation,
        ) -> Result<PersistedLocation, StorageError> {
            let is_rejected = {
                let rejected = self.rejected.lock().map_err(|_| StorageError::LockPoisoned)?;
                rejected.contains(&new.subject_id)
            };
            if is_rejected {
                return Err(StorageError::InsertFailed {
                    subject_id: new.subject_id,
                    reason: "injected".to_string(),
                });
            }
            self.inner.insert(new).await
        }

        async fn count_for_subject(&self, subject_id: SubjectId) -> Result<usize, StorageError> {
            self.inner.count_for_subject(subject_id).await
        }

        async fn most_recent(
            &self,
            subject_id: SubjectId,
            limit: usize,
        ) -> Result<Vec<PersistedLocation>, StorageError> {
            self.inner.most_recent(subject_id, limit).await
        }

        async fn oldest(
            &self,
            subject_id: SubjectId,
            limit: usize,
        ) -> Result<Vec<PersistedLocation>, StorageError> {
            self.inner.oldest(subject_id, limit).await
        }

        async fn delete(&self, ids: &[LocationId]) -> Result<u64, StorageError> {
            self.inner.delete(ids).await
        }
    }

    /// Cache backend that is unreachable.
    struct UnreachableBackend;

    #[async_trait]
    impl rumbo_storage::CacheBackend for UnreachableBackend {
        async fn put(
            &self,
            _key: &str,
            _payload: Vec<u8>,
            _ttl: Duration,
        ) -> Result<(), CacheError> {
            Err(unreachable_err())
        }

        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(unreachable_err())
        }

        async fn scan(&self, _prefix: &str) -> Result<Vec<(String, Vec<u8>)>, CacheError> {
            Err(unreachable_err())
        }

        async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
            Err(unreachable_err())
        }

        async fn stats(&self) -> Result<rumbo_storage::CacheStats, CacheError> {
            Err(unreachable_err())
        }
    }

    fn unreachable_err() -> CacheError {
        CacheError::Unavailable {
            reason: "connection refused".to_string(),
        }
    }

    fn live_cache() -> LiveLocationCache<InMemoryCacheBackend> {
        LiveLocationCache::new(InMemoryCacheBackend::new())
    }

    async fn seed_live(cache: &LiveLocationCache<InMemoryCacheBackend>, subjects: &[i64]) {
        for subject in subjects {
            cache
                .put(SubjectId(*subject), Some(PackageId(1)), 4.65, -74.06)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_sweep_of_empty_cache_completes_with_zero_counts() {
        let cache = live_cache();
        let store = InMemoryLocationStore::new();

        let outcome = run_sweep(&cache, &store, &ArchiveSweepConfig::default()).await;
        let SweepOutcome::Completed(report) = outcome else {
            panic!("expected completed run");
        };
        assert_eq!(report.processed, 0);
        assert_eq!(report.migrated, 0);
        assert_eq!(report.errors, 0);
        assert_eq!(report.status, SweepStatus::Completed);
    }

    #[tokio::test]
    async fn test_sweep_migrates_every_live_entry() {
        let cache = live_cache();
        let store = InMemoryLocationStore::new();
        seed_live(&cache, &[1, 2, 3]).await;

        let outcome = run_sweep(&cache, &store, &ArchiveSweepConfig::default()).await;
        let SweepOutcome::Completed(report) = outcome else {
            panic!("expected completed run");
        };
        assert_eq!(report.processed, 3);
        assert_eq!(report.migrated, 3);
        assert_eq!(report.errors, 0);
        for subject in [1, 2, 3] {
            assert_eq!(
                store.count_for_subject(SubjectId(subject)).await.unwrap(),
                1
            );
        }
    }

    #[tokio::test]
    async fn test_per_item_failures_do_not_fail_the_run() {
        let cache = live_cache();
        let store = RejectingStore::rejecting([2, 4]);
        seed_live(&cache, &[1, 2, 3, 4, 5]).await;

        let outcome = run_sweep(&cache, &store, &ArchiveSweepConfig::default()).await;
        let SweepOutcome::Completed(report) = outcome else {
            panic!("expected completed run");
        };
        assert_eq!(report.processed, 5);
        assert_eq!(report.migrated, 3);
        assert_eq!(report.errors, 2);
        assert_eq!(report.status, SweepStatus::Completed);

        let failed_subjects: HashSet<_> = report
            .failures
            .iter()
            .filter_map(|f| f.subject_id)
            .collect();
        assert_eq!(
            failed_subjects,
            [SubjectId(2), SubjectId(4)].into_iter().collect()
        );
        for failure in &report.failures {
            assert!(failure.reason.contains("injected"));
        }
    }

    #[tokio::test]
    async fn test_undecodable_entries_count_as_per_item_errors() {
        let cache = live_cache();
        let store = InMemoryLocationStore::new();
        seed_live(&cache, &[1]).await;
        cache
            .backend()
            .put(
                "live_location:2",
                b"corrupt".to_vec(),
                Duration::from_secs(600),
            )
            .await
            .unwrap();

        let outcome = run_sweep(&cache, &store, &ArchiveSweepConfig::default()).await;
        let SweepOutcome::Completed(report) = outcome else {
            panic!("expected completed run");
        };
        assert_eq!(report.processed, 2);
        assert_eq!(report.migrated, 1);
        assert_eq!(report.errors, 1);
        assert!(report.failures[0].reason.contains("live_location:2"));
    }

    #[tokio::test]
    async fn test_unreachable_cache_fails_the_run() {
        let cache = LiveLocationCache::new(UnreachableBackend);
        let store = InMemoryLocationStore::new();

        let outcome = run_sweep(&cache, &store, &ArchiveSweepConfig::default()).await;
        let SweepOutcome::Failed { error, .. } = outcome else {
            panic!("expected failed run");
        };
        assert!(matches!(error, TrackingError::Cache(_)));
    }

    #[tokio::test]
    async fn test_repeated_sweeps_re_migrate_without_dedup() {
        let cache = live_cache();
        let store = InMemoryLocationStore::new();
        seed_live(&cache, &[1]).await;

        let config = ArchiveSweepConfig::default();
        run_sweep(&cache, &store, &config).await;
        run_sweep(&cache, &store, &config).await;

        // Duplicates are accepted history noise, not an error.
        assert_eq!(store.count_for_subject(SubjectId(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_locked_sweep_skips_when_lock_is_held() {
        let cache = live_cache();
        let store = InMemoryLocationStore::new();
        let locks = InMemoryJobLocks::new();
        let config = ArchiveSweepConfig::default();
        let metrics = ArchiveSweepMetrics::new();

        let held = locks
            .try_acquire(ARCHIVE_SWEEP_JOB, "other-worker", config.lock_ttl)
            .await
            .unwrap();

        let outcome = run_locked_sweep(&cache, &store, &locks, &config, &metrics).await;
        assert!(outcome.is_none());
        assert_eq!(metrics.snapshot().runs_skipped, 1);
        assert_eq!(metrics.snapshot().runs_completed, 0);

        locks.release(held).await;
        let outcome = run_locked_sweep(&cache, &store, &locks, &config, &metrics).await;
        assert!(matches!(outcome, Some(SweepOutcome::Completed(_))));
        assert_eq!(metrics.snapshot().runs_completed, 1);
    }

    #[tokio::test]
    async fn test_locked_sweep_releases_the_lock_after_failure() {
        let cache = LiveLocationCache::new(UnreachableBackend);
        let store = InMemoryLocationStore::new();
        let locks = InMemoryJobLocks::new();
        let config = ArchiveSweepConfig::default();
        let metrics = ArchiveSweepMetrics::new();

        let outcome = run_locked_sweep(&cache, &store, &locks, &config, &metrics).await;
        assert!(matches!(outcome, Some(SweepOutcome::Failed { .. })));
        assert_eq!(metrics.snapshot().runs_failed, 1);

        // The lock was released despite the failure.
        assert!(locks
            .try_acquire(ARCHIVE_SWEEP_JOB, "w", config.lock_ttl)
            .await
            .is_some());
    }

    #[test]
    fn test_config_default() {
        let config = ArchiveSweepConfig::default();
        assert_eq!(config.run_at, NaiveTime::from_hms_opt(3, 0, 0).unwrap());
        assert_eq!(config.utc_offset_secs, -18000);
        assert_eq!(config.op_timeout, Duration::from_secs(10));
        assert_eq!(config.lock_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_config_development() {
        let config = ArchiveSweepConfig::development();
        assert_eq!(config.op_timeout, Duration::from_secs(2));
        assert_eq!(config.lock_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_next_run_later_today() {
        let config = ArchiveSweepConfig::default();
        // 02:59 local (07:59 UTC at -5): the 03:00 run is a minute away.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 59, 0).unwrap();
        let next = config.next_run_after(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_next_run_rolls_to_tomorrow() {
        let config = ArchiveSweepConfig::default();
        // 03:01 local: today's run already happened.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 1, 0).unwrap();
        let next = config.next_run_after(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 11, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_next_run_is_strictly_after_now() {
        let config = ArchiveSweepConfig::default();
        // Exactly at the run time: schedule tomorrow, not now.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let next = config.next_run_after(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 11, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_metrics_snapshot() {
        let metrics = ArchiveSweepMetrics::new();
        metrics.runs_completed.store(3, Ordering::Relaxed);
        metrics.locations_migrated.store(40, Ordering::Relaxed);
        metrics.migration_errors.store(2, Ordering::Relaxed);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.runs_completed, 3);
        assert_eq!(snapshot.locations_migrated, 40);
        assert_eq!(snapshot.migration_errors, 2);
        assert_eq!(snapshot.runs_failed, 0);
    }
}

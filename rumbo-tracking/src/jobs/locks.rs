//! Cooperative named locks for scheduled jobs.
//!
//! Overlap prevention and the single-worker constraint both reduce to a
//! named, time-bounded mutual-exclusion lock held for a run's duration.
//! The in-memory provider covers single-process deployments; a
//! shared-store implementation satisfies the same contract across
//! workers. Locks expire so a crashed holder cannot wedge the schedule.

use async_trait::async_trait;
use chrono::Utc;
use rumbo_core::{new_run_id, Acquired, JobLock, JobLockData};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

/// Provider of named job locks.
#[async_trait]
pub trait JobLockProvider: Send + Sync {
    /// Try to acquire the named lock for `ttl`.
    ///
    /// Returns `None` when the lock is already held and not expired; the
    /// caller skips its run rather than queueing.
    async fn try_acquire(
        &self,
        job_name: &str,
        holder: &str,
        ttl: Duration,
    ) -> Option<JobLock<Acquired>>;

    /// Release a held lock.
    async fn release(&self, lock: JobLock<Acquired>);
}

/// In-process lock registry.
#[derive(Debug, Default)]
pub struct InMemoryJobLocks {
    held: Mutex<HashMap<String, JobLockData>>,
}

impl InMemoryJobLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobLockProvider for InMemoryJobLocks {
    async fn try_acquire(
        &self,
        job_name: &str,
        holder: &str,
        ttl: Duration,
    ) -> Option<JobLock<Acquired>> {
        let mut held = self.held.lock().await;
        let now = Utc::now();
        if let Some(existing) = held.get(job_name) {
            if !existing.is_expired(now) {
                return None;
            }
        }
        let ttl = chrono::Duration::from_std(ttl)
            .unwrap_or_else(|_| chrono::Duration::seconds(ttl.as_secs() as i64));
        let data = JobLockData {
            lock_id: new_run_id(),
            job_name: job_name.to_string(),
            holder: holder.to_string(),
            acquired_at: now,
            expires_at: now + ttl,
        };
        held.insert(job_name.to_string(), data.clone());
        Some(JobLock::new(data))
    }

    async fn release(&self, lock: JobLock<Acquired>) {
        let data = lock.release();
        let mut held = self.held.lock().await;
        // Only the current holder's record is cleared; a reclaimed lock
        // with a newer id stays put.
        if held
            .get(&data.job_name)
            .is_some_and(|existing| existing.lock_id == data.lock_id)
        {
            held.remove(&data.job_name);
        }
    }
}

//! Job lock typestate for scheduled-work coordination.
//!
//! The archival sweep must never overlap itself and must run on exactly
//! one worker. Both constraints reduce to a named, time-bounded
//! mutual-exclusion lock acquired before a run and released after it.
//! The typestate wrapper makes invalid lock lifecycles uncompilable: only
//! an acquired lock can be extended or released, and release consumes it.
//!
//! # State Transition Diagram
//!
//! ```text
//! (unlocked) ─── try_acquire() ──→ Acquired ─── release() ──→ (unlocked)
//!                                      │
//!                                 extend() ↺
//! ```

use crate::{RunId, Timestamp};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::time::Duration;

/// Internal data for a job lock, independent of typestate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLockData {
    pub lock_id: RunId,
    /// Logical name of the job this lock guards.
    pub job_name: String,
    /// Worker that holds the lock.
    pub holder: String,
    pub acquired_at: Timestamp,
    pub expires_at: Timestamp,
}

impl JobLockData {
    /// Check whether the lock has expired as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Remaining duration until expiry, `None` once expired.
    pub fn remaining(&self, now: Timestamp) -> Option<Duration> {
        if now >= self.expires_at {
            None
        } else {
            (self.expires_at - now).to_std().ok()
        }
    }
}

/// Marker trait for lock states.
pub trait LockState: private::Sealed + Send + Sync {}

/// Lock is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquired;
impl LockState for Acquired {}

/// Lock has been released (locks in this state do not exist at runtime;
/// transitions consume the lock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Released;
impl LockState for Released {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Acquired {}
    impl Sealed for super::Released {}
}

/// A job lock with compile-time state tracking.
#[derive(Debug, Clone)]
pub struct JobLock<S: LockState> {
    data: JobLockData,
    _state: PhantomData<S>,
}

impl<S: LockState> JobLock<S> {
    /// Access the underlying lock data (read-only).
    pub fn data(&self) -> &JobLockData {
        &self.data
    }

    /// Get the lock ID.
    pub fn lock_id(&self) -> RunId {
        self.data.lock_id
    }

    /// Get the job name this lock guards.
    pub fn job_name(&self) -> &str {
        &self.data.job_name
    }

    /// Get the holding worker.
    pub fn holder(&self) -> &str {
        &self.data.holder
    }

    /// Get when the lock expires.
    pub fn expires_at(&self) -> Timestamp {
        self.data.expires_at
    }
}

impl JobLock<Acquired> {
    /// Wrap freshly acquired lock data.
    ///
    /// Only lock providers should call this, after winning the acquisition.
    pub fn new(data: JobLockData) -> Self {
        JobLock {
            data,
            _state: PhantomData,
        }
    }

    /// Extend the lock's expiry. Consumes and returns the lock.
    pub fn extend(mut self, additional: Duration) -> Self {
        let additional = chrono::Duration::from_std(additional)
            .unwrap_or_else(|_| chrono::Duration::milliseconds(additional.as_millis() as i64));
        self.data.expires_at += additional;
        self
    }

    /// Release the lock, consuming it and returning the data so the
    /// provider can clear its record.
    pub fn release(self) -> JobLockData {
        self.data
    }

    /// Check whether the lock has expired as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.data.is_expired(now)
    }
}

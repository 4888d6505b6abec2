//! RUMBO Tracking - the location retention pipeline
//!
//! Ties the storage seams together into the pipeline's operations:
//!
//! - `history`: durable write paths with per-subject retention
//!   enforcement (synchronous for direct writes, deferred for archival)
//! - `ingest`: the write-path guard that validates requests before any
//!   storage work
//! - `query`: bounded history reads with derived age fields
//! - `jobs`: the scheduled archival sweep that drains the live cache
//!   into durable history

pub mod history;
pub mod ingest;
pub mod jobs;
pub mod query;

pub use history::{insert_direct, insert_from_archive};
pub use ingest::{
    record_direct, update_live, RecordLocationRequest, RecordLocationResponse, ValidLocationWrite,
};
pub use jobs::archive_sweep::{
    archive_sweep_task, run_locked_sweep, run_sweep, ArchiveSweepConfig, ArchiveSweepMetrics,
    ArchiveSweepSnapshot, SweepFailure, SweepOutcome, SweepReport, SweepStatus, ARCHIVE_SWEEP_JOB,
};
pub use jobs::locks::{InMemoryJobLocks, JobLockProvider};
pub use query::{last_known, recent_history, HistoryQuery, PersistedLocationView};

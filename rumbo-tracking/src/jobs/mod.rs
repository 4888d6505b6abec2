//! Background jobs for the tracking pipeline.
//!
//! - `archive_sweep`: daily migration of live cache entries into durable
//!   history
//! - `locks`: the cooperative named-lock seam that keeps scheduled jobs
//!   from overlapping or running on more than one worker
//!
//! Jobs are spawned during service startup:
//!
//! ```ignore
//! use rumbo_tracking::jobs::archive_sweep::{archive_sweep_task, ArchiveSweepConfig};
//! use tokio::sync::watch;
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! let config = ArchiveSweepConfig::from_env();
//! tokio::spawn(archive_sweep_task(cache, store, locks, config, shutdown_rx));
//!
//! // On shutdown
//! let _ = shutdown_tx.send(true);
//! ```

pub mod archive_sweep;
pub mod locks;

pub use archive_sweep::{archive_sweep_task, ArchiveSweepConfig, ArchiveSweepMetrics};
pub use locks::{InMemoryJobLocks, JobLockProvider};

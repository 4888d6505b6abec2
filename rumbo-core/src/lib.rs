//! RUMBO Core - shared data model for the location tracking pipeline
//!
//! Defines the identifiers, location records, retention policies, error
//! taxonomy, and job-lock typestate used across the RUMBO workspace.
//! Storage implementations live in rumbo-storage; the retention enforcer,
//! ingestion guard, and archival job live in rumbo-tracking.

pub mod error;
pub mod identity;
pub mod location;
pub mod lock;
pub mod policy;

pub use error::{
    CacheError, FieldError, RejectedRequest, StorageError, TrackingError, TrackingResult,
    ValidationError,
};
pub use identity::{new_run_id, LocationId, PackageId, RunId, SubjectId, Timestamp};
pub use location::{LiveLocation, LiveLocationReading, NewPersistedLocation, PersistedLocation};
pub use lock::{Acquired, JobLock, JobLockData, LockState, Released};
pub use policy::{RetentionPolicy, ARCHIVE_SWEEP, DIRECT_WRITE, LIVE_LOCATION_TTL, RECENT_WINDOW};

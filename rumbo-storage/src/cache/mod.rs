//! Ephemeral per-subject location cache.
//!
//! Holds the most recent position per tracked subject with automatic
//! expiry. The backend trait keeps the store pluggable (in-memory here,
//! a networked key/value store in production); the typed layer owns key
//! derivation, the JSON wire format, and decode tolerance.

pub mod live_cache;
pub mod live_key;
pub mod memory_backend;
pub mod traits;

pub use live_cache::{LiveLocationCache, LiveSnapshot, SnapshotDecodeFailure};
pub use live_key::{LiveKey, LIVE_LOCATION_PREFIX};
pub use memory_backend::InMemoryCacheBackend;
pub use traits::{CacheBackend, CacheStats};

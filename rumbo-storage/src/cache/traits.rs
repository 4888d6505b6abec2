//! Cache backend trait for the ephemeral location store.

use async_trait::async_trait;
use rumbo_core::CacheError;
use std::time::Duration;

/// Cache backend trait for pluggable ephemeral stores.
///
/// Backends hold opaque byte payloads under string keys with a per-key
/// time-to-live. Expired entries must be invisible to `get` and `scan`;
/// whether they are dropped eagerly or lazily is implementation-defined.
/// Implementations must be thread-safe.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Store a payload under `key`, replacing any prior value and
    /// resetting the entry's TTL.
    async fn put(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Fetch the payload at `key` if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Every live (non-expired) entry whose key starts with `prefix`.
    async fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, CacheError>;

    /// Remove the entry at `key`. Idempotent; returns whether a live
    /// entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Get cache statistics.
    async fn stats(&self) -> Result<CacheStats, CacheError>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of live entries currently in cache.
    pub entry_count: u64,
    /// Number of entries retired by TTL expiry.
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

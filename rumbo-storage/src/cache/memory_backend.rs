//! In-memory cache backend with per-key TTL.

use super::traits::{CacheBackend, CacheStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rumbo_core::CacheError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    payload: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// In-memory `CacheBackend` with per-key expiry.
///
/// Expired entries are invisible to reads and scans and are dropped
/// lazily when touched. The backend clock can be moved forward with
/// [`advance`](Self::advance) so expiry behavior is testable without
/// waiting on wall time.
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    entries: RwLock<HashMap<String, Entry>>,
    /// Seconds added to wall-clock time; test hook for TTL expiry.
    clock_offset_secs: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
}

impl InMemoryCacheBackend {
    /// Create a new, empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the backend's clock forward by `duration`.
    ///
    /// Entries whose TTL falls inside the skipped span become expired
    /// immediately.
    pub fn advance(&self, duration: Duration) {
        self.clock_offset_secs
            .fetch_add(duration.as_secs(), Ordering::Relaxed);
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now() + chrono::Duration::seconds(self.clock_offset_secs.load(Ordering::Relaxed) as i64)
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn put(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let ttl = chrono::Duration::from_std(ttl)
            .unwrap_or_else(|_| chrono::Duration::seconds(ttl.as_secs() as i64));
        let entry = Entry {
            payload,
            expires_at: self.now() + ttl,
        };
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = self.now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(Some(entry.payload.clone()));
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return Ok(None);
                }
            }
        }
        // The entry expired; drop it under the write lock if still there.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    async fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, CacheError> {
        let now = self.now();
        let mut entries = self.entries.write().await;

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            entries.remove(key);
        }
        self.expirations
            .fetch_add(expired.len() as u64, Ordering::Relaxed);

        let mut live: Vec<(String, Vec<u8>)> = entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, e)| (k.clone(), e.payload.clone()))
            .collect();
        live.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(live)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let now = self.now();
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some(entry) if entry.expires_at > now => Ok(true),
            Some(_) => {
                self.expirations.fetch_add(1, Ordering::Relaxed);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let now = self.now();
        let entries = self.entries.read().await;
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: entries.values().filter(|e| e.expires_at > now).count() as u64,
            expirations: self.expirations.load(Ordering::Relaxed),
        })
    }
}

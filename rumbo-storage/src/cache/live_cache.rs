//! Typed live-location store over a cache backend.

use super::live_key::{LiveKey, LIVE_LOCATION_PREFIX};
use super::traits::CacheBackend;
use chrono::Utc;
use rumbo_core::{
    policy, CacheError, LiveLocation, LiveLocationReading, PackageId, SubjectId,
};
use std::collections::HashMap;

/// Typed store for the most recent position per tracked subject.
///
/// Values are JSON-serialized `LiveLocation` payloads under per-subject
/// keys with a fixed 600 second TTL. A write for a subject fully replaces
/// the prior value and resets its expiry; there is no refresh that does
/// not also overwrite.
pub struct LiveLocationCache<B: CacheBackend> {
    backend: B,
}

impl<B: CacheBackend> LiveLocationCache<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Write the current position for a subject, replacing any prior
    /// value unconditionally and resetting the TTL clock.
    ///
    /// Returns the stored value so callers can echo the accepted fix back
    /// to the client.
    pub async fn put(
        &self,
        subject_id: SubjectId,
        package_id: Option<PackageId>,
        latitude: f64,
        longitude: f64,
    ) -> Result<LiveLocation, CacheError> {
        let location = LiveLocation::capture(subject_id, package_id, latitude, longitude);
        let payload = serde_json::to_vec(&location).map_err(|e| CacheError::Unavailable {
            reason: format!("payload serialization failed: {e}"),
        })?;
        self.backend
            .put(
                &LiveKey::new(subject_id).encode(),
                payload,
                policy::LIVE_LOCATION_TTL,
            )
            .await?;
        Ok(location)
    }

    /// Current position for a subject, if a live entry exists.
    ///
    /// `None` is the expected outcome once the TTL elapses, not an error.
    /// A present-but-undecodable entry is a [`CacheError::Decode`].
    pub async fn get(
        &self,
        subject_id: SubjectId,
    ) -> Result<Option<LiveLocationReading>, CacheError> {
        let key = LiveKey::new(subject_id).encode();
        let Some(payload) = self.backend.get(&key).await? else {
            return Ok(None);
        };
        let location: LiveLocation =
            serde_json::from_slice(&payload).map_err(|e| CacheError::Decode {
                key,
                reason: e.to_string(),
            })?;
        Ok(Some(LiveLocationReading::from_location(location, Utc::now())))
    }

    /// Snapshot every currently live entry.
    ///
    /// Entries that fail to decode are skipped and recorded in the
    /// snapshot rather than aborting the listing; the archival sweep
    /// counts them as per-item errors.
    pub async fn list_all(&self) -> Result<LiveSnapshot, CacheError> {
        let mut entries = HashMap::new();
        let mut decode_failures = Vec::new();
        for (key, payload) in self.backend.scan(LIVE_LOCATION_PREFIX).await? {
            let Some(live_key) = LiveKey::decode(&key) else {
                decode_failures.push(SnapshotDecodeFailure {
                    key,
                    reason: "malformed key".to_string(),
                });
                continue;
            };
            match serde_json::from_slice::<LiveLocation>(&payload) {
                Ok(location) => {
                    entries.insert(live_key.subject_id(), location);
                }
                Err(e) => decode_failures.push(SnapshotDecodeFailure {
                    key,
                    reason: e.to_string(),
                }),
            }
        }
        Ok(LiveSnapshot {
            entries,
            decode_failures,
        })
    }

    /// Remove a subject's live entry. Idempotent; returns whether a live
    /// entry was removed.
    pub async fn delete(&self, subject_id: SubjectId) -> Result<bool, CacheError> {
        self.backend
            .delete(&LiveKey::new(subject_id).encode())
            .await
    }
}

/// Snapshot of every live entry, plus the entries that could not be
/// decoded.
#[derive(Debug, Clone, Default)]
pub struct LiveSnapshot {
    pub entries: HashMap<SubjectId, LiveLocation>,
    pub decode_failures: Vec<SnapshotDecodeFailure>,
}

impl LiveSnapshot {
    /// Total entries seen, decodable or not.
    pub fn len(&self) -> usize {
        self.entries.len() + self.decode_failures.len()
    }

    /// True when the cache held nothing live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A cache entry that existed but could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDecodeFailure {
    pub key: String,
    pub reason: String,
}

//! Live and persisted location records.

use crate::policy;
use crate::{LocationId, PackageId, SubjectId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Most recent known position for a tracked subject.
///
/// Held ephemerally: one per subject at any instant, fully replaced by
/// the next write, retired automatically by the cache TTL. `captured_at`
/// serializes as an ISO-8601 string; `captured_at_unix` carries the same
/// instant as Unix seconds for clients that consume epoch values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveLocation {
    pub subject_id: SubjectId,
    pub package_id: Option<PackageId>,
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: Timestamp,
    pub captured_at_unix: i64,
}

impl LiveLocation {
    /// Build a live location captured now.
    pub fn capture(
        subject_id: SubjectId,
        package_id: Option<PackageId>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            subject_id,
            package_id,
            latitude,
            longitude,
            captured_at: now,
            captured_at_unix: now.timestamp(),
        }
    }

    /// Whole minutes elapsed since capture, never negative.
    pub fn age_minutes(&self, now: Timestamp) -> i64 {
        (now - self.captured_at).num_minutes().max(0)
    }
}

/// A live location as returned by cache reads, with derived staleness
/// fields so callers do not recompute ages inconsistently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveLocationReading {
    pub location: LiveLocation,
    /// True if the reading is at most five minutes old.
    pub is_recent: bool,
    pub minutes_ago: i64,
}

impl LiveLocationReading {
    /// Derive the staleness fields for `location` as of `now`.
    pub fn from_location(location: LiveLocation, now: Timestamp) -> Self {
        let age_secs = (now - location.captured_at).num_seconds().max(0);
        Self {
            is_recent: age_secs <= policy::RECENT_WINDOW.as_secs() as i64,
            minutes_ago: location.age_minutes(now),
            location,
        }
    }
}

/// A durably stored position record.
///
/// Never updated after creation; deleted only by retention enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedLocation {
    pub id: LocationId,
    pub subject_id: SubjectId,
    pub package_id: Option<PackageId>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for the durable history store.
///
/// `created_at` defaults to insert time when absent; the archival path
/// supplies the original capture time so history preserves event time
/// rather than archival time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPersistedLocation {
    pub subject_id: SubjectId,
    pub package_id: Option<PackageId>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Option<Timestamp>,
}

impl NewPersistedLocation {
    /// Payload for a direct durable write, stamped at insert time.
    pub fn direct(
        subject_id: SubjectId,
        package_id: Option<PackageId>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            subject_id,
            package_id,
            latitude,
            longitude,
            created_at: None,
        }
    }

    /// Payload copying a live cache entry, preserving its capture time.
    pub fn from_live(live: &LiveLocation) -> Self {
        Self {
            subject_id: live.subject_id,
            package_id: live.package_id,
            latitude: live.latitude,
            longitude: live.longitude,
            created_at: Some(live.captured_at),
        }
    }
}

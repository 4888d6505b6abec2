//! Deterministic cache keys for live locations.
//!
//! A key can only be built from a `SubjectId`, so every cache operation
//! is scoped to exactly one subject by construction. That is what keeps
//! the "at most one live entry per subject" invariant cheap: overwriting
//! a subject's position is a plain put under the same key.

use rumbo_core::SubjectId;

/// Key prefix shared by every live location entry; snapshot scans use it
/// to enumerate the whole live set.
pub const LIVE_LOCATION_PREFIX: &str = "live_location:";

/// A cache key scoped to a single tracked subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiveKey {
    subject_id: SubjectId,
}

impl LiveKey {
    /// Create the key for a subject.
    pub fn new(subject_id: SubjectId) -> Self {
        Self { subject_id }
    }

    /// Get the subject this key is scoped to.
    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    /// Encode to the string form stored in the backend.
    pub fn encode(&self) -> String {
        format!("{LIVE_LOCATION_PREFIX}{}", self.subject_id)
    }

    /// Decode a key from its stored form.
    ///
    /// Returns `None` if the prefix is missing or the id does not parse;
    /// snapshot listings count such keys as decode failures rather than
    /// aborting.
    pub fn decode(key: &str) -> Option<Self> {
        let raw = key.strip_prefix(LIVE_LOCATION_PREFIX)?;
        let id: i64 = raw.parse().ok()?;
        Some(Self {
            subject_id: SubjectId(id),
        })
    }
}

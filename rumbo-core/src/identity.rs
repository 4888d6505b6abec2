//! Identity types for RUMBO entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Identifier for archival runs and job locks, using UUIDv7 for
/// timestamp-sortable ids.
pub type RunId = Uuid;

/// Generate a new RunId (timestamp-sortable).
pub fn new_run_id() -> RunId {
    Uuid::now_v7()
}

/// Tracked subject identifier (a child on a trip).
///
/// Owned by the enrollment domain; the pipeline references subjects by id
/// only and never mutates them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubjectId(pub i64);

/// Trip package identifier, owned by the package domain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PackageId(pub i64);

/// Store-assigned identifier for a persisted location record.
///
/// Monotonically increasing and never reused, so it doubles as a stable
/// tie-break when ordering records that share a `created_at`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LocationId(pub i64);

macro_rules! impl_id_display {
    ($($t:ty),*) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<i64> for $t {
                fn from(raw: i64) -> Self {
                    Self(raw)
                }
            }
        )*
    };
}

impl_id_display!(SubjectId, PackageId, LocationId);

//! Read queries over durable history.
//!
//! Reporting handlers call these with caller-supplied bounds; the bounds
//! are validated here so every caller gets the same limits. Not-found is
//! a normal empty result (`None` / empty vec), distinct from a
//! validation failure.

use chrono::{Duration, Utc};
use rumbo_core::{
    FieldError, PersistedLocation, RejectedRequest, SubjectId, Timestamp, TrackingResult,
    ValidationError,
};
use rumbo_storage::LocationHistoryStore;
use serde::{Deserialize, Serialize};

/// Largest number of records one history read may return.
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Smallest and largest history time windows, in hours.
pub const MIN_WINDOW_HOURS: i64 = 1;
pub const MAX_WINDOW_HOURS: i64 = 168;

/// History read parameters as supplied by the reporting handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HistoryQuery {
    /// Maximum records to return, bounded to [1, 100].
    pub limit: usize,
    /// How far back to look, bounded to [1, 168] hours.
    pub window_hours: i64,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            window_hours: 24,
        }
    }
}

impl HistoryQuery {
    /// Validate the bounds, collecting every failure.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors: Vec<FieldError> = Vec::new();
        if self.limit < 1 || self.limit > MAX_HISTORY_LIMIT {
            errors.push(
                ValidationError::InvalidValue {
                    field: "limit".to_string(),
                    reason: format!("must be between 1 and {MAX_HISTORY_LIMIT}"),
                }
                .into(),
            );
        }
        if self.window_hours < MIN_WINDOW_HOURS || self.window_hours > MAX_WINDOW_HOURS {
            errors.push(
                ValidationError::InvalidValue {
                    field: "window_hours".to_string(),
                    reason: format!(
                        "must be between {MIN_WINDOW_HOURS} and {MAX_WINDOW_HOURS}"
                    ),
                }
                .into(),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A persisted record with derived age fields for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct PersistedLocationView {
    #[serde(flatten)]
    pub location: PersistedLocation,
    pub age_minutes: i64,
    pub age_display: String,
}

impl PersistedLocationView {
    fn from_location(location: PersistedLocation, now: Timestamp) -> Self {
        let age = now - location.created_at;
        Self {
            age_minutes: age.num_minutes().max(0),
            age_display: relative_age(age),
            location,
        }
    }
}

/// Human-relative rendering of a record's age.
fn relative_age(age: Duration) -> String {
    let minutes = age.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} minute{} ago", plural(minutes))
    } else if minutes < 24 * 60 {
        let hours = age.num_hours();
        format!("{hours} hour{} ago", plural(hours))
    } else {
        let days = age.num_days();
        format!("{days} day{} ago", plural(days))
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Most-recent records for a subject inside the query window, newest
/// first.
pub async fn recent_history<S>(
    store: &S,
    subject_id: SubjectId,
    query: HistoryQuery,
) -> TrackingResult<Vec<PersistedLocationView>>
where
    S: LocationHistoryStore + ?Sized,
{
    query
        .validate()
        .map_err(|errors| RejectedRequest { errors })?;
    let now = Utc::now();
    let cutoff = now - Duration::hours(query.window_hours);
    let records = store.most_recent(subject_id, query.limit).await?;
    Ok(records
        .into_iter()
        .filter(|r| r.created_at >= cutoff)
        .map(|r| PersistedLocationView::from_location(r, now))
        .collect())
}

/// Last known durable position for a subject.
///
/// `None` when the subject has no history at all; callers map that to
/// their not-found response.
pub async fn last_known<S>(
    store: &S,
    subject_id: SubjectId,
) -> TrackingResult<Option<PersistedLocationView>>
where
    S: LocationHistoryStore + ?Sized,
{
    let now = Utc::now();
    let mut records = store.most_recent(subject_id, 1).await?;
    Ok(records
        .pop()
        .map(|r| PersistedLocationView::from_location(r, now)))
}

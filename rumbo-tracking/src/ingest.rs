//! Write-path ingestion guard.
//!
//! Validation runs before any storage work: a malformed request is
//! rejected with a structured per-field error list and never triggers
//! cap-enforcement deletes. Subject existence is owned by the enrollment
//! domain; this guard checks shape and range only.

use crate::history;
use rumbo_core::{
    FieldError, LiveLocation, PackageId, PersistedLocation, RejectedRequest, SubjectId,
    TrackingResult, ValidationError,
};
use rumbo_storage::cache::LiveLocationCache;
use rumbo_storage::{CacheBackend, LocationHistoryStore};
use serde::{Deserialize, Serialize};

/// Raw location write as supplied by the ingestion handler.
///
/// Every field is optional at this layer so that missing and mistyped
/// input surfaces as a per-field validation error instead of a
/// deserialization failure.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecordLocationRequest {
    pub subject_id: Option<i64>,
    pub package_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A write that passed the ingestion guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidLocationWrite {
    pub subject_id: SubjectId,
    pub package_id: Option<PackageId>,
    pub latitude: f64,
    pub longitude: f64,
}

impl RecordLocationRequest {
    /// Validate presence, types, and ranges, collecting every failure.
    pub fn validate(&self) -> Result<ValidLocationWrite, Vec<FieldError>> {
        let mut errors: Vec<FieldError> = Vec::new();

        let subject_id = match self.subject_id {
            Some(id) if id > 0 => Some(SubjectId(id)),
            Some(_) => {
                errors.push(invalid("subject_id", "must be a positive integer"));
                None
            }
            None => {
                errors.push(missing("subject_id"));
                None
            }
        };

        let package_id = match self.package_id {
            Some(id) if id > 0 => Some(PackageId(id)),
            Some(_) => {
                errors.push(invalid("package_id", "must be a positive integer"));
                None
            }
            None => None,
        };

        let latitude = match self.latitude {
            Some(lat) if lat.is_finite() && (-90.0..=90.0).contains(&lat) => Some(lat),
            Some(_) => {
                errors.push(invalid("latitude", "must be between -90 and 90"));
                None
            }
            None => {
                errors.push(missing("latitude"));
                None
            }
        };

        let longitude = match self.longitude {
            Some(lon) if lon.is_finite() && (-180.0..=180.0).contains(&lon) => Some(lon),
            Some(_) => {
                errors.push(invalid("longitude", "must be between -180 and 180"));
                None
            }
            None => {
                errors.push(missing("longitude"));
                None
            }
        };

        match (subject_id, latitude, longitude) {
            (Some(subject_id), Some(latitude), Some(longitude)) if errors.is_empty() => {
                Ok(ValidLocationWrite {
                    subject_id,
                    package_id,
                    latitude,
                    longitude,
                })
            }
            _ => Err(errors),
        }
    }
}

fn missing(field: &str) -> FieldError {
    ValidationError::RequiredFieldMissing {
        field: field.to_string(),
    }
    .into()
}

fn invalid(field: &str, reason: &str) -> FieldError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Response for a successful direct durable write.
#[derive(Debug, Clone, Serialize)]
pub struct RecordLocationResponse {
    pub status: &'static str,
    pub location: PersistedLocation,
}

/// Validate and commit a direct durable write (the slow path: immediately
/// durable, capacity-guarded at write time).
///
/// A validation failure comes back as `TrackingError::Validation` carrying
/// the full per-field error list and touches no storage.
pub async fn record_direct<S>(
    store: &S,
    request: &RecordLocationRequest,
) -> TrackingResult<RecordLocationResponse>
where
    S: LocationHistoryStore + ?Sized,
{
    let write = request
        .validate()
        .map_err(|errors| RejectedRequest { errors })?;
    let location = history::insert_direct(
        store,
        write.subject_id,
        write.package_id,
        write.latitude,
        write.longitude,
    )
    .await?;
    tracing::info!(subject_id = %location.subject_id, id = %location.id, "recorded direct location");
    Ok(RecordLocationResponse {
        status: "created",
        location,
    })
}

/// Validate and write the fast, ephemeral path: the subject's current
/// position in the live cache.
///
/// `CacheError::Unavailable` surfaces to the caller as a transient
/// failure.
pub async fn update_live<B>(
    cache: &LiveLocationCache<B>,
    request: &RecordLocationRequest,
) -> TrackingResult<LiveLocation>
where
    B: CacheBackend,
{
    let write = request
        .validate()
        .map_err(|errors| RejectedRequest { errors })?;
    let live = cache
        .put(
            write.subject_id,
            write.package_id,
            write.latitude,
            write.longitude,
        )
        .await?;
    Ok(live)
}

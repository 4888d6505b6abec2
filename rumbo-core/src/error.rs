//! Error types for RUMBO tracking operations

use crate::{LocationId, SubjectId};
use serde::Serialize;
use thiserror::Error;

/// Validation errors for a single request field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    /// The field this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::RequiredFieldMissing { field } => field,
            ValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// Per-field entry in a structured validation failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        Self {
            field: err.field().to_string(),
            message,
        }
    }
}

/// A request rejected before any storage work, carrying every failed field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Request rejected: {} invalid field(s)", .errors.len())]
pub struct RejectedRequest {
    pub errors: Vec<FieldError>,
}

impl From<ValidationError> for RejectedRequest {
    fn from(err: ValidationError) -> Self {
        Self {
            errors: vec![err.into()],
        }
    }
}

/// Ephemeral cache store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Undecodable cache entry at {key}: {reason}")]
    Decode { key: String, reason: String },
}

/// Durable history store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Location not found: {id}")]
    NotFound { id: LocationId },

    #[error("Insert failed for subject {subject_id}: {reason}")]
    InsertFailed {
        subject_id: SubjectId,
        reason: String,
    },

    #[error("Delete failed: {reason}")]
    DeleteFailed { reason: String },

    #[error("Query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Master error type for pipeline operations.
#[derive(Debug, Clone, Error)]
pub enum TrackingError {
    #[error("Validation error: {0}")]
    Validation(#[from] RejectedRequest),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Operation timed out: {operation}")]
    Timeout { operation: &'static str },
}

/// Result type alias for pipeline operations.
pub type TrackingResult<T> = Result<T, TrackingError>;

// =============================================================================
// TESTS
// =============================================================================

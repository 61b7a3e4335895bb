//! # Service Error Taxonomy
//!
//! The five outcomes every operation can produce.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Taxonomy                                       │
//! │                                                                         │
//! │  Validation ← input malformed; reported per field, nothing ran          │
//! │  NotFound   ← referenced entity does not exist                          │
//! │  Forbidden  ← entity exists, actor may not act on it                    │
//! │  Conflict   ← state rejects the action (overlap, duplicate, cap)        │
//! │  Internal   ← infrastructure failure; retries already exhausted         │
//! │                                                                         │
//! │  Ordering per operation:                                                 │
//! │  validation → existence → authorization → state conflicts               │
//! │  so a caller never learns about state they may not act on.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use stays_core::conflict::ConflictFields;
use stays_core::{AuthzDenied, ValidationError};
use stays_db::DbError;

/// Caller-facing errors for all service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation. Carries every failing field so the caller
    /// can correct the request in one round trip.
    #[error("validation failed: {}", format_fields(.0))]
    Validation(Vec<ValidationError>),

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The actor is not permitted to perform this action.
    #[error("forbidden: {0}")]
    Forbidden(#[from] AuthzDenied),

    /// Current state rejects the action: a date overlap, a duplicate
    /// review, or the per-review image cap.
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        /// Fields the caller must change to resolve the conflict,
        /// empty when no single field is at fault.
        fields: Vec<&'static str>,
    },

    /// Infrastructure failure. Transient store contention is retried
    /// before this surfaces.
    #[error("internal error: {0}")]
    Internal(String),
}

fn format_fields(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ServiceError {
    /// A NotFound for the given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// A Conflict with a message and no field attribution.
    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// The booking-overlap Conflict, attributing the colliding date fields.
    pub fn booking_conflict(fields: ConflictFields) -> Self {
        let mut named = Vec::new();
        if fields.start_date {
            named.push("start_date");
        }
        if fields.end_date {
            named.push("end_date");
        }
        ServiceError::Conflict {
            message: "the unit is already booked for the requested dates".to_string(),
            fields: named,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(vec![err])
    }
}

impl From<Vec<ValidationError>> for ServiceError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ServiceError::Validation(errors)
    }
}

/// Map database errors into the taxonomy.
///
/// ## Error Mapping
/// ```text
/// DbError::NotFound         → NotFound
/// DbError::UniqueViolation  → Conflict (the schema backstop fired)
/// DbError::ForeignKey...    → Conflict (parent vanished mid-flight)
/// everything else           → Internal
/// ```
/// Busy reaches this conversion only after the service's retry budget is
/// spent, at which point it is an infrastructure failure.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::NotFound {
                entity: entity_label(&entity),
                id,
            },
            DbError::UniqueViolation { field } => {
                ServiceError::conflict(format!("duplicate value for {field}"))
            }
            DbError::ForeignKeyViolation { .. } => {
                ServiceError::conflict("a referenced record no longer exists")
            }
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

// The repository layer names entities from a small closed set; map them back
// to static strings rather than carrying arbitrary allocations.
fn entity_label(entity: &str) -> &'static str {
    match entity {
        "Unit" => "Unit",
        "Booking" => "Booking",
        "Review" => "Review",
        "Image" => "Image",
        _ => "Record",
    }
}

/// Result type for all service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

//! # Error Types
//!
//! Domain-specific error types for stays-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stays-core errors (this file)                                         │
//! │  ├── ValidationError  - Input validation failures (per field)          │
//! │  └── AuthzDenied      - Authorization resolver denials                 │
//! │                                                                         │
//! │  stays-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  stays-service errors (separate crate)                                 │
//! │  └── ServiceError     - What callers see (the full taxonomy)           │
//! │                                                                         │
//! │  Flow: ValidationError / AuthzDenied / DbError → ServiceError → Caller │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in validation errors
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// They are resolved synchronously, before any transaction opens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// A date lies before the current date.
    #[error("{field} cannot be in the past")]
    InPast { field: String },

    /// A date fails to come strictly after another date.
    #[error("{field} cannot be on or before {other}")]
    NotAfter { field: String, other: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InPast { field }
            | ValidationError::NotAfter { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Authorization Denial
// =============================================================================

/// Denials produced by the authorization resolver.
///
/// ## When These Occur
/// The resolver in [`crate::authz`] is a pure decision over ownership facts
/// the caller already fetched. Every variant maps to a Forbidden outcome at
/// the service boundary; the variants exist so callers can log and report
/// *why* an action was denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzDenied {
    /// The actor does not own the resource the action requires.
    #[error("only the {resource} owner may perform this action")]
    NotOwner { resource: &'static str },

    /// A unit owner attempted to book their own unit.
    #[error("unit owners cannot book their own unit")]
    SelfBooking,

    /// A unit owner attempted to review their own unit.
    #[error("unit owners cannot review their own unit")]
    SelfReview,

    /// The booking's start date has been reached; it is immutable.
    #[error("bookings that have started cannot be modified")]
    BookingStarted,
}

// =============================================================================
// Unit Tests
// =============================================================================

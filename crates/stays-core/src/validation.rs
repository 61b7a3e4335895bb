//! # Validation Module
//!
//! Input validation for Stays.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                   │
//! │                                                                         │
//! │  Layer 1: Service boundary (Rust)                                       │
//! │  ├── THIS MODULE: field checks, resolved BEFORE any transaction        │
//! │  └── Per-field errors so callers can correct the request               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Transaction manager                                           │
//! │  └── Conflict checks against rows read inside the transaction          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE(unit_id, author_id) on reviews                              │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::conflict::DateRange;
use crate::error::ValidationError;
use crate::{MAX_RATING, MAX_UNIT_NAME_LEN, MIN_RATING};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Booking Dates
// =============================================================================

/// Validates a proposed booking range against the current date.
///
/// ## Rules
/// - `start_date` must not be in the past (today itself is allowed)
/// - `end_date` must be strictly after `start_date` (no zero-length stays)
///
/// ## Returns
/// All failing fields at once, so a caller who got both dates wrong fixes
/// the request in one round trip.
pub fn validate_booking_dates(
    range: &DateRange,
    today: NaiveDate,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if range.start < today {
        errors.push(ValidationError::InPast {
            field: "start_date".to_string(),
        });
    }

    if range.end <= range.start {
        errors.push(ValidationError::NotAfter {
            field: "end_date".to_string(),
            other: "start_date".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// Validates a star rating (1 through 5 inclusive).
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING,
            max: MAX_RATING,
        });
    }

    Ok(())
}

/// Validates review body text.
///
/// ## Rules
/// - Must not be empty or whitespace-only
pub fn validate_review_text(text: &str) -> ValidationResult<()> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "text".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Units
// =============================================================================

/// Validates a unit name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
pub fn validate_unit_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_UNIT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_UNIT_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Images
// =============================================================================

/// Validates an image URL.
///
/// Storage is an external collaborator; the core only requires the field
/// to be present.
pub fn validate_url(url: &str) -> ValidationResult<()> {
    if url.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "url".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use stays_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_booking_dates_valid() {
        let today = date(2025, 6, 1);
        let range = DateRange::new(date(2025, 6, 10), date(2025, 6, 15));
        assert!(validate_booking_dates(&range, today).is_ok());

        // Starting today is allowed
        let range = DateRange::new(today, date(2025, 6, 5));
        assert!(validate_booking_dates(&range, today).is_ok());
    }

    #[test]
    fn test_booking_dates_past_start() {
        let today = date(2025, 6, 1);
        let range = DateRange::new(date(2025, 5, 20), date(2025, 6, 15));

        let errors = validate_booking_dates(&range, today).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "start_date");
    }

    #[test]
    fn test_booking_dates_inverted() {
        let today = date(2025, 6, 1);

        // end == start: zero-length stay
        let range = DateRange::new(date(2025, 6, 10), date(2025, 6, 10));
        let errors = validate_booking_dates(&range, today).unwrap_err();
        assert_eq!(errors[0].field(), "end_date");

        // end < start
        let range = DateRange::new(date(2025, 6, 10), date(2025, 6, 5));
        assert!(validate_booking_dates(&range, today).is_err());
    }

    #[test]
    fn test_booking_dates_both_fields_reported() {
        let today = date(2025, 6, 1);
        let range = DateRange::new(date(2025, 5, 10), date(2025, 5, 5));

        let errors = validate_booking_dates(&range, today).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["start_date", "end_date"]);
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());

        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-1).is_err());
    }

    #[test]
    fn test_validate_review_text() {
        assert!(validate_review_text("great stay").is_ok());
        assert!(validate_review_text("").is_err());
        assert!(validate_review_text("   ").is_err());
    }

    #[test]
    fn test_validate_unit_name() {
        assert!(validate_unit_name("Lakeside cabin").is_ok());
        assert!(validate_unit_name("").is_err());
        assert!(validate_unit_name(&"a".repeat(51)).is_err());
        assert!(validate_unit_name(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://img.example/1.jpg").is_ok());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}

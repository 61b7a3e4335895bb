//! # Domain Types
//!
//! Core domain types used throughout Stays.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Unit       │   │     Booking     │   │     Review      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  owner_id       │   │  unit_id (FK)   │   │  unit_id (FK)   │       │
//! │  │  name           │   │  guest_id       │   │  author_id      │       │
//! │  │  description    │   │  start/end date │   │  rating, text   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      Image      │   │   ImageParent   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id (UUID)      │   │  Unit(id)       │  exactly one parent,        │
//! │  │  owner_id, url  │   │  Review(id)     │  enforced by the type       │
//! │  │  preview flag   │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Booking Status Is Derived, Never Stored
//! A booking row existing means Confirmed. `today >= start_date` means
//! Started (immutable). Cancellation hard-deletes the row, freeing the
//! interval immediately. There is no status column to drift out of sync.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::DateRange;

// =============================================================================
// Unit
// =============================================================================

/// A rentable listing owned by a host actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Unit {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Actor who owns this unit. Opaque id issued by the external
    /// authentication layer; not a foreign key.
    pub owner_id: String,

    /// Display name.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Booking
// =============================================================================

/// A guest's reservation of a unit for a half-open date interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The unit this booking reserves.
    pub unit_id: String,

    /// Actor who created the booking. Never the unit's owner.
    pub guest_id: String,

    /// Checkin day (first occupied night). Always `< end_date`.
    pub start_date: NaiveDate,

    /// Checkout day (excluded from the occupied interval).
    pub end_date: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns the occupied interval as a half-open [`DateRange`].
    #[inline]
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Whether the booking has started relative to the given date.
    ///
    /// A started booking is immutable: update and cancel both fail.
    #[inline]
    pub fn started(&self, today: NaiveDate) -> bool {
        today >= self.start_date
    }
}

/// The dates-only view of a booking shown to actors who do not own the unit.
///
/// A privacy-shaping rule, not an authorization failure: non-owners may see
/// when a unit is occupied but never by whom.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookingPeriod {
    pub unit_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Role-shaped result of listing a unit's bookings.
///
/// Distinct typed reads per role instead of one polymorphic query: the unit
/// owner sees full records including guest identity, everyone else sees
/// occupied date ranges only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", content = "bookings", rename_all = "snake_case")]
pub enum BookingList {
    /// Full booking records, returned to the unit's owner.
    Owner(Vec<Booking>),
    /// Occupied periods only, returned to any other actor.
    Guest(Vec<BookingPeriod>),
}

// =============================================================================
// Review
// =============================================================================

/// A guest's review of a unit. At most one per (author, unit) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Review {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The unit being reviewed.
    pub unit_id: String,

    /// Actor who wrote the review.
    pub author_id: String,

    /// Star rating, 1 through 5 inclusive.
    pub rating: i64,

    /// Review body.
    pub text: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Image
// =============================================================================

/// An uploaded image attached to exactly one parent (a unit or a review).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Image {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Actor who uploaded the image.
    pub owner_id: String,

    /// Stored URL; storage itself is an external collaborator.
    pub url: String,

    /// Parent unit, when unit-scoped. Mutually exclusive with `review_id`.
    pub unit_id: Option<String>,

    /// Parent review, when review-scoped. Mutually exclusive with `unit_id`.
    pub review_id: Option<String>,

    /// Whether this is the unit's preview image. Always false for
    /// review-scoped images. At most one per unit.
    pub preview: bool,

    pub created_at: DateTime<Utc>,
}

impl Image {
    /// Returns the image's parent reference.
    ///
    /// The database CHECK constraint guarantees exactly one parent id is
    /// set; a row violating that never loads, so this never needs to guess.
    pub fn parent(&self) -> Option<ImageParent> {
        match (&self.unit_id, &self.review_id) {
            (Some(unit_id), None) => Some(ImageParent::Unit(unit_id.clone())),
            (None, Some(review_id)) => Some(ImageParent::Review(review_id.clone())),
            _ => None,
        }
    }
}

/// The parent an image is attached to: exactly one of a unit or a review.
///
/// Callers construct this directly, so "both parents" and "neither parent"
/// are unrepresentable at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ImageParent {
    Unit(String),
    Review(String),
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

    fn booking(start: NaiveDate, end: NaiveDate) -> Booking {
        Booking {
            id: "b-1".to_string(),
            unit_id: "u-1".to_string(),
            guest_id: "g-1".to_string(),
            start_date: start,
            end_date: end,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_booking_started() {
        let b = booking(date(2025, 6, 10), date(2025, 6, 15));

        assert!(!b.started(date(2025, 6, 9)));
        // Start date itself counts as started
        assert!(b.started(date(2025, 6, 10)));
        assert!(b.started(date(2025, 6, 11)));
    }

    #[test]
    fn test_booking_range() {
        let b = booking(date(2025, 6, 10), date(2025, 6, 15));
        let r = b.range();
        assert_eq!(r.start, date(2025, 6, 10));
        assert_eq!(r.end, date(2025, 6, 15));
    }

    #[test]
    fn test_booking_list_tags_the_view() {
        let json = serde_json::to_value(BookingList::Guest(vec![BookingPeriod {
            unit_id: "u-1".to_string(),
            start_date: date(2025, 6, 10),
            end_date: date(2025, 6, 15),
        }]))
        .unwrap();

        assert_eq!(json["view"], "guest");
        // Guest view never carries guest identity
        assert!(json["bookings"][0].get("guest_id").is_none());
    }

    #[test]
    fn test_image_parent() {
        let img = Image {
            id: "i-1".to_string(),
            owner_id: "a-1".to_string(),
            url: "https://img.example/1.jpg".to_string(),
            unit_id: Some("u-1".to_string()),
            review_id: None,
            preview: true,
            created_at: Utc::now(),
        };
        assert_eq!(img.parent(), Some(ImageParent::Unit("u-1".to_string())));

        let img = Image {
            unit_id: None,
            review_id: Some("r-1".to_string()),
            preview: false,
            ..img
        };
        assert_eq!(img.parent(), Some(ImageParent::Review("r-1".to_string())));
    }
}

//! # Interval Conflict Detection
//!
//! Half-open date intervals and the booking overlap test.
//!
//! ## Why Half-Open Intervals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Half-Open Interval [start, end)                        │
//! │                                                                         │
//! │  Booking A: [Jan 1, Jan 5)     ████████████░                            │
//! │  Booking B: [Jan 5, Jan 10)               ░████████████                 │
//! │                                           ▲                             │
//! │                                           Jan 5                         │
//! │                                                                         │
//! │  Guest A checks out the morning of Jan 5; guest B checks in the        │
//! │  afternoon of Jan 5. The end date is EXCLUDED, so A and B do NOT       │
//! │  conflict. Same-day checkout/checkin is always allowed.                │
//! │                                                                         │
//! │  Overlap test: a.start < b.end AND b.start < a.end                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity Contract
//! Everything here is pure and total: no I/O, no clock reads, no state.
//! The caller (the reservation transaction manager) is responsible for
//! evaluating these functions against bookings read *inside* the same
//! transaction that performs the insert.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Date Range
// =============================================================================

/// A half-open calendar date interval `[start, end)`.
///
/// The end date itself is excluded: a booking ending on day D and a booking
/// starting on day D occupy disjoint sets of nights.
///
/// ## Invariant
/// `start < end` for every range that reaches conflict detection. Inverted
/// or empty ranges are rejected upstream by
/// [`crate::validation::validate_booking_dates`] and never reach this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First occupied night (checkin day).
    pub start: NaiveDate,
    /// Checkout day; not itself occupied.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a date range. Does not validate ordering; see the module
    /// invariant.
    #[inline]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Returns true if `self` and `other` share at least one night.
    ///
    /// Adjacent ranges (one ending the day the other starts) do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// =============================================================================
// Conflict Detection
// =============================================================================

/// Returns true if any existing range overlaps the candidate.
///
/// O(n) over the existing bookings for a unit; n is bounded by calendar
/// realism, so a scan beats maintaining an interval tree.
pub fn conflicts(existing: &[DateRange], candidate: &DateRange) -> bool {
    existing.iter().any(|range| range.overlaps(candidate))
}

/// Which of the candidate's fields collide with existing bookings.
///
/// Used to tell the caller *which* date to correct:
/// - `start_date` is set when the candidate's first night falls inside an
///   existing booking
/// - `end_date` is set when the candidate's last night falls inside an
///   existing booking
/// - both are set when the candidate fully contains (or equals) an existing
///   booking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflictFields {
    pub start_date: bool,
    pub end_date: bool,
}

impl ConflictFields {
    /// True if any field conflicts.
    #[inline]
    pub const fn any(&self) -> bool {
        self.start_date || self.end_date
    }
}

/// Reports per-field conflicts between the candidate and all existing ranges.
///
/// Returns a default (all-false) value when the candidate is free.
pub fn conflict_fields(existing: &[DateRange], candidate: &DateRange) -> ConflictFields {
    let mut fields = ConflictFields::default();

    for range in existing {
        if !range.overlaps(candidate) {
            continue;
        }

        // First night inside an existing booking
        if candidate.start >= range.start && candidate.start < range.end {
            fields.start_date = true;
        }
        // Last night inside an existing booking (end is exclusive)
        if candidate.end > range.start && candidate.end <= range.end {
            fields.end_date = true;
        }
        // Candidate swallows the existing booking whole: both dates must move
        if candidate.start <= range.start && candidate.end >= range.end {
            fields.start_date = true;
            fields.end_date = true;
        }
    }

    fields
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

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2))
    }

    #[test]
    fn test_identical_ranges_conflict() {
        let existing = vec![range((2025, 3, 1), (2025, 3, 5))];
        let candidate = range((2025, 3, 1), (2025, 3, 5));
        assert!(conflicts(&existing, &candidate));
    }

    #[test]
    fn test_partial_overlap_conflicts() {
        let existing = vec![range((2025, 3, 1), (2025, 3, 5))];
        let candidate = range((2025, 3, 3), (2025, 3, 7));
        assert!(conflicts(&existing, &candidate));
    }

    #[test]
    fn test_containment_conflicts_both_ways() {
        let existing = vec![range((2025, 3, 1), (2025, 3, 10))];

        // Candidate inside existing
        assert!(conflicts(&existing, &range((2025, 3, 3), (2025, 3, 5))));

        // Candidate containing existing
        let inner = vec![range((2025, 3, 3), (2025, 3, 5))];
        assert!(conflicts(&inner, &range((2025, 3, 1), (2025, 3, 10))));
    }

    #[test]
    fn test_adjacent_ranges_do_not_conflict() {
        // Checkout Jan 5, checkin Jan 5: allowed
        let existing = vec![range((2025, 1, 1), (2025, 1, 5))];
        assert!(!conflicts(&existing, &range((2025, 1, 5), (2025, 1, 10))));

        // And the mirror image
        let existing = vec![range((2025, 1, 5), (2025, 1, 10))];
        assert!(!conflicts(&existing, &range((2025, 1, 1), (2025, 1, 5))));
    }

    #[test]
    fn test_empty_existing_set_never_conflicts() {
        assert!(!conflicts(&[], &range((2025, 1, 1), (2025, 1, 5))));
    }

    #[test]
    fn test_disjoint_ranges_do_not_conflict() {
        let existing = vec![
            range((2025, 1, 1), (2025, 1, 5)),
            range((2025, 2, 1), (2025, 2, 5)),
        ];
        assert!(!conflicts(&existing, &range((2025, 1, 10), (2025, 1, 20))));
    }

    #[test]
    fn test_conflict_fields_start_only() {
        // Candidate starts inside an existing booking, ends in the clear
        let existing = vec![range((2025, 3, 1), (2025, 3, 5))];
        let fields = conflict_fields(&existing, &range((2025, 3, 3), (2025, 3, 9)));
        assert!(fields.start_date);
        assert!(!fields.end_date);
        assert!(fields.any());
    }

    #[test]
    fn test_conflict_fields_end_only() {
        // Candidate ends inside an existing booking, starts in the clear
        let existing = vec![range((2025, 3, 5), (2025, 3, 10))];
        let fields = conflict_fields(&existing, &range((2025, 3, 1), (2025, 3, 7)));
        assert!(!fields.start_date);
        assert!(fields.end_date);
    }

    #[test]
    fn test_conflict_fields_containment_flags_both() {
        let existing = vec![range((2025, 3, 3), (2025, 3, 5))];
        let fields = conflict_fields(&existing, &range((2025, 3, 1), (2025, 3, 10)));
        assert!(fields.start_date);
        assert!(fields.end_date);
    }

    #[test]
    fn test_conflict_fields_identical_flags_both() {
        let existing = vec![range((2025, 3, 1), (2025, 3, 5))];
        let fields = conflict_fields(&existing, &range((2025, 3, 1), (2025, 3, 5)));
        assert!(fields.start_date);
        assert!(fields.end_date);
    }

    #[test]
    fn test_conflict_fields_clear_candidate() {
        let existing = vec![range((2025, 3, 1), (2025, 3, 5))];
        let fields = conflict_fields(&existing, &range((2025, 3, 5), (2025, 3, 9)));
        assert!(!fields.any());
    }
}

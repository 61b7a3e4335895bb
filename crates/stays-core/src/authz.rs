//! # Authorization Resolver
//!
//! Pure authorization decisions over ownership facts.
//!
//! ## Rule Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Resource │ Action        │ Allowed actors                              │
//! │  ─────────┼───────────────┼────────────────────────────────────────     │
//! │  Unit     │ update/delete │ Unit owner only                             │
//! │  Booking  │ create        │ Anyone EXCEPT the unit owner                │
//! │  Booking  │ update        │ Booking's guest only, and only pre-start    │
//! │  Booking  │ cancel        │ Guest OR unit owner, and only pre-start     │
//! │  Review   │ create        │ Anyone EXCEPT the unit owner                │
//! │  Review   │ update/delete │ Review's author only                        │
//! │  Image    │ create/delete │ Parent's owner only (unit owner for unit    │
//! │           │               │ images, review author for review images)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design: Facts Are Supplied, Never Fetched
//! The resolver never queries the store. The transaction manager passes the
//! ownership facts it already read, so the decision is made against exactly
//! the rows the surrounding transaction saw - no second read, no TOCTOU gap
//! between the check and the data it is based on.
//!
//! Per-parent cardinality rules (duplicate reviews, the image cap) are NOT
//! authorization concerns; they live with the nested-resource guards in the
//! service layer, counted inside the creating transaction.

use crate::error::AuthzDenied;

/// Result type for authorization checks.
pub type AuthzResult = Result<(), AuthzDenied>;

// =============================================================================
// Ownership Facts
// =============================================================================

/// Facts needed to authorize actions on a booking.
///
/// `started` is derived by the caller from its clock (`today >= start_date`)
/// so this module stays clock-free.
#[derive(Debug, Clone, Copy)]
pub struct BookingFacts<'a> {
    /// The guest who created the booking.
    pub guest_id: &'a str,
    /// The owner of the booked unit (may cancel, but never edit).
    pub unit_owner_id: &'a str,
    /// Whether the booking's start date has been reached.
    pub started: bool,
}

// =============================================================================
// Unit Rules
// =============================================================================

/// Update or delete a unit: owner only.
pub fn check_unit_mutate(actor_id: &str, unit_owner_id: &str) -> AuthzResult {
    if actor_id != unit_owner_id {
        return Err(AuthzDenied::NotOwner { resource: "unit" });
    }
    Ok(())
}

// =============================================================================
// Booking Rules
// =============================================================================

/// Create a booking: any authenticated actor except the unit's owner.
pub fn check_booking_create(actor_id: &str, unit_owner_id: &str) -> AuthzResult {
    if actor_id == unit_owner_id {
        return Err(AuthzDenied::SelfBooking);
    }
    Ok(())
}

/// Update a booking: the original guest only, and only before it starts.
///
/// Ownership is checked first so unauthorized actors learn nothing about
/// the booking's state.
pub fn check_booking_update(actor_id: &str, facts: &BookingFacts<'_>) -> AuthzResult {
    if actor_id != facts.guest_id {
        return Err(AuthzDenied::NotOwner {
            resource: "booking",
        });
    }
    if facts.started {
        return Err(AuthzDenied::BookingStarted);
    }
    Ok(())
}

/// Cancel a booking: the guest or the unit owner, and only before it starts.
pub fn check_booking_cancel(actor_id: &str, facts: &BookingFacts<'_>) -> AuthzResult {
    if actor_id != facts.guest_id && actor_id != facts.unit_owner_id {
        return Err(AuthzDenied::NotOwner {
            resource: "booking",
        });
    }
    if facts.started {
        return Err(AuthzDenied::BookingStarted);
    }
    Ok(())
}

// =============================================================================
// Review Rules
// =============================================================================

/// Create a review: any actor except the unit's owner.
pub fn check_review_create(actor_id: &str, unit_owner_id: &str) -> AuthzResult {
    if actor_id == unit_owner_id {
        return Err(AuthzDenied::SelfReview);
    }
    Ok(())
}

/// Update or delete a review: the author only.
pub fn check_review_mutate(actor_id: &str, review_author_id: &str) -> AuthzResult {
    if actor_id != review_author_id {
        return Err(AuthzDenied::NotOwner { resource: "review" });
    }
    Ok(())
}

// =============================================================================
// Image Rules
// =============================================================================

/// Create or delete an image: the parent's owner only.
///
/// For unit-scoped images the parent owner is the unit owner; for
/// review-scoped images it is the review's author. The caller resolves the
/// parent and passes its owner here.
pub fn check_image_mutate(
    actor_id: &str,
    parent_owner_id: &str,
    parent: &'static str,
) -> AuthzResult {
    if actor_id != parent_owner_id {
        return Err(AuthzDenied::NotOwner { resource: parent });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "owner-1";
    const GUEST: &str = "guest-1";
    const STRANGER: &str = "stranger-1";

    fn facts(started: bool) -> BookingFacts<'static> {
        BookingFacts {
            guest_id: GUEST,
            unit_owner_id: OWNER,
            started,
        }
    }

    #[test]
    fn test_unit_mutate_owner_only() {
        assert!(check_unit_mutate(OWNER, OWNER).is_ok());
        assert_eq!(
            check_unit_mutate(STRANGER, OWNER),
            Err(AuthzDenied::NotOwner { resource: "unit" })
        );
    }

    #[test]
    fn test_booking_create_rejects_self_booking() {
        assert!(check_booking_create(GUEST, OWNER).is_ok());
        assert_eq!(
            check_booking_create(OWNER, OWNER),
            Err(AuthzDenied::SelfBooking)
        );
    }

    #[test]
    fn test_booking_update_guest_only() {
        assert!(check_booking_update(GUEST, &facts(false)).is_ok());

        // Not even the unit owner may edit a guest's dates
        assert_eq!(
            check_booking_update(OWNER, &facts(false)),
            Err(AuthzDenied::NotOwner {
                resource: "booking"
            })
        );
        assert_eq!(
            check_booking_update(STRANGER, &facts(false)),
            Err(AuthzDenied::NotOwner {
                resource: "booking"
            })
        );
    }

    #[test]
    fn test_booking_update_denied_after_start() {
        assert_eq!(
            check_booking_update(GUEST, &facts(true)),
            Err(AuthzDenied::BookingStarted)
        );
    }

    #[test]
    fn test_booking_cancel_guest_or_owner() {
        assert!(check_booking_cancel(GUEST, &facts(false)).is_ok());
        assert!(check_booking_cancel(OWNER, &facts(false)).is_ok());
        assert_eq!(
            check_booking_cancel(STRANGER, &facts(false)),
            Err(AuthzDenied::NotOwner {
                resource: "booking"
            })
        );
    }

    #[test]
    fn test_booking_cancel_denied_after_start() {
        // Started immutability applies to both the guest and the owner
        assert_eq!(
            check_booking_cancel(GUEST, &facts(true)),
            Err(AuthzDenied::BookingStarted)
        );
        assert_eq!(
            check_booking_cancel(OWNER, &facts(true)),
            Err(AuthzDenied::BookingStarted)
        );
    }

    #[test]
    fn test_review_create_rejects_unit_owner() {
        assert!(check_review_create(GUEST, OWNER).is_ok());
        assert_eq!(
            check_review_create(OWNER, OWNER),
            Err(AuthzDenied::SelfReview)
        );
    }

    #[test]
    fn test_review_mutate_author_only() {
        assert!(check_review_mutate(GUEST, GUEST).is_ok());
        assert_eq!(
            check_review_mutate(OWNER, GUEST),
            Err(AuthzDenied::NotOwner { resource: "review" })
        );
    }

    #[test]
    fn test_image_mutate_parent_owner_only() {
        assert!(check_image_mutate(OWNER, OWNER, "unit").is_ok());
        assert_eq!(
            check_image_mutate(STRANGER, OWNER, "unit"),
            Err(AuthzDenied::NotOwner { resource: "unit" })
        );
        assert_eq!(
            check_image_mutate(STRANGER, GUEST, "review"),
            Err(AuthzDenied::NotOwner { resource: "review" })
        );
    }
}

//! # Reservation Service
//!
//! Booking creation, rescheduling, cancellation, and role-shaped listing.
//!
//! ## The Read-Check-Write Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Serializability Per Unit                                    │
//! │                                                                         │
//! │  create_booking / update_booking                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Acquire the unit's advisory lock  ← BEFORE taking a connection      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. BEGIN transaction                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Read the unit's occupied ranges (same transaction)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. conflict_fields(existing, candidate)                                │
//! │       │              │                                                  │
//! │       │ clear        │ overlap                                          │
//! │       ▼              ▼                                                  │
//! │  5. INSERT/UPDATE   rollback, report Conflict                           │
//! │     COMMIT          with field attribution                              │
//! │                                                                         │
//! │  Two writers for the same unit queue at step 1, so the check in         │
//! │  step 4 always sees the winner's committed row. Writers for             │
//! │  different units never contend.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lock-Then-Connect Ordering
//! The unit lock is acquired before a pooled connection is taken. The
//! reverse order can deadlock a small pool: every connection held by a
//! task queueing for a lock whose holder needs a connection.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use stays_core::authz::{self, BookingFacts};
use stays_core::conflict::{conflict_fields, ConflictFields};
use stays_core::validation::validate_booking_dates;
use stays_core::{Booking, BookingList, DateRange};
use stays_db::error::DbResult;
use stays_db::{BookingRepository, Database};

use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::retry;

// =============================================================================
// Write Operations
// =============================================================================

/// A conflict-checked booking write. Insert and reschedule share the same
/// lock/transaction/check sequence; only the final statement differs.
enum WriteOp<'a> {
    Insert(&'a Booking),
    Update {
        id: &'a str,
        unit_id: &'a str,
        range: DateRange,
        updated_at: chrono::DateTime<chrono::Utc>,
    },
}

impl WriteOp<'_> {
    fn unit_id(&self) -> &str {
        match self {
            WriteOp::Insert(booking) => &booking.unit_id,
            WriteOp::Update { unit_id, .. } => unit_id,
        }
    }

    fn candidate(&self) -> DateRange {
        match self {
            WriteOp::Insert(booking) => booking.range(),
            WriteOp::Update { range, .. } => *range,
        }
    }

    /// The booking to exclude from the conflict scan: a reschedule must not
    /// collide with its own current dates.
    fn exclude(&self) -> Option<&str> {
        match self {
            WriteOp::Insert(_) => None,
            WriteOp::Update { id, .. } => Some(id),
        }
    }
}

// =============================================================================
// Reservation Service
// =============================================================================

/// Orchestrates booking operations against the store.
#[derive(Debug, Clone)]
pub struct ReservationService {
    db: Database,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl ReservationService {
    /// Creates a new ReservationService.
    pub fn new(db: Database, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        ReservationService { db, clock, config }
    }

    /// Creates a booking for `actor_id` on the given unit.
    ///
    /// ## Errors
    /// - `Validation` - start in the past, or end not after start
    /// - `NotFound` - no such unit
    /// - `Forbidden` - the actor owns the unit (self-booking)
    /// - `Conflict` - the dates overlap an existing booking
    pub async fn create_booking(
        &self,
        actor_id: &str,
        unit_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ServiceResult<Booking> {
        let range = DateRange::new(start_date, end_date);
        validate_booking_dates(&range, self.clock.today())?;

        let unit = self
            .db
            .units()
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", unit_id))?;

        authz::check_booking_create(actor_id, &unit.owner_id)?;

        let now = self.clock.now();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            unit_id: unit.id,
            guest_id: actor_id.to_string(),
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        };

        self.write_with_retry(WriteOp::Insert(&booking)).await?;

        info!(
            booking_id = %booking.id,
            unit_id = %booking.unit_id,
            start = %booking.start_date,
            end = %booking.end_date,
            "Booking created"
        );

        Ok(booking)
    }

    /// Reschedules a booking to new dates.
    ///
    /// Only the booking's guest may reschedule, and only before the start
    /// date is reached. The conflict scan excludes the booking itself, so
    /// shifting within (or overlapping) its own current dates is allowed.
    pub async fn update_booking(
        &self,
        actor_id: &str,
        booking_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ServiceResult<Booking> {
        let range = DateRange::new(start_date, end_date);
        validate_booking_dates(&range, self.clock.today())?;

        let (mut booking, unit_owner_id) = self
            .db
            .bookings()
            .get_with_unit_owner(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Booking", booking_id))?;

        let facts = BookingFacts {
            guest_id: &booking.guest_id,
            unit_owner_id: &unit_owner_id,
            started: booking.started(self.clock.today()),
        };
        authz::check_booking_update(actor_id, &facts)?;

        let now = self.clock.now();
        self.write_with_retry(WriteOp::Update {
            id: booking_id,
            unit_id: &booking.unit_id,
            range,
            updated_at: now,
        })
        .await?;

        info!(booking_id = %booking_id, start = %start_date, end = %end_date, "Booking rescheduled");

        booking.start_date = start_date;
        booking.end_date = end_date;
        booking.updated_at = now;
        Ok(booking)
    }

    /// Cancels a booking. The row is hard-deleted, freeing the interval for
    /// new bookings immediately.
    ///
    /// The guest or the unit's owner may cancel, but only before the start
    /// date is reached. Cancelling an already-cancelled booking reports
    /// NotFound; the row is gone either way.
    pub async fn cancel_booking(&self, actor_id: &str, booking_id: &str) -> ServiceResult<()> {
        let (booking, unit_owner_id) = self
            .db
            .bookings()
            .get_with_unit_owner(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Booking", booking_id))?;

        let facts = BookingFacts {
            guest_id: &booking.guest_id,
            unit_owner_id: &unit_owner_id,
            started: booking.started(self.clock.today()),
        };
        authz::check_booking_cancel(actor_id, &facts)?;

        self.db.bookings().delete(booking_id).await?;

        info!(booking_id = %booking_id, unit_id = %booking.unit_id, "Booking cancelled");
        Ok(())
    }

    /// Lists a unit's bookings, shaped by the caller's relationship to it.
    ///
    /// The unit's owner receives full records including guest identity;
    /// everyone else receives occupied date ranges only.
    pub async fn list_for_unit(&self, actor_id: &str, unit_id: &str) -> ServiceResult<BookingList> {
        let unit = self
            .db
            .units()
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", unit_id))?;

        if actor_id == unit.owner_id {
            let bookings = self.db.bookings().list_for_unit(unit_id).await?;
            Ok(BookingList::Owner(bookings))
        } else {
            let periods = self.db.bookings().list_periods_for_unit(unit_id).await?;
            Ok(BookingList::Guest(periods))
        }
    }

    // =========================================================================
    // Transaction Manager
    // =========================================================================

    /// Runs a conflict-checked write, retrying transient store contention
    /// within the configured budget and deadline.
    async fn write_with_retry(&self, op: WriteOp<'_>) -> ServiceResult<()> {
        let fields =
            retry::with_store_retry(&self.config, "booking_write", || self.write_checked(&op))
                .await?;

        if fields.any() {
            return Err(ServiceError::booking_conflict(fields));
        }
        Ok(())
    }

    /// One attempt of the lock → begin → scan → write → commit sequence.
    ///
    /// Returns the conflicting fields (all-false when the write committed).
    /// A conflicted attempt performs no write; dropping the transaction
    /// rolls back nothing.
    async fn write_checked(&self, op: &WriteOp<'_>) -> DbResult<ConflictFields> {
        let unit_id = op.unit_id();
        let candidate = op.candidate();

        // Lock first. Taking a pooled connection and THEN queueing for the
        // lock can exhaust the pool against itself.
        let _guard = self.db.unit_locks().acquire(unit_id).await;
        debug!(unit_id = %unit_id, "Unit lock acquired");

        let mut tx = self.db.pool().begin().await?;

        let existing =
            BookingRepository::ranges_for_unit_tx(&mut *tx, unit_id, op.exclude()).await?;

        let fields = conflict_fields(&existing, &candidate);
        if fields.any() {
            debug!(unit_id = %unit_id, "Candidate range conflicts with existing booking");
            return Ok(fields);
        }

        match op {
            WriteOp::Insert(booking) => {
                BookingRepository::insert_tx(&mut *tx, booking).await?;
            }
            WriteOp::Update {
                id,
                range,
                updated_at,
                ..
            } => {
                BookingRepository::update_range_tx(&mut *tx, id, range, *updated_at).await?;
            }
        }

        tx.commit().await?;
        Ok(ConflictFields::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

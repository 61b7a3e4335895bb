//! # Booking Repository
//!
//! Database operations for bookings.
//!
//! ## Transactional Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Two Kinds of Methods                                   │
//! │                                                                         │
//! │  Pool-based (&self):                                                     │
//! │    get_with_unit_owner, list_for_unit, list_periods_for_unit,            │
//! │    insert, delete                                                        │
//! │    └── Single-statement operations; SQLite makes each atomic.            │
//! │                                                                         │
//! │  Transaction-scoped (conn: &mut SqliteConnection):                       │
//! │    ranges_for_unit_tx, insert_tx, update_range_tx                        │
//! │    └── Building blocks of the read-check-write sequence. The             │
//! │        reservation service threads ONE transaction through all          │
//! │        of them so the conflict check and the write see the same         │
//! │        snapshot.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stays_core::{Booking, BookingPeriod, DateRange};

/// A booking joined with its unit's owner, for authorization facts.
#[derive(Debug, sqlx::FromRow)]
struct BookingOwnerRow {
    id: String,
    unit_id: String,
    guest_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    unit_owner_id: String,
}

impl BookingOwnerRow {
    fn into_parts(self) -> (Booking, String) {
        (
            Booking {
                id: self.id,
                unit_id: self.unit_id,
                guest_id: self.guest_id,
                start_date: self.start_date,
                end_date: self.end_date,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            self.unit_owner_id,
        )
    }
}

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Gets a booking together with the owning unit's owner id.
    ///
    /// One joined read supplies every fact the authorization resolver
    /// needs for update/cancel decisions (guest, unit owner, dates).
    pub async fn get_with_unit_owner(&self, id: &str) -> DbResult<Option<(Booking, String)>> {
        let row = sqlx::query_as::<_, BookingOwnerRow>(
            r#"
            SELECT
                b.id, b.unit_id, b.guest_id,
                b.start_date, b.end_date,
                b.created_at, b.updated_at,
                u.owner_id AS unit_owner_id
            FROM bookings b
            JOIN units u ON u.id = b.unit_id
            WHERE b.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BookingOwnerRow::into_parts))
    }

    /// Lists full booking records for a unit (owner view).
    pub async fn list_for_unit(&self, unit_id: &str) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, unit_id, guest_id, start_date, end_date, created_at, updated_at
            FROM bookings
            WHERE unit_id = ?1
            ORDER BY start_date
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Lists occupied periods for a unit, guest identity omitted (guest view).
    pub async fn list_periods_for_unit(&self, unit_id: &str) -> DbResult<Vec<BookingPeriod>> {
        let periods = sqlx::query_as::<_, BookingPeriod>(
            r#"
            SELECT unit_id, start_date, end_date
            FROM bookings
            WHERE unit_id = ?1
            ORDER BY start_date
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(periods)
    }

    /// Inserts a booking outside any caller-managed transaction.
    ///
    /// Used for seeding and administrative paths. Reservation creation goes
    /// through [`Self::insert_tx`] inside the conflict-checked transaction.
    pub async fn insert(&self, booking: &Booking) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_tx(&mut conn, booking).await
    }

    /// Deletes a booking (cancellation is a hard delete).
    ///
    /// Returns NotFound when the row is already gone, so repeated
    /// cancellation is visible to the caller rather than silently "ok".
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting booking");

        let result = sqlx::query("DELETE FROM bookings WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    // =========================================================================
    // Transaction-Scoped Operations
    // =========================================================================

    /// Reads the occupied date ranges for a unit inside the caller's
    /// transaction, optionally excluding one booking (the one being updated).
    pub async fn ranges_for_unit_tx(
        conn: &mut SqliteConnection,
        unit_id: &str,
        exclude_booking: Option<&str>,
    ) -> DbResult<Vec<DateRange>> {
        let rows = sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
            r#"
            SELECT start_date, end_date
            FROM bookings
            WHERE unit_id = ?1
              AND (?2 IS NULL OR id <> ?2)
            "#,
        )
        .bind(unit_id)
        .bind(exclude_booking)
        .fetch_all(conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(start, end)| DateRange::new(start, end))
            .collect())
    }

    /// Inserts a booking inside the caller's transaction.
    pub async fn insert_tx(conn: &mut SqliteConnection, booking: &Booking) -> DbResult<()> {
        debug!(id = %booking.id, unit_id = %booking.unit_id, "Inserting booking");

        sqlx::query(
            r#"
            INSERT INTO bookings (id, unit_id, guest_id, start_date, end_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.unit_id)
        .bind(&booking.guest_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Rewrites a booking's date range inside the caller's transaction.
    pub async fn update_range_tx(
        conn: &mut SqliteConnection,
        id: &str,
        range: &DateRange,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                start_date = ?2,
                end_date = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(range.start)
        .bind(range.end)
        .bind(updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stays_core::Unit;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed(db: &Database) -> Booking {
        let now = Utc::now();
        db.units()
            .insert(&Unit {
                id: "u-1".to_string(),
                owner_id: "owner-1".to_string(),
                name: "Cabin".to_string(),
                description: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let booking = Booking {
            id: "b-1".to_string(),
            unit_id: "u-1".to_string(),
            guest_id: "guest-1".to_string(),
            start_date: date(2025, 6, 10),
            end_date: date(2025, 6, 15),
            created_at: now,
            updated_at: now,
        };
        db.bookings().insert(&booking).await.unwrap();
        booking
    }

    #[tokio::test]
    async fn test_ranges_scan_respects_exclusion() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let booking = seed(&db).await;

        let mut conn = db.pool().acquire().await.unwrap();

        let all = BookingRepository::ranges_for_unit_tx(&mut conn, "u-1", None)
            .await
            .unwrap();
        assert_eq!(all, vec![booking.range()]);

        // Excluding the booking itself empties the scan
        let rest = BookingRepository::ranges_for_unit_tx(&mut conn, "u-1", Some(&booking.id))
            .await
            .unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_get_with_unit_owner_joins_owner() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let booking = seed(&db).await;

        let (fetched, owner) = db
            .bookings()
            .get_with_unit_owner(&booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.guest_id, "guest-1");
        assert_eq!(owner, "owner-1");
    }

    #[tokio::test]
    async fn test_delete_reports_missing_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let booking = seed(&db).await;

        db.bookings().delete(&booking.id).await.unwrap();

        let err = db.bookings().delete(&booking.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}

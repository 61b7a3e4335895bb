//! # Review Repository
//!
//! Database operations for reviews.
//!
//! The one-review-per-(unit, author) rule is checked with a fresh count
//! inside the creating transaction ([`ReviewRepository::exists_for_author_tx`]);
//! the schema's UNIQUE index is the backstop if anything slips past.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stays_core::Review;

/// Repository for review database operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    /// Creates a new ReviewRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Gets a review by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, unit_id, author_id, rating, text, created_at, updated_at
            FROM reviews
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// Lists reviews for a unit, oldest first.
    pub async fn list_for_unit(&self, unit_id: &str) -> DbResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, unit_id, author_id, rating, text, created_at, updated_at
            FROM reviews
            WHERE unit_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Updates a review's rating and text.
    pub async fn update(
        &self,
        id: &str,
        rating: i64,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reviews SET
                rating = ?2,
                text = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(rating)
        .bind(text)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Review", id));
        }

        Ok(())
    }

    /// Deletes a review. Its images cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting review");

        let result = sqlx::query("DELETE FROM reviews WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Review", id));
        }

        Ok(())
    }

    // =========================================================================
    // Transaction-Scoped Operations
    // =========================================================================

    /// Whether the author already reviewed the unit, counted inside the
    /// caller's transaction so concurrent creates cannot both pass.
    pub async fn exists_for_author_tx(
        conn: &mut SqliteConnection,
        unit_id: &str,
        author_id: &str,
    ) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reviews
            WHERE unit_id = ?1 AND author_id = ?2
            "#,
        )
        .bind(unit_id)
        .bind(author_id)
        .fetch_one(conn)
        .await?;

        Ok(count > 0)
    }

    /// Inserts a review inside the caller's transaction.
    pub async fn insert_tx(conn: &mut SqliteConnection, review: &Review) -> DbResult<()> {
        debug!(id = %review.id, unit_id = %review.unit_id, "Inserting review");

        sqlx::query(
            r#"
            INSERT INTO reviews (id, unit_id, author_id, rating, text, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&review.id)
        .bind(&review.unit_id)
        .bind(&review.author_id)
        .bind(review.rating)
        .bind(&review.text)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(conn)
        .await?;

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

    fn review(id: &str, author_id: &str) -> Review {
        let now = Utc::now();
        Review {
            id: id.to_string(),
            unit_id: "u-1".to_string(),
            author_id: author_id.to_string(),
            rating: 4,
            text: "good".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn seed_unit(db: &Database) {
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
    }

    #[tokio::test]
    async fn test_unique_index_backstops_duplicate_review() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_unit(&db).await;

        let mut conn = db.pool().acquire().await.unwrap();
        ReviewRepository::insert_tx(&mut conn, &review("r-1", "guest-1"))
            .await
            .unwrap();

        // Same (unit, author) pair straight at the schema. The raw SQLite
        // constraint dump is folded into one readable reference.
        let err = ReviewRepository::insert_tx(&mut conn, &review("r-2", "guest-1"))
            .await
            .unwrap_err();
        match err {
            DbError::UniqueViolation { field } => {
                assert_eq!(field, "reviews (unit_id, author_id)");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exists_for_author() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_unit(&db).await;

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(
            !ReviewRepository::exists_for_author_tx(&mut conn, "u-1", "guest-1")
                .await
                .unwrap()
        );

        ReviewRepository::insert_tx(&mut conn, &review("r-1", "guest-1"))
            .await
            .unwrap();

        assert!(
            ReviewRepository::exists_for_author_tx(&mut conn, "u-1", "guest-1")
                .await
                .unwrap()
        );
        assert!(
            !ReviewRepository::exists_for_author_tx(&mut conn, "u-1", "guest-2")
                .await
                .unwrap()
        );
    }
}

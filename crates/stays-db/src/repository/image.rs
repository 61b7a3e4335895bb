//! # Image Repository
//!
//! Database operations for images.
//!
//! ## Parent Resolution
//! An image's authorization facts live one hop away: the unit's owner for
//! unit-scoped images, the review's author for review-scoped ones.
//! [`ImageRepository::get_with_parent_owner`] resolves that in one joined
//! read so the service never races a second lookup against a delete.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stays_core::Image;

/// An image joined with its parent's owner (unit owner or review author).
#[derive(Debug, sqlx::FromRow)]
struct ImageParentRow {
    id: String,
    owner_id: String,
    url: String,
    unit_id: Option<String>,
    review_id: Option<String>,
    preview: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    parent_owner_id: String,
}

impl ImageParentRow {
    fn into_parts(self) -> (Image, String) {
        (
            Image {
                id: self.id,
                owner_id: self.owner_id,
                url: self.url,
                unit_id: self.unit_id,
                review_id: self.review_id,
                preview: self.preview,
                created_at: self.created_at,
            },
            self.parent_owner_id,
        )
    }
}

/// Repository for image database operations.
#[derive(Debug, Clone)]
pub struct ImageRepository {
    pool: SqlitePool,
}

impl ImageRepository {
    /// Creates a new ImageRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ImageRepository { pool }
    }

    /// Gets an image together with its parent's owner id.
    ///
    /// The CHECK constraint guarantees exactly one parent exists, so the
    /// COALESCE always resolves.
    pub async fn get_with_parent_owner(&self, id: &str) -> DbResult<Option<(Image, String)>> {
        let row = sqlx::query_as::<_, ImageParentRow>(
            r#"
            SELECT
                i.id, i.owner_id, i.url, i.unit_id, i.review_id,
                i.preview, i.created_at,
                COALESCE(u.owner_id, r.author_id) AS parent_owner_id
            FROM images i
            LEFT JOIN units u ON u.id = i.unit_id
            LEFT JOIN reviews r ON r.id = i.review_id
            WHERE i.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ImageParentRow::into_parts))
    }

    /// Lists images attached to a unit.
    pub async fn list_for_unit(&self, unit_id: &str) -> DbResult<Vec<Image>> {
        let images = sqlx::query_as::<_, Image>(
            r#"
            SELECT id, owner_id, url, unit_id, review_id, preview, created_at
            FROM images
            WHERE unit_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    /// Lists images attached to a review.
    pub async fn list_for_review(&self, review_id: &str) -> DbResult<Vec<Image>> {
        let images = sqlx::query_as::<_, Image>(
            r#"
            SELECT id, owner_id, url, unit_id, review_id, preview, created_at
            FROM images
            WHERE review_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    /// Deletes an image.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting image");

        let result = sqlx::query("DELETE FROM images WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Image", id));
        }

        Ok(())
    }

    // =========================================================================
    // Transaction-Scoped Operations
    // =========================================================================

    /// Counts a review's images inside the caller's transaction.
    ///
    /// The ≤10 cap must compare against a count taken in the same
    /// transaction as the insert; a cached count would let two concurrent
    /// uploads both pass at 9.
    pub async fn count_for_review_tx(
        conn: &mut SqliteConnection,
        review_id: &str,
    ) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images WHERE review_id = ?1")
            .bind(review_id)
            .fetch_one(conn)
            .await?;

        Ok(count)
    }

    /// Clears the preview flag on all of a unit's images, inside the
    /// caller's transaction. Run before inserting a new preview image so
    /// at most one preview survives the commit.
    pub async fn clear_unit_preview_tx(conn: &mut SqliteConnection, unit_id: &str) -> DbResult<()> {
        sqlx::query("UPDATE images SET preview = 0 WHERE unit_id = ?1 AND preview = 1")
            .bind(unit_id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Inserts an image inside the caller's transaction.
    pub async fn insert_tx(conn: &mut SqliteConnection, image: &Image) -> DbResult<()> {
        debug!(id = %image.id, unit_id = ?image.unit_id, review_id = ?image.review_id, "Inserting image");

        sqlx::query(
            r#"
            INSERT INTO images (id, owner_id, url, unit_id, review_id, preview, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&image.id)
        .bind(&image.owner_id)
        .bind(&image.url)
        .bind(&image.unit_id)
        .bind(&image.review_id)
        .bind(image.preview)
        .bind(image.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

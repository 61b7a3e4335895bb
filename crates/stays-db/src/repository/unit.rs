//! # Unit Repository
//!
//! Database operations for rentable units.
//!
//! Deleting a unit cascades to its bookings, reviews, and images via the
//! `ON DELETE CASCADE` foreign keys in the schema; no application-level
//! cleanup is needed (or allowed - partial cleanup would be worse).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stays_core::Unit;

/// Repository for unit database operations.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    pool: SqlitePool,
}

impl UnitRepository {
    /// Creates a new UnitRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UnitRepository { pool }
    }

    /// Gets a unit by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Unit>> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, owner_id, name, description, created_at, updated_at
            FROM units
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    /// Inserts a new unit.
    pub async fn insert(&self, unit: &Unit) -> DbResult<()> {
        debug!(id = %unit.id, owner_id = %unit.owner_id, "Inserting unit");

        sqlx::query(
            r#"
            INSERT INTO units (id, owner_id, name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&unit.id)
        .bind(&unit.owner_id)
        .bind(&unit.name)
        .bind(&unit.description)
        .bind(unit.created_at)
        .bind(unit.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a unit's display fields.
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE units SET
                name = ?2,
                description = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Unit", id));
        }

        Ok(())
    }

    /// Deletes a unit. Bookings, reviews, and images cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting unit (cascades)");

        let result = sqlx::query("DELETE FROM units WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Unit", id));
        }

        Ok(())
    }

    /// Lists all units owned by an actor.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<Unit>> {
        let units = sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, owner_id, name, description, created_at, updated_at
            FROM units
            WHERE owner_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }
}

//! # Unit Service
//!
//! Listing lifecycle: create, update, delete, and reads.
//!
//! Deleting a unit cascades in the store: its bookings, reviews, and images
//! disappear with it, so the freed intervals and review slots are
//! immediately reusable under a new listing.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use stays_core::authz;
use stays_core::validation::validate_unit_name;
use stays_core::Unit;
use stays_db::Database;

use crate::clock::Clock;
use crate::error::{ServiceError, ServiceResult};

/// Orchestrates unit operations against the store.
#[derive(Debug, Clone)]
pub struct UnitService {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl UnitService {
    /// Creates a new UnitService.
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        UnitService { db, clock }
    }

    /// Creates a unit owned by `actor_id`.
    pub async fn create_unit(
        &self,
        actor_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> ServiceResult<Unit> {
        validate_unit_name(name)?;

        let now = self.clock.now();
        let unit = Unit {
            id: Uuid::new_v4().to_string(),
            owner_id: actor_id.to_string(),
            name: name.trim().to_string(),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        self.db.units().insert(&unit).await?;

        info!(unit_id = %unit.id, owner_id = %unit.owner_id, "Unit created");
        Ok(unit)
    }

    /// Updates a unit's display fields. Owner only.
    pub async fn update_unit(
        &self,
        actor_id: &str,
        unit_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> ServiceResult<Unit> {
        validate_unit_name(name)?;

        let mut unit = self
            .db
            .units()
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", unit_id))?;

        authz::check_unit_mutate(actor_id, &unit.owner_id)?;

        let now = self.clock.now();
        self.db
            .units()
            .update(unit_id, name.trim(), description, now)
            .await?;

        unit.name = name.trim().to_string();
        unit.description = description.map(str::to_string);
        unit.updated_at = now;
        Ok(unit)
    }

    /// Deletes a unit. Owner only. Bookings, reviews, and images cascade.
    pub async fn delete_unit(&self, actor_id: &str, unit_id: &str) -> ServiceResult<()> {
        let unit = self
            .db
            .units()
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", unit_id))?;

        authz::check_unit_mutate(actor_id, &unit.owner_id)?;

        self.db.units().delete(unit_id).await?;

        info!(unit_id = %unit_id, "Unit deleted");
        Ok(())
    }

    /// Gets a unit by id. Public read, no actor required.
    pub async fn get_unit(&self, unit_id: &str) -> ServiceResult<Unit> {
        self.db
            .units()
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", unit_id))
    }

    /// Lists the units owned by an actor.
    pub async fn list_by_owner(&self, owner_id: &str) -> ServiceResult<Vec<Unit>> {
        Ok(self.db.units().list_by_owner(owner_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

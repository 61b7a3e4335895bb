//! # Review Service
//!
//! Review creation, editing, and deletion under the one-per-pair rule.
//!
//! ## Duplicate Guard
//! The "one review per (author, unit)" check runs inside the same
//! transaction as the insert. Two concurrent first-reviews by the same
//! author cannot both pass the count; if anything ever does slip through,
//! the schema's UNIQUE index rejects the second insert and surfaces as the
//! same Conflict.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use stays_core::authz;
use stays_core::validation::{validate_rating, validate_review_text};
use stays_core::{Review, ValidationError};
use stays_db::error::DbResult;
use stays_db::{Database, ReviewRepository};

use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::retry;

/// Orchestrates review operations against the store.
#[derive(Debug, Clone)]
pub struct ReviewService {
    db: Database,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl ReviewService {
    /// Creates a new ReviewService.
    pub fn new(db: Database, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        ReviewService { db, clock, config }
    }

    /// Creates a review of a unit by `actor_id`.
    ///
    /// ## Errors
    /// - `Validation` - rating outside 1..=5, or empty text
    /// - `NotFound` - no such unit
    /// - `Forbidden` - the actor owns the unit (self-review)
    /// - `Conflict` - the actor already reviewed this unit
    pub async fn create_review(
        &self,
        actor_id: &str,
        unit_id: &str,
        rating: i64,
        text: &str,
    ) -> ServiceResult<Review> {
        let mut errors: Vec<ValidationError> = Vec::new();
        if let Err(e) = validate_rating(rating) {
            errors.push(e);
        }
        if let Err(e) = validate_review_text(text) {
            errors.push(e);
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let unit = self
            .db
            .units()
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", unit_id))?;

        authz::check_review_create(actor_id, &unit.owner_id)?;

        let now = self.clock.now();
        let review = Review {
            id: Uuid::new_v4().to_string(),
            unit_id: unit.id,
            author_id: actor_id.to_string(),
            rating,
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        };

        let inserted = retry::with_store_retry(&self.config, "review_create", || {
            self.insert_guarded(&review, actor_id)
        })
        .await?;

        if !inserted {
            return Err(ServiceError::conflict(
                "the actor has already reviewed this unit",
            ));
        }

        info!(review_id = %review.id, unit_id = %review.unit_id, "Review created");
        Ok(review)
    }

    /// One attempt of the duplicate-guarded insert. The check and the
    /// insert share one transaction; returns false without writing when
    /// the author already reviewed the unit.
    async fn insert_guarded(&self, review: &Review, author_id: &str) -> DbResult<bool> {
        let mut tx = self.db.pool().begin().await?;

        if ReviewRepository::exists_for_author_tx(&mut *tx, &review.unit_id, author_id).await? {
            return Ok(false);
        }

        ReviewRepository::insert_tx(&mut *tx, review).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Updates a review's rating and text. Author only.
    pub async fn update_review(
        &self,
        actor_id: &str,
        review_id: &str,
        rating: i64,
        text: &str,
    ) -> ServiceResult<Review> {
        validate_rating(rating)?;
        validate_review_text(text)?;

        let mut review = self
            .db
            .reviews()
            .get_by_id(review_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Review", review_id))?;

        authz::check_review_mutate(actor_id, &review.author_id)?;

        let now = self.clock.now();
        self.db.reviews().update(review_id, rating, text, now).await?;

        review.rating = rating;
        review.text = text.to_string();
        review.updated_at = now;
        Ok(review)
    }

    /// Deletes a review. Author only. Its images cascade, and the author's
    /// review slot for the unit opens up again.
    pub async fn delete_review(&self, actor_id: &str, review_id: &str) -> ServiceResult<()> {
        let review = self
            .db
            .reviews()
            .get_by_id(review_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Review", review_id))?;

        authz::check_review_mutate(actor_id, &review.author_id)?;

        self.db.reviews().delete(review_id).await?;

        info!(review_id = %review_id, unit_id = %review.unit_id, "Review deleted");
        Ok(())
    }

    /// Lists a unit's reviews, oldest first. Public read.
    pub async fn list_for_unit(&self, unit_id: &str) -> ServiceResult<Vec<Review>> {
        if self.db.units().get_by_id(unit_id).await?.is_none() {
            return Err(ServiceError::not_found("Unit", unit_id));
        }

        Ok(self.db.reviews().list_for_unit(unit_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{fixed_clock, seed_unit, test_db, OWNER};
    use stays_core::AuthzDenied;

    const AUTHOR: &str = "guest-1";
    const OTHER: &str = "guest-2";

    async fn service() -> (ReviewService, Database) {
        let db = test_db().await;
        let svc = ReviewService::new(db.clone(), fixed_clock(), ServiceConfig::default());
        (svc, db)
    }

    #[tokio::test]
    async fn test_create_review() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let review = svc
            .create_review(AUTHOR, &unit.id, 5, "great stay")
            .await
            .unwrap();

        assert_eq!(review.rating, 5);
        assert_eq!(review.author_id, AUTHOR);
    }

    #[tokio::test]
    async fn test_create_review_validates_input() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        // Bad rating and empty text reported together
        let err = svc.create_review(AUTHOR, &unit.id, 6, "  ").await.unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_self_review_forbidden() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let err = svc
            .create_review(OWNER, &unit.id, 5, "lovely place I own")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Forbidden(AuthzDenied::SelfReview)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_review_conflicts() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        svc.create_review(AUTHOR, &unit.id, 4, "good").await.unwrap();

        let err = svc
            .create_review(AUTHOR, &unit.id, 5, "even better")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));

        // A different author may still review
        svc.create_review(OTHER, &unit.id, 3, "fine").await.unwrap();
    }

    #[tokio::test]
    async fn test_deleting_review_reopens_slot() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let review = svc.create_review(AUTHOR, &unit.id, 4, "good").await.unwrap();
        svc.delete_review(AUTHOR, &review.id).await.unwrap();

        svc.create_review(AUTHOR, &unit.id, 5, "second visit")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_review_author_only() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let review = svc.create_review(AUTHOR, &unit.id, 4, "good").await.unwrap();

        let err = svc
            .update_review(OTHER, &review.id, 1, "sabotage")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let updated = svc
            .update_review(AUTHOR, &review.id, 5, "upgraded opinion")
            .await
            .unwrap();
        assert_eq!(updated.rating, 5);
    }

    #[tokio::test]
    async fn test_review_on_missing_unit_not_found() {
        let (svc, _db) = service().await;

        let err = svc
            .create_review(AUTHOR, "no-such-unit", 4, "good")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Unit", .. }));

        let err = svc.list_for_unit("no-such-unit").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_reviews() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        svc.create_review(AUTHOR, &unit.id, 4, "good").await.unwrap();
        svc.create_review(OTHER, &unit.id, 2, "meh").await.unwrap();

        let reviews = svc.list_for_unit(&unit.id).await.unwrap();
        assert_eq!(reviews.len(), 2);
    }
}

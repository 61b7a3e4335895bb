//! # Image Service
//!
//! Image attachment under the nested-resource guards.
//!
//! ## Guards
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Parent      │ Guard                                                    │
//! │  ────────────┼──────────────────────────────────────────────────────    │
//! │  Unit        │ at most one preview image (new preview replaces old)     │
//! │  Review      │ at most 10 images, counted inside the inserting          │
//! │              │ transaction; never a preview                             │
//! │  Either      │ only the parent's owner may attach or remove             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The [`stays_core::ImageParent`] argument makes "both parents" and
//! "neither parent" unrepresentable at this boundary; the schema CHECK
//! enforces the same rule one layer down.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use stays_core::validation::validate_url;
use stays_core::{authz, Image, ImageParent, ValidationError, MAX_IMAGES_PER_REVIEW};
use stays_db::{Database, ImageRepository};

use stays_db::error::DbResult;

use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::retry;

/// Orchestrates image operations against the store.
#[derive(Debug, Clone)]
pub struct ImageService {
    db: Database,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl ImageService {
    /// Creates a new ImageService.
    pub fn new(db: Database, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        ImageService { db, clock, config }
    }

    /// Attaches an image to a unit or review.
    ///
    /// ## Errors
    /// - `Validation` - empty url, or a preview requested on a review image
    /// - `NotFound` - the parent does not exist
    /// - `Forbidden` - the actor does not own the parent
    /// - `Conflict` - the review already carries its maximum of 10 images
    pub async fn add_image(
        &self,
        actor_id: &str,
        parent: ImageParent,
        url: &str,
        preview: bool,
    ) -> ServiceResult<Image> {
        validate_url(url)?;

        match parent {
            ImageParent::Unit(unit_id) => {
                self.add_unit_image(actor_id, &unit_id, url, preview).await
            }
            ImageParent::Review(review_id) => {
                if preview {
                    return Err(ValidationError::InvalidFormat {
                        field: "preview".to_string(),
                        reason: "only unit images can be previews".to_string(),
                    }
                    .into());
                }
                self.add_review_image(actor_id, &review_id, url).await
            }
        }
    }

    async fn add_unit_image(
        &self,
        actor_id: &str,
        unit_id: &str,
        url: &str,
        preview: bool,
    ) -> ServiceResult<Image> {
        let unit = self
            .db
            .units()
            .get_by_id(unit_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", unit_id))?;

        authz::check_image_mutate(actor_id, &unit.owner_id, "unit")?;

        let image = self.build_image(actor_id, Some(unit_id), None, url, preview);

        retry::with_store_retry(&self.config, "unit_image_attach", || {
            self.insert_unit_image(&image, unit_id, preview)
        })
        .await?;

        info!(image_id = %image.id, unit_id = %unit_id, preview, "Unit image attached");
        Ok(image)
    }

    /// One attempt of the preview-demoting insert, in one transaction.
    async fn insert_unit_image(&self, image: &Image, unit_id: &str, preview: bool) -> DbResult<()> {
        let mut tx = self.db.pool().begin().await?;

        // A new preview demotes the current one; at most one survives
        if preview {
            ImageRepository::clear_unit_preview_tx(&mut *tx, unit_id).await?;
        }
        ImageRepository::insert_tx(&mut *tx, image).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn add_review_image(
        &self,
        actor_id: &str,
        review_id: &str,
        url: &str,
    ) -> ServiceResult<Image> {
        let review = self
            .db
            .reviews()
            .get_by_id(review_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Review", review_id))?;

        authz::check_image_mutate(actor_id, &review.author_id, "review")?;

        let image = self.build_image(actor_id, None, Some(review_id), url, false);

        let inserted = retry::with_store_retry(&self.config, "review_image_attach", || {
            self.insert_capped(&image, review_id)
        })
        .await?;

        if !inserted {
            return Err(ServiceError::conflict(format!(
                "a review holds at most {MAX_IMAGES_PER_REVIEW} images"
            )));
        }

        info!(image_id = %image.id, review_id = %review_id, "Review image attached");
        Ok(image)
    }

    /// One attempt of the cap-checked insert. The count and the insert
    /// share one transaction, so two concurrent uploads cannot both pass
    /// at nine images; returns false without writing when the cap is hit.
    async fn insert_capped(&self, image: &Image, review_id: &str) -> DbResult<bool> {
        let mut tx = self.db.pool().begin().await?;

        let count = ImageRepository::count_for_review_tx(&mut *tx, review_id).await?;
        if count >= MAX_IMAGES_PER_REVIEW {
            return Ok(false);
        }

        ImageRepository::insert_tx(&mut *tx, image).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Removes an image. Only the parent's owner may remove it.
    pub async fn delete_image(&self, actor_id: &str, image_id: &str) -> ServiceResult<()> {
        let (image, parent_owner_id) = self
            .db
            .images()
            .get_with_parent_owner(image_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Image", image_id))?;

        let parent = match image.parent() {
            Some(ImageParent::Unit(_)) => "unit",
            Some(ImageParent::Review(_)) => "review",
            // Unreachable under the schema CHECK; treat as an orphan
            None => return Err(ServiceError::Internal("image has no parent".to_string())),
        };
        authz::check_image_mutate(actor_id, &parent_owner_id, parent)?;

        self.db.images().delete(image_id).await?;

        info!(image_id = %image_id, "Image removed");
        Ok(())
    }

    /// Lists a unit's images, oldest first. Public read.
    pub async fn list_for_unit(&self, unit_id: &str) -> ServiceResult<Vec<Image>> {
        if self.db.units().get_by_id(unit_id).await?.is_none() {
            return Err(ServiceError::not_found("Unit", unit_id));
        }

        Ok(self.db.images().list_for_unit(unit_id).await?)
    }

    /// Lists a review's images, oldest first. Public read.
    pub async fn list_for_review(&self, review_id: &str) -> ServiceResult<Vec<Image>> {
        if self.db.reviews().get_by_id(review_id).await?.is_none() {
            return Err(ServiceError::not_found("Review", review_id));
        }

        Ok(self.db.images().list_for_review(review_id).await?)
    }

    fn build_image(
        &self,
        actor_id: &str,
        unit_id: Option<&str>,
        review_id: Option<&str>,
        url: &str,
        preview: bool,
    ) -> Image {
        Image {
            id: Uuid::new_v4().to_string(),
            owner_id: actor_id.to_string(),
            url: url.to_string(),
            unit_id: unit_id.map(str::to_string),
            review_id: review_id.map(str::to_string),
            preview,
            created_at: self.clock.now(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::ReviewService;
    use crate::testutil::{fixed_clock, seed_unit, test_db, OWNER};

    const AUTHOR: &str = "guest-1";
    const STRANGER: &str = "stranger-1";

    async fn service() -> (ImageService, Database) {
        let db = test_db().await;
        let svc = ImageService::new(db.clone(), fixed_clock(), ServiceConfig::default());
        (svc, db)
    }

    async fn seed_review(db: &Database) -> (String, stays_core::Review) {
        let unit = seed_unit(db).await;
        let reviews = ReviewService::new(db.clone(), fixed_clock(), ServiceConfig::default());
        let review = reviews
            .create_review(AUTHOR, &unit.id, 4, "good")
            .await
            .unwrap();
        (unit.id, review)
    }

    #[tokio::test]
    async fn test_attach_unit_image() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let image = svc
            .add_image(
                OWNER,
                ImageParent::Unit(unit.id.clone()),
                "https://img.example/1.jpg",
                false,
            )
            .await
            .unwrap();

        assert_eq!(image.unit_id.as_deref(), Some(unit.id.as_str()));
        assert!(image.review_id.is_none());
    }

    #[tokio::test]
    async fn test_only_parent_owner_may_attach() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let err = svc
            .add_image(
                STRANGER,
                ImageParent::Unit(unit.id.clone()),
                "https://img.example/1.jpg",
                false,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        // Review images belong to the review's author, not the unit owner
        let (_, review) = seed_review(&db).await;
        let err = svc
            .add_image(
                OWNER,
                ImageParent::Review(review.id.clone()),
                "https://img.example/2.jpg",
                false,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_review_image_cap() {
        let (svc, db) = service().await;
        let (_, review) = seed_review(&db).await;

        for i in 0..MAX_IMAGES_PER_REVIEW {
            svc.add_image(
                AUTHOR,
                ImageParent::Review(review.id.clone()),
                &format!("https://img.example/{i}.jpg"),
                false,
            )
            .await
            .unwrap();
        }

        // The eleventh is rejected
        let err = svc
            .add_image(
                AUTHOR,
                ImageParent::Review(review.id.clone()),
                "https://img.example/11.jpg",
                false,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));

        // Removing one frees a slot
        let images = svc.list_for_review(&review.id).await.unwrap();
        svc.delete_image(AUTHOR, &images[0].id).await.unwrap();
        svc.add_image(
            AUTHOR,
            ImageParent::Review(review.id.clone()),
            "https://img.example/12.jpg",
            false,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_new_preview_replaces_old() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let first = svc
            .add_image(
                OWNER,
                ImageParent::Unit(unit.id.clone()),
                "https://img.example/1.jpg",
                true,
            )
            .await
            .unwrap();
        let second = svc
            .add_image(
                OWNER,
                ImageParent::Unit(unit.id.clone()),
                "https://img.example/2.jpg",
                true,
            )
            .await
            .unwrap();

        let images = svc.list_for_unit(&unit.id).await.unwrap();
        let previews: Vec<_> = images.iter().filter(|i| i.preview).collect();
        assert_eq!(previews.len(), 1, "at most one preview per unit");
        assert_eq!(previews[0].id, second.id);
        assert_ne!(previews[0].id, first.id);
    }

    #[tokio::test]
    async fn test_review_image_cannot_be_preview() {
        let (svc, db) = service().await;
        let (_, review) = seed_review(&db).await;

        let err = svc
            .add_image(
                AUTHOR,
                ImageParent::Review(review.id.clone()),
                "https://img.example/1.jpg",
                true,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_image_parent_owner_only() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let image = svc
            .add_image(
                OWNER,
                ImageParent::Unit(unit.id.clone()),
                "https://img.example/1.jpg",
                false,
            )
            .await
            .unwrap();

        let err = svc.delete_image(STRANGER, &image.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        svc.delete_image(OWNER, &image.id).await.unwrap();
        let err = svc.delete_image(OWNER, &image.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_attach_to_missing_parent_not_found() {
        let (svc, _db) = service().await;

        let err = svc
            .add_image(
                OWNER,
                ImageParent::Unit("no-such-unit".to_string()),
                "https://img.example/1.jpg",
                false,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let err = svc
            .add_image(
                AUTHOR,
                ImageParent::Review("no-such-review".to_string()),
                "https://img.example/1.jpg",
                false,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_deleting_review_cascades_images() {
        let (svc, db) = service().await;
        let (_, review) = seed_review(&db).await;

        svc.add_image(
            AUTHOR,
            ImageParent::Review(review.id.clone()),
            "https://img.example/1.jpg",
            false,
        )
        .await
        .unwrap();

        db.reviews().delete(&review.id).await.unwrap();

        let images = db.images().list_for_review(&review.id).await.unwrap();
        assert!(images.is_empty(), "images must cascade with the review");
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let (svc, db) = service().await;
        let unit = seed_unit(&db).await;

        let err = svc
            .add_image(OWNER, ImageParent::Unit(unit.id.clone()), "  ", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}

//! # stays-service: In-Process Service Boundary for Stays
//!
//! The surface callers talk to. Operations take an already-authenticated
//! actor id, run the pure rules from stays-core against storage from
//! stays-db, and report outcomes through a five-class error taxonomy.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stays Service Layer                              │
//! │                                                                         │
//! │  Caller (actor id from the external auth layer)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stays-service (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌──────────────┐ ┌────────────┐ ┌────────────┐ │   │
//! │  │  │UnitService │ │ Reservation  │ │  Review    │ │  Image     │ │   │
//! │  │  │            │ │ Service      │ │  Service   │ │  Service   │ │   │
//! │  │  │ CRUD       │ │ lock → tx →  │ │ dup guard  │ │ cap, one   │ │   │
//! │  │  │            │ │ scan → write │ │ in tx      │ │ preview    │ │   │
//! │  │  └────────────┘ └──────────────┘ └────────────┘ └────────────┘ │   │
//! │  │                                                                 │   │
//! │  │  Shared: Clock (injected), ServiceConfig (retry/deadline),     │   │
//! │  │          ServiceError {Validation, NotFound, Forbidden,        │   │
//! │  │                        Conflict, Internal}                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                          │                                      │
//! │       ▼                          ▼                                      │
//! │  stays-core (pure rules)    stays-db (SQLite)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Listing lifecycle
//! - [`reservations`] - Booking create/reschedule/cancel/list with the
//!   per-unit serializable write path
//! - [`reviews`] - Reviews under the one-per-(author, unit) rule
//! - [`images`] - Images under the cap and single-preview guards
//! - [`clock`] - Clock injection ("today" is never read ambiently)
//! - [`config`] - Retry and deadline policy
//! - [`error`] - The caller-facing error taxonomy

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod config;
pub mod error;
pub mod images;
pub mod reservations;
pub mod reviews;
pub mod units;

mod retry;

#[cfg(test)]
pub(crate) mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use images::ImageService;
pub use reservations::ReservationService;
pub use reviews::ReviewService;
pub use units::UnitService;

use std::sync::Arc;

use stays_db::{Database, DbConfig};

// =============================================================================
// Facade
// =============================================================================

/// One handle owning the database and handing out the per-domain services.
///
/// ## Example
/// ```rust,ignore
/// let stays = Stays::open(DbConfig::new("stays.db"), ServiceConfig::default()).await?;
/// let booking = stays
///     .reservations()
///     .create_booking(actor_id, unit_id, start, end)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Stays {
    db: Database,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl Stays {
    /// Opens the database (running migrations) and wires the system clock.
    pub async fn open(db_config: DbConfig, config: ServiceConfig) -> ServiceResult<Self> {
        let db = Database::new(db_config).await?;
        Ok(Stays {
            db,
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// Wires the services over an existing database with an explicit clock.
    /// Tests use this to pin "today".
    pub fn with_clock(db: Database, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        Stays { db, clock, config }
    }

    /// The unit service.
    pub fn units(&self) -> UnitService {
        UnitService::new(self.db.clone(), self.clock.clone())
    }

    /// The reservation service.
    pub fn reservations(&self) -> ReservationService {
        ReservationService::new(self.db.clone(), self.clock.clone(), self.config.clone())
    }

    /// The review service.
    pub fn reviews(&self) -> ReviewService {
        ReviewService::new(self.db.clone(), self.clock.clone(), self.config.clone())
    }

    /// The image service.
    pub fn images(&self) -> ImageService {
        ImageService::new(self.db.clone(), self.clock.clone(), self.config.clone())
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the underlying connection pool.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

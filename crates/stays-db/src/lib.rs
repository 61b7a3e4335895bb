//! # stays-db: Database Layer for Stays
//!
//! This crate provides database access for the Stays reservation system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stays Data Flow                                  │
//! │                                                                         │
//! │  Service operation (create_booking)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     stays-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  UnitLocks   │  │   │
//! │  │   │   (pool.rs)   │    │ (booking.rs)  │    │  (locks.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ BookingRepo   │    │ per-unit     │  │   │
//! │  │   │ Migrations    │    │ UnitRepo ...  │    │ advisory     │  │   │
//! │  │   │ WAL mode      │    │               │    │ mutexes      │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                        SQLite Database                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`locks`] - Per-unit advisory locks for reservation serializability
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (unit, booking, review, image)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stays_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/stays.db")).await?;
//! let unit = db.units().get_by_id("...").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod locks;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use locks::UnitLocks;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::booking::BookingRepository;
pub use repository::image::ImageRepository;
pub use repository::review::ReviewRepository;
pub use repository::unit::UnitRepository;

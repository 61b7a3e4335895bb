//! # stays-core: Pure Business Logic for Stays
//!
//! This crate is the **heart** of the Stays reservation system. It contains
//! all business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stays Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Caller (authenticated actor id)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   stays-service (boundary)                      │   │
//! │  │    create_booking, cancel_booking, create_review, add_image     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stays-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ conflict  │  │   authz   │  │ validation│  │   │
//! │  │   │   Unit    │  │ DateRange │  │  resolver │  │   rules   │  │   │
//! │  │   │  Booking  │  │  overlap  │  │ rule table│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stays-db (Database Layer)                    │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Unit, Booking, Review, Image)
//! - [`conflict`] - Half-open date intervals and overlap detection
//! - [`authz`] - Authorization resolver (pure rule table)
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **No Ambient Clock**: "today" is always an explicit parameter
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use stays_core::conflict::{conflicts, DateRange};
//!
//! let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//!
//! let existing = vec![DateRange::new(date(2025, 1, 1), date(2025, 1, 5))];
//!
//! // Checkout day equals checkin day: no conflict (half-open intervals)
//! let candidate = DateRange::new(date(2025, 1, 5), date(2025, 1, 10));
//! assert!(!conflicts(&existing, &candidate));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod authz;
pub mod conflict;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stays_core::DateRange` instead of
// `use stays_core::conflict::DateRange`

pub use conflict::DateRange;
pub use error::{AuthzDenied, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum images that may be attached to a single review.
///
/// ## Business Reason
/// Keeps review payloads bounded. Enforced with a fresh count inside the
/// inserting transaction so two concurrent uploads cannot both pass a
/// stale check.
pub const MAX_IMAGES_PER_REVIEW: i64 = 10;

/// Minimum allowed review rating (inclusive).
pub const MIN_RATING: i64 = 1;

/// Maximum allowed review rating (inclusive).
pub const MAX_RATING: i64 = 5;

/// Maximum length of a unit name, in characters.
pub const MAX_UNIT_NAME_LEN: usize = 50;

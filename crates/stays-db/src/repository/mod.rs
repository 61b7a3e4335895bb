//! # Repository Module
//!
//! Database repository implementations for Stays.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                          │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Service operation                                                      │
//! │       │                                                                 │
//! │       │  db.bookings().get_with_unit_owner(id)                          │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  BookingRepository                                                       │
//! │  ├── pool-based methods (reads, deletes)                                │
//! │  └── *_tx methods taking &mut SqliteConnection                          │
//! │       │      ↑                                                          │
//! │       │      The service opens ONE transaction and threads it           │
//! │       │      through every read and write of a check-and-insert         │
//! │       │      sequence, so the conflict check sees exactly the           │
//! │       │      rows the insert will coexist with.                         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`unit::UnitRepository`] - Unit CRUD
//! - [`booking::BookingRepository`] - Booking reads, writes, range queries
//! - [`review::ReviewRepository`] - Review CRUD and duplicate checks
//! - [`image::ImageRepository`] - Image CRUD, caps, preview flag

pub mod booking;
pub mod image;
pub mod review;
pub mod unit;

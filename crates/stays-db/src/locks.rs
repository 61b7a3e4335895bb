//! # Per-Unit Advisory Locks
//!
//! Serializes read-check-write booking sequences per unit.
//!
//! ## Why This Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  The Read-Committed Race                                 │
//! │                                                                         │
//! │  WITHOUT the lock:                                                      │
//! │                                                                         │
//! │  Request A: read bookings ──► 0 conflicts ──► insert [Jan 1, Jan 5)    │
//! │  Request B: read bookings ──► 0 conflicts ──► insert [Jan 3, Jan 7)    │
//! │                    ▲                                                     │
//! │                    Both reads happened before either insert:            │
//! │                    DOUBLE BOOKING committed.                            │
//! │                                                                         │
//! │  WITH the lock (keyed by unit id):                                      │
//! │                                                                         │
//! │  Request A: lock(unit) ─ read ─ check ─ insert ─ commit ─ unlock       │
//! │  Request B:      └─ waits ─┘ read ─ check ─ CONFLICT reported          │
//! │                                                                         │
//! │  Requests for DIFFERENT units never contend.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scope Discipline
//! The guard is held only for the duration of the transactional
//! check-and-write. It is never held across a round trip back to the
//! caller, so no request can stall the unit indefinitely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Advisory lock table keyed by unit id.
///
/// Cloning is cheap and shares the underlying table, so every repository
/// and service handle sees the same locks.
///
/// Entries are created on first use and kept for the process lifetime;
/// the table is bounded by the number of distinct units touched, which
/// matches the working set anyway.
#[derive(Debug, Clone, Default)]
pub struct UnitLocks {
    inner: Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl UnitLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        UnitLocks::default()
    }

    /// Acquires the lock for a unit, waiting if another task holds it.
    ///
    /// The returned guard is owned (not borrowed from `self`) so it can be
    /// held across await points for the duration of a transaction.
    pub async fn acquire(&self, unit_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            // The table mutex is held only to fetch/insert the entry,
            // never across an await.
            let mut table = self
                .inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                table
                    .entry(unit_id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        lock.lock_owned().await
    }
}

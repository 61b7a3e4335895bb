//! # Clock Injection
//!
//! The derived booking status (Proposed / Started) depends on "today", so
//! "today" is a trait, not an ambient read. Production uses [`SystemClock`];
//! tests pin a [`FixedClock`] to make start-date boundaries deterministic.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt::Debug;

/// Source of the current date and time.
pub trait Clock: Send + Sync + Debug {
    /// The current calendar date, used for booking state derivation and
    /// date validation.
    fn today(&self) -> NaiveDate;

    /// The current instant, used for created_at/updated_at timestamps.
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a specific instant. Deterministic, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Pins the clock to noon UTC on the given date.
    pub fn on(date: NaiveDate) -> Self {
        // Noon avoids any date ambiguity at midnight boundaries.
        let now = date
            .and_hms_opt(12, 0, 0)
            .unwrap_or_default()
            .and_utc();
        FixedClock { now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

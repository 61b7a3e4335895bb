//! Shared helpers for service tests: an in-memory database, a pinned
//! clock, and a seeded unit.

use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use stays_core::Unit;
use stays_db::{Database, DbConfig};

use crate::clock::{Clock, FixedClock};

/// The owner every seeded unit belongs to.
pub(crate) const OWNER: &str = "owner-1";

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The pinned "today" every service test runs under.
pub(crate) fn today() -> NaiveDate {
    date(2025, 6, 1)
}

pub(crate) fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::on(today()))
}

pub(crate) async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

pub(crate) async fn seed_unit(db: &Database) -> Unit {
    let now = chrono::Utc::now();
    let unit = Unit {
        id: Uuid::new_v4().to_string(),
        owner_id: OWNER.to_string(),
        name: "Lakeside cabin".to_string(),
        description: None,
        created_at: now,
        updated_at: now,
    };
    db.units().insert(&unit).await.unwrap();
    unit
}

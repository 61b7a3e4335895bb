//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (stays-service) ← The caller-facing taxonomy              │
//! │                                                                         │
//! │  Busy is the ONE retryable class: the service retries a bounded        │
//! │  number of times with backoff, then surfaces Internal.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for the service layer's error taxonomy.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Second review by the same author for the same unit
    /// - Any UNIQUE index violation
    /// `field` is already normalized to "table (column, ...)" form by the
    /// sqlx conversion below.
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a unit or review that was deleted mid-flight
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The database was locked by a concurrent writer.
    ///
    /// The only transient, retryable class. The service layer retries
    /// these with bounded backoff; every other variant is definitive.
    #[error("Database busy: {0}")]
    Busy(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether this error is safe to retry (store contention, not a
    /// business outcome).
    pub fn is_retryable(&self) -> bool {
        matches!(self, DbError::Busy(_) | DbError::PoolExhausted)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint / busy
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                // SQLite constraint/busy messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint:     "FOREIGN KEY constraint failed"
                // Busy writer:       "database is locked" / "database table is locked"
                if msg.contains("UNIQUE constraint failed") {
                    let raw = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown");
                    DbError::UniqueViolation {
                        field: normalize_constraint(raw),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation { message: msg }
                } else if msg.contains("database is locked")
                    || msg.contains("database table is locked")
                {
                    DbError::Busy(msg)
                } else {
                    DbError::QueryFailed(msg)
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Rewrites SQLite's constraint dump ("reviews.unit_id, reviews.author_id")
/// into a single readable reference ("reviews (unit_id, author_id)").
fn normalize_constraint(raw: &str) -> String {
    let mut table: Option<&str> = None;
    let mut columns = Vec::new();

    for part in raw.split(',').map(str::trim) {
        match part.split_once('.') {
            Some((t, column)) => {
                table.get_or_insert(t);
                columns.push(column);
            }
            None => columns.push(part),
        }
    }

    match table {
        Some(t) if !columns.is_empty() => format!("{t} ({})", columns.join(", ")),
        _ => raw.to_string(),
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(DbError::Busy("database is locked".to_string()).is_retryable());
        assert!(DbError::PoolExhausted.is_retryable());

        assert!(!DbError::not_found("Booking", "b-1").is_retryable());
        assert!(!DbError::UniqueViolation {
            field: "reviews (unit_id, author_id)".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_constraint_dump_normalized() {
        assert_eq!(
            normalize_constraint("reviews.unit_id, reviews.author_id"),
            "reviews (unit_id, author_id)"
        );
        assert_eq!(normalize_constraint("units.id"), "units (id)");

        // Anything unrecognizable passes through untouched
        assert_eq!(normalize_constraint("unknown"), "unknown");
    }
}

//! # Store Contention Retry
//!
//! One retry policy for every transactional write path.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Retry Decision                                        │
//! │                                                                         │
//! │  attempt() ──► Ok(value)            return it                           │
//! │           ──► Err(retryable)        attempt < budget?                   │
//! │           │      (Busy, pool)        ├── yes: backoff x attempt, retry  │
//! │           │                          └── no:  Internal                  │
//! │           ──► Err(definitive)       map through the taxonomy            │
//! │           ──► deadline expired      Internal (transaction dropped,      │
//! │                                      nothing committed)                 │
//! │                                                                         │
//! │  Business outcomes (Conflict, duplicate, cap) travel in the Ok          │
//! │  channel of the attempt and are NEVER retried.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use tokio::time::{sleep, timeout};
use tracing::warn;

use stays_db::error::DbResult;

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};

/// Runs one transactional attempt under the configured deadline, retrying
/// transient store contention within the budget.
///
/// `attempt_fn` must be safe to call again after a failed attempt: each
/// call opens its own transaction, and a failed attempt commits nothing.
pub(crate) async fn with_store_retry<T, F, Fut>(
    config: &ServiceConfig,
    op: &'static str,
    mut attempt_fn: F,
) -> ServiceResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match timeout(config.tx_timeout, attempt_fn()).await {
            Err(_) => {
                return Err(ServiceError::Internal(format!(
                    "{op}: transaction deadline exceeded"
                )))
            }
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) if err.is_retryable() && attempt < config.max_retries => {
                attempt += 1;
                warn!(op, attempt, error = %err, "Retrying write after store contention");
                sleep(config.retry_backoff * attempt).await;
            }
            Ok(Err(err)) => return Err(err.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

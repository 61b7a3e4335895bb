//! # Service Configuration
//!
//! Retry and deadline policy for write operations.

use std::time::Duration;

/// Tunables for the service layer.
///
/// ## Example
/// ```rust,ignore
/// let config = ServiceConfig::default()
///     .max_retries(5)
///     .tx_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// How many times a write is retried after transient store contention
    /// (a busy database). Definitive outcomes are never retried.
    /// Default: 3
    pub max_retries: u32,

    /// Base backoff between retries; attempt N sleeps N x this value.
    /// Default: 50ms
    pub retry_backoff: Duration,

    /// Upper bound on a single transactional attempt, lock wait included.
    /// Attempts past the deadline surface as Internal.
    /// Default: 5 seconds
    pub tx_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            max_retries: 3,
            retry_backoff: Duration::from_millis(50),
            tx_timeout: Duration::from_secs(5),
        }
    }
}

impl ServiceConfig {
    /// Sets the retry budget for transient store contention.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the base backoff between retries.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Sets the per-attempt transaction deadline.
    pub fn tx_timeout(mut self, timeout: Duration) -> Self {
        self.tx_timeout = timeout;
        self
    }
}

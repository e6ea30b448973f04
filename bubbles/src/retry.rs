//! Bounded retry for best-effort remote writes.
//!
//! Position writes are convenience data: the in-memory position stays
//! correct for the session either way, but a dropped write makes the bubble
//! jump back on the next visit. Retryable failures are retried a fixed
//! number of times with linear back-off, then logged and given up.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::comment::BubblePosition;
use crate::remote::{RemoteError, RemoteStore};

const DEFAULT_RETRY_ATTEMPTS: usize = 3;
const DEFAULT_RETRY_BASE_MS: u64 = 50;

/// How many times to try a write and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub attempts: usize,
    /// Delay before attempt `n + 1` is `n * base_delay_ms`.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: DEFAULT_RETRY_ATTEMPTS, base_delay_ms: DEFAULT_RETRY_BASE_MS }
    }
}

impl RetryPolicy {
    /// Read `POSITION_RETRY_ATTEMPTS` and `POSITION_RETRY_BASE_MS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            attempts: env_parse("POSITION_RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS),
            base_delay_ms: env_parse("POSITION_RETRY_BASE_MS", DEFAULT_RETRY_BASE_MS),
        }
    }

    /// A policy that tries once and never sleeps.
    #[must_use]
    pub fn none() -> Self {
        Self { attempts: 1, base_delay_ms: 0 }
    }

    fn delay_after(&self, attempt: usize) -> Duration {
        Duration::from_millis((attempt as u64).saturating_mul(self.base_delay_ms))
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(v) => v.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or attempts run out.
///
/// # Errors
///
/// Returns the last error seen.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, what: &str, mut op: F) -> Result<T, RemoteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let total = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.retryable() && attempt < total => {
                warn!(error = %e, attempt, total, what, "remote call failed; retrying");
                tokio::time::sleep(policy.delay_after(attempt)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Upsert a bubble position with retry. Failures are logged, never returned.
///
/// Returns `true` if the row was stored.
pub async fn persist_position(remote: &dyn RemoteStore, row: &BubblePosition, policy: RetryPolicy) -> bool {
    match with_retry(policy, "upsert_position", || remote.upsert_position(row)).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                error = %e,
                comment_id = %row.comment_id,
                photo_id = %row.photo_id,
                "position write dropped; bubble keeps its in-memory position"
            );
            false
        }
    }
}

//! Pluggable validation of the signed timestamp.

use chrono::Utc;

use crate::error::TimestampError;

/// Default allowed skew between a signed timestamp and wall-clock time.
pub const DEFAULT_SKEW_SECONDS: i64 = 300;

/// A predicate over the signed timestamp. Implementations see only the
/// integer, never the request, and must be safe to call concurrently.
pub trait TimeChecker: Send + Sync {
    /// Returns `Ok(())` if `timestamp` is acceptable, or a descriptive
    /// error otherwise.
    fn check(&self, timestamp: i64) -> Result<(), TimestampError>;
}

/// Accepts timestamps within `skew_seconds` of the current wall clock.
#[derive(Debug, Clone, Copy)]
pub struct BoundedSkewTimeChecker {
    skew_seconds: i64,
}

impl BoundedSkewTimeChecker {
    #[must_use]
    pub fn new(skew_seconds: i64) -> Self {
        Self { skew_seconds }
    }
}

impl Default for BoundedSkewTimeChecker {
    fn default() -> Self {
        Self::new(DEFAULT_SKEW_SECONDS)
    }
}

impl TimeChecker for BoundedSkewTimeChecker {
    fn check(&self, timestamp: i64) -> Result<(), TimestampError> {
        let now = Utc::now().timestamp();
        let delta = (i128::from(now) - i128::from(timestamp)).unsigned_abs();
        if delta > self.skew_seconds as u128 {
            return Err(TimestampError(format!(
                "timestamp {timestamp} is {delta}s from now, outside the {}s window",
                self.skew_seconds
            )));
        }
        Ok(())
    }
}

/// Accepts every timestamp. Useful for tests and for embedders that bind
/// replay protection some other way.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTimeChecker;

impl TimeChecker for NoopTimeChecker {
    fn check(&self, _timestamp: i64) -> Result<(), TimestampError> {
        Ok(())
    }
}

//! Backoff controller for consecutive poll failures.

use std::time::Duration;

use toolbridge_config::ServiceConfig;

/// What the loop does after the k-th consecutive poll failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStep {
    Wait(Duration),
    GiveUp,
}

/// Exponential backoff, capped, with a give-up threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Stop once this many polls failed in a row
    pub max_consecutive_errors: u32,
    /// Upper bound on a single wait
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_errors: 10,
            cap: Duration::from_secs(30),
        }
    }
}

impl From<&ServiceConfig> for BackoffPolicy {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            max_consecutive_errors: config.max_consecutive_errors,
            cap: config.backoff_cap(),
        }
    }
}

impl BackoffPolicy {
    /// `min(cap, 2^errors)` seconds.
    pub fn delay(&self, errors: u32) -> Duration {
        let secs = 2u64.checked_pow(errors).unwrap_or(u64::MAX);
        Duration::from_secs(secs).min(self.cap)
    }

    pub fn next(&self, errors: u32) -> BackoffStep {
        if errors >= self.max_consecutive_errors {
            BackoffStep::GiveUp
        } else {
            BackoffStep::Wait(self.delay(errors))
        }
    }
}

//! Deterministic exponential backoff policy
//!
//! Maps an attempt index to a wait duration:
//! `min(initial * 2^attempt, max)`. Pure and monotonically
//! non-decreasing, shared by the fetch client and the refresher.

use std::time::Duration;

use crate::config::RetryConfig;

/// Exponential backoff with an upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    /// Cap on the doubling exponent so the multiplication cannot
    /// overflow; beyond this the result is clamped to `max` anyway.
    const MAX_EXPONENT: u32 = 20;

    /// Create a backoff policy with the given initial and maximum waits
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }

    /// Build a policy from a retry configuration section
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.initial_backoff(), config.max_backoff())
    }

    /// Wait duration for the given attempt index (0-based)
    pub fn duration(&self, attempt: u32) -> Duration {
        let exp = attempt.min(Self::MAX_EXPONENT);
        let scaled = self.initial.saturating_mul(1u32 << exp);
        scaled.min(self.max)
    }
}

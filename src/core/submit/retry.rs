//! Retry policy for API submissions
//!
//! Delays are expressed in abstract "units" scaled by a configurable unit
//! length (one second in production), so tests can run the full retry
//! schedule without sleeping.

use crate::config::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Bounded retry schedule with exponential backoff and jitter
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, first one included
    pub max_attempts: u32,
    /// Upper bound of a single backoff delay, in units
    pub backoff_cap_units: f64,
    /// Pause after every successful call, in units
    pub pause_after_success_units: f64,
    /// Length of one unit
    pub time_unit: Duration,
}

impl RetryPolicy {
    /// Builds the policy from the `[api.retry]` section
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff_cap_units: config.max_backoff_units,
            pause_after_success_units: config.pause_after_success_units,
            time_unit: Duration::from_millis(config.time_unit_ms),
        }
    }

    /// Backoff after the failed attempt `attempt` (1-based), in units
    ///
    /// `min(cap, 2^attempt + jitter)` where `jitter` is expected in `[0, 1)`.
    pub fn backoff_units(&self, attempt: u32, jitter: f64) -> f64 {
        let exponent = attempt.min(30) as i32;
        (2f64.powi(exponent) + jitter).min(self.backoff_cap_units)
    }

    /// Backoff delay after the failed attempt `attempt`, with fresh jitter
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let jitter: f64 = rand::thread_rng().gen();
        self.to_duration(self.backoff_units(attempt, jitter))
    }

    /// Pause applied after each successful call
    pub fn pause_after_success(&self) -> Duration {
        self.to_duration(self.pause_after_success_units)
    }

    fn to_duration(&self, units: f64) -> Duration {
        self.time_unit.mul_f64(units.max(0.0))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

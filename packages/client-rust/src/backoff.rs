//! Retry backoff policy.
//!
//! Maps an attempt number to the delay slept before the next attempt:
//! exponential doubling from `initial_delay`, saturating at `max_delay`.
//! Delays are deterministic and never decrease as attempts grow; the policy
//! throttles retries, it is not a correctness mechanism.

use std::time::Duration;

/// Doublings beyond this leave any sane `max_delay` cap far behind, so the
/// exponent saturates here to keep the shift in range.
const MAX_DOUBLINGS: u32 = 20;

/// Configuration for the exponential backoff policy.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay after the first attempt.
    pub initial_delay: Duration,
    /// Ceiling no delay exceeds.
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
        }
    }
}

/// Exponential backoff delay provider.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
}

impl Backoff {
    /// Creates a backoff policy with the given configuration.
    #[must_use]
    pub fn new(config: BackoffConfig) -> Self {
        Self { config }
    }

    /// Returns the delay to sleep after the given attempt (1-based).
    ///
    /// Monotonically non-decreasing in `attempt` and capped at the
    /// configured maximum.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(MAX_DOUBLINGS);
        self.config
            .initial_delay
            .saturating_mul(1 << doublings)
            .min(self.config.max_delay)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}

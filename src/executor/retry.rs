//! Retry policy for batch operations only (C9). Non-batch verbs rely on
//! the SDK's own standard retryer; this one governs how `UnprocessedKeys`
//! / `UnprocessedItems` are resubmitted.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5, base_delay: Duration::from_millis(50), jitter: true }
    }
}

impl RetryPolicy {
    /// Delay before retry attempt `attempt` (1-indexed), doubling each time
    /// and optionally jittered by up to the computed delay itself (full
    /// jitter, same strategy AWS's own SDKs use for backoff).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1 << attempt.min(16));
        if self.jitter {
            let fraction = deterministic_fraction(attempt);
            Duration::from_nanos((exp.as_nanos() as f64 * fraction) as u64)
        } else {
            exp
        }
    }
}

/// A cheap, allocation-free pseudo-jitter seeded only by the attempt
/// number. Not cryptographic; just enough to avoid every retrying caller
/// waking up on the exact same tick.
fn deterministic_fraction(attempt: u32) -> f64 {
    let seed = attempt.wrapping_mul(2654435761) % 1000;
    0.5 + (seed as f64 / 1000.0) * 0.5
}

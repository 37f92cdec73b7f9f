//! Retry budget and exponential backoff for transient failures.
//!
//! A request is attempted `max_retries + 1` times at most. Between attempts
//! the transport sleeps for the delay produced by a fresh
//! [`ExponentialBackoff`], which grows as `2^attempt` time units plus up to
//! one unit of random jitter.

use http::StatusCode;
use rand::Rng;
use std::time::Duration;

/// Default number of retries after the original attempt.
pub const DEFAULT_MAX_RETRIES: usize = 5;

/// Returns `true` for the server statuses that are worth retrying (500-504).
pub fn is_transient_status(status: StatusCode) -> bool {
    (500..=504).contains(&status.as_u16())
}

/// Tuning for [`ExponentialBackoff`].
///
/// # Examples
///
/// ```
/// use autumn::retry::BackoffConfig;
/// use std::time::Duration;
///
/// // Millisecond units are handy in tests.
/// let fast = BackoffConfig {
///     unit: Duration::from_millis(1),
///     max_delay: Duration::from_millis(50),
/// };
/// assert!(fast.unit < BackoffConfig::default().unit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Length of one time unit. The delay before retry `n` is
    /// `unit * (2^n + jitter)`.
    pub unit: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            unit: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

/// Stateful generator of wait durations, scoped to one logical request.
///
/// # Examples
///
/// ```
/// use autumn::retry::{BackoffConfig, ExponentialBackoff};
/// use std::time::Duration;
///
/// let mut backoff = ExponentialBackoff::new(BackoffConfig::default());
/// let first = backoff.next_delay();
/// assert!(first >= Duration::from_secs(1) && first < Duration::from_secs(2));
/// let second = backoff.next_delay();
/// assert!(second >= Duration::from_secs(2) && second < Duration::from_secs(3));
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    attempt: u32,
    config: BackoffConfig,
}

impl ExponentialBackoff {
    /// Creates a backoff starting at attempt 0.
    pub fn new(config: BackoffConfig) -> Self {
        Self { attempt: 0, config }
    }

    /// Returns the current attempt index.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns `unit * 2^attempt`, the jitter-free lower bound of [`delay`](Self::delay).
    pub fn base_delay(&self) -> Duration {
        let multiplier = 2u32.saturating_pow(self.attempt);
        self.config.unit.saturating_mul(multiplier)
    }

    /// Returns the delay for the current attempt without advancing.
    pub fn delay(&self) -> Duration {
        let jitter = rand::thread_rng().gen_range(0.0..1.0);
        self.base_delay()
            .saturating_add(self.config.unit.mul_f64(jitter))
            .min(self.config.max_delay)
    }

    /// Advances to the next attempt.
    pub fn tick(&mut self) {
        self.attempt = self.attempt.saturating_add(1);
    }

    /// Returns the delay for the current attempt, then advances.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.delay();
        self.tick();
        delay
    }
}

/// How many times a request is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the original attempt.
    pub max_retries: usize,
    /// Backoff tuning used between attempts.
    pub backoff: BackoffConfig,
}

impl RetryPolicy {
    /// Total number of attempts, counting the original request.
    pub fn attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }

    /// Returns a fresh backoff for one logical request.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(self.backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: BackoffConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uncapped(unit: Duration) -> BackoffConfig {
        BackoffConfig {
            unit,
            max_delay: Duration::MAX,
        }
    }

    #[test]
    fn test_delays_stay_within_jitter_window() {
        let unit = Duration::from_millis(100);
        let mut backoff = ExponentialBackoff::new(uncapped(unit));

        for attempt in 0..8u32 {
            let floor = unit * 2u32.pow(attempt);
            let delay = backoff.next_delay();
            assert!(delay >= floor, "attempt {attempt}: {delay:?} < {floor:?}");
            assert!(delay < floor + unit, "attempt {attempt}: {delay:?} too large");
        }
        assert_eq!(backoff.attempt(), 8);
    }

    #[test]
    fn test_delays_are_non_decreasing() {
        let mut backoff = ExponentialBackoff::new(uncapped(Duration::from_millis(10)));
        let mut previous = Duration::ZERO;
        for _ in 0..10 {
            let delay = backoff.next_delay();
            assert!(delay >= previous);
            previous = delay;
        }
    }

    #[test]
    fn test_delay_does_not_advance() {
        let backoff = ExponentialBackoff::new(BackoffConfig::default());
        let _ = backoff.delay();
        let _ = backoff.delay();
        assert_eq!(backoff.attempt(), 0);
        assert_eq!(backoff.base_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_delay_is_capped() {
        let mut backoff = ExponentialBackoff::new(BackoffConfig {
            unit: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
        });
        for _ in 0..40 {
            assert!(backoff.next_delay() <= Duration::from_secs(5));
        }
    }

    #[test]
    fn test_policy_counts_original_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.attempts(), 6);

        let none = RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(none.attempts(), 1);
    }

    #[test]
    fn test_transient_statuses() {
        for code in 500..=504u16 {
            assert!(is_transient_status(StatusCode::from_u16(code).unwrap()));
        }
        assert!(!is_transient_status(StatusCode::from_u16(505).unwrap()));
        assert!(!is_transient_status(StatusCode::from_u16(499).unwrap()));
        assert!(!is_transient_status(StatusCode::OK));
    }
}

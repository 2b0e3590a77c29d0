//! Fixed-delay retry policy for connection attempts

use std::time::Duration;

use crate::config::ProbeConfig;

/// Bounded number of attempts with a constant pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// A `max_attempts` of zero still makes one attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Attempt numbers, starting at 1.
    pub fn attempts(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.max_attempts
    }

    /// Whether another attempt follows `attempt`.
    pub fn has_remaining(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_attempts_are_one_based_and_inclusive() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        assert_eq!(policy.attempts().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.has_remaining(1));
    }

    #[test]
    fn test_has_remaining() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        assert!(policy.has_remaining(1));
        assert!(policy.has_remaining(2));
        assert!(!policy.has_remaining(3));
    }
}

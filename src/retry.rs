//! Retry schedule for transient request failures.

use std::time::Duration;

/// How long to wait before retrying a failed page, and when to give up.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    pub max_retries: Option<u32>, // None = retry forever
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::capped(8, Duration::from_secs(10), Duration::from_secs(300))
    }
}

impl RetryPolicy {
    /// Exponential backoff (doubling from `base` up to `max`), at most `retries` retries per page.
    pub fn capped(retries: u32, base: Duration, max: Duration) -> Self {
        Self { base_delay: base, multiplier: 2.0, max_delay: max.max(base), max_retries: Some(retries) }
    }

    /// The same fixed pause forever. A page that never recovers stalls the run.
    pub fn fixed_forever(delay: Duration) -> Self {
        Self { base_delay: delay, multiplier: 1.0, max_delay: delay, max_retries: None }
    }

    /// Delay before retry number `retry` (1-based), or `None` once the budget is spent.
    pub fn delay_for(&self, retry: u32) -> Option<Duration> {
        if retry == 0 {
            return Some(Duration::ZERO);
        }
        if let Some(max) = self.max_retries {
            if retry > max {
                return None;
            }
        }
        let exp = (retry - 1).min(63) as i32;
        let secs = self.base_delay.as_secs_f64() * self.multiplier.max(1.0).powi(exp);
        let capped = secs.min(self.max_delay.as_secs_f64());
        Some(Duration::from_secs_f64(capped))
    }

    pub fn is_bounded(&self) -> bool {
        self.max_retries.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capped_doubles_then_stops() {
        let p = RetryPolicy::capped(4, Duration::from_secs(10), Duration::from_secs(45));
        assert_eq!(p.delay_for(1), Some(Duration::from_secs(10)));
        assert_eq!(p.delay_for(2), Some(Duration::from_secs(20)));
        assert_eq!(p.delay_for(3), Some(Duration::from_secs(40)));
        assert_eq!(p.delay_for(4), Some(Duration::from_secs(45)));
        assert_eq!(p.delay_for(5), None);
    }

    #[test]
    fn fixed_forever_never_gives_up() {
        let p = RetryPolicy::fixed_forever(Duration::from_secs(10));
        assert!(!p.is_bounded());
        assert_eq!(p.delay_for(1), Some(Duration::from_secs(10)));
        assert_eq!(p.delay_for(10_000), Some(Duration::from_secs(10)));
    }
}

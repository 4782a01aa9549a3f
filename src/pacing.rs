//! Request pacing: randomized per-page delays and a shared `governor` rate limiter.
//! Every wait goes through a [`Sleeper`] so tests can run without real sleeping.

use anyhow::{anyhow, bail, Result};
use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorLimiter};
use rand::Rng;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Something that can block the current thread for a while.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, d: Duration);
}

/// Real wall-clock sleeping.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

/// Shared GCRA limiter admitting `rate` requests per second with a burst allowance.
pub struct RateLimiter {
    inner: GovernorLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>,
    clock: DefaultClock,
}

impl RateLimiter {
    /// `rate_per_sec` may be fractional (0.5 = one request every two seconds) but must be
    /// finite and positive.
    pub fn new(rate_per_sec: f64, burst: usize) -> Result<Self> {
        if !rate_per_sec.is_finite() || rate_per_sec <= 0.0 {
            bail!("requests per second must be a positive number, got {rate_per_sec}");
        }
        let period = Duration::from_secs_f64(1.0 / rate_per_sec);
        let burst = NonZeroU32::new(u32::try_from(burst).unwrap_or(u32::MAX).max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .ok_or_else(|| anyhow!("requests per second too high: {rate_per_sec}"))?
            .allow_burst(burst);
        Ok(Self { inner: GovernorLimiter::direct(quota), clock: DefaultClock::default() })
    }

    /// Try to take one cell; `None` when admitted, otherwise how long until the next one frees up.
    pub fn check(&self) -> Option<Duration> {
        match self.inner.check() {
            Ok(()) => None,
            Err(not_until) => Some(not_until.wait_time_from(self.clock.now())),
        }
    }
}

/// Everything a paging loop needs to space out its requests.
#[derive(Clone)]
pub struct Pacing {
    sleeper: Arc<dyn Sleeper>,
    page_delay: (Duration, Duration),
    limiter: Option<Arc<RateLimiter>>,
}

impl Pacing {
    pub fn new(sleeper: Arc<dyn Sleeper>, min: Duration, max: Duration) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        Self { sleeper, page_delay: (lo, hi), limiter: None }
    }

    /// No delays at all, for callers that pace themselves.
    pub fn none(sleeper: Arc<dyn Sleeper>) -> Self {
        Self::new(sleeper, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Block until the shared limiter admits one more request.
    pub fn before_request(&self) {
        if let Some(l) = &self.limiter {
            while let Some(wait) = l.check() {
                tracing::trace!(?wait, "rate limiter wait");
                self.sleeper.sleep(wait);
            }
        }
    }

    /// Jittered pause after a successful page.
    pub fn after_page(&self) {
        let d = self.sample_page_delay();
        if !d.is_zero() {
            self.sleeper.sleep(d);
        }
    }

    pub fn sleep(&self, d: Duration) {
        self.sleeper.sleep(d);
    }

    pub fn sample_page_delay(&self) -> Duration {
        let (lo, hi) = self.page_delay;
        if lo == hi {
            return lo;
        }
        let secs = rand::thread_rng().gen_range(lo.as_secs_f64()..=hi.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

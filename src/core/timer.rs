//! Timers driven by externally supplied timestamps. Neither owns a clock
//! or a scheduler; callers pass `now` on every call.

use std::time::Duration;

/// Rate limiter - last-fired timestamp plus a minimum interval
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    min_interval: Duration,
    last_fired: Option<Duration>,
}

impl RateLimiter {
    /// Create limiter that fires at most once per `min_interval`
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_fired: None,
        }
    }

    /// Create limiter that fires at most `hz` times per second
    pub fn from_hz(hz: f32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / hz.max(f32::EPSILON) as f64))
    }

    /// Attempt to fire at `now`, returns true if the interval has elapsed.
    /// The first call always fires.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        match self.last_fired {
            Some(last) if now.saturating_sub(last) < self.min_interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }

    /// Timestamp of the last successful fire
    pub fn last_fired(&self) -> Option<Duration> {
        self.last_fired
    }

    /// Configured minimum interval
    pub fn interval(&self) -> Duration {
        self.min_interval
    }

    /// Forget the last fire so the next attempt succeeds
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

/// Deferred one-shot timer - at most one pending deadline at a time
#[derive(Debug, Clone, Copy)]
pub struct OneShotTimer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl OneShotTimer {
    /// Create an idle timer with the given delay
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Schedule the timer at `now + delay` unless one is already pending.
    /// Returns true if a new deadline was scheduled.
    pub fn arm(&mut self, now: Duration) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.delay);
        true
    }

    /// Returns true exactly once when the pending deadline has passed
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending deadline without firing
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Whether a deadline is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn rate_limiter_fires_first_then_waits() {
        let mut limiter = RateLimiter::new(ms(33));

        assert!(limiter.try_fire(ms(0)));
        assert!(!limiter.try_fire(ms(10)));
        assert!(!limiter.try_fire(ms(20)));
        assert!(!limiter.try_fire(ms(30)));
        assert!(limiter.try_fire(ms(40)));
        assert_eq!(limiter.last_fired(), Some(ms(40)));
    }

    #[test]
    fn rate_limiter_fires_on_exact_interval() {
        let mut limiter = RateLimiter::new(ms(33));

        assert!(limiter.try_fire(ms(100)));
        assert!(limiter.try_fire(ms(133)));
    }

    #[test]
    fn rate_limiter_from_hz() {
        let limiter = RateLimiter::from_hz(30.0);
        let interval = limiter.interval().as_secs_f64();
        assert!((interval - 1.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn rate_limiter_ignores_clock_going_backwards() {
        let mut limiter = RateLimiter::new(ms(33));

        assert!(limiter.try_fire(ms(50)));
        assert!(!limiter.try_fire(ms(10))); // saturates to zero elapsed
    }

    #[test]
    fn rate_limiter_reset() {
        let mut limiter = RateLimiter::new(ms(33));

        assert!(limiter.try_fire(ms(0)));
        limiter.reset();
        assert!(limiter.try_fire(ms(1)));
    }

    #[test]
    fn one_shot_arms_once() {
        let mut timer = OneShotTimer::new(ms(16));

        assert!(timer.arm(ms(0)));
        assert!(!timer.arm(ms(5))); // Already pending
        assert!(timer.is_pending());
    }

    #[test]
    fn one_shot_fires_once_after_delay() {
        let mut timer = OneShotTimer::new(ms(16));
        timer.arm(ms(0));

        assert!(!timer.poll(ms(15)));
        assert!(timer.poll(ms(16)));
        assert!(!timer.poll(ms(40))); // Idle again
        assert!(!timer.is_pending());
    }

    #[test]
    fn one_shot_cancel() {
        let mut timer = OneShotTimer::new(ms(16));

        assert!(!timer.cancel()); // Nothing pending
        timer.arm(ms(0));
        assert!(timer.cancel());
        assert!(!timer.poll(ms(100)));
    }
}

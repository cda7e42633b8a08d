//! Minimum-interval rate limiting.
//!
//! CoinSpot allows one authenticated request per second per key. This
//! limiter tracks the start of the previous request and reports how long
//! the next one has to wait.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use coinspot_updater::rate_limit::MinIntervalLimiter;
//!
//! let mut limiter = MinIntervalLimiter::new(
//!     Duration::from_millis(1000), // Minimum spacing between calls
//!     Duration::from_millis(10),   // Safety margin added to every wait
//! );
//!
//! // The first call never waits
//! assert!(limiter.try_acquire().is_ok());
//! // An immediate second call has to wait out the interval
//! assert!(limiter.try_acquire().is_err());
//! ```

use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum spacing between the starts of consecutive calls.
#[derive(Debug)]
pub struct MinIntervalLimiter {
    /// When the previous slot was taken
    last_call: Option<Instant>,
    /// Minimum spacing between slots
    interval: Duration,
    /// Extra time added to every computed wait
    margin: Duration,
}

impl MinIntervalLimiter {
    /// Create a new limiter.
    ///
    /// # Arguments
    ///
    /// * `interval` - Minimum time between the start of consecutive calls
    /// * `margin` - Padding added to each wait to absorb clock jitter
    pub fn new(interval: Duration, margin: Duration) -> Self {
        Self {
            last_call: None,
            interval,
            margin,
        }
    }

    /// Try to take the slot now.
    ///
    /// Returns `Ok(())` and marks the slot taken if the interval has passed,
    /// or `Err(wait_time)` with the remainder plus the margin.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        match self.time_until_available() {
            None => {
                self.last_call = Some(Instant::now());
                Ok(())
            }
            Some(wait) => Err(wait + self.margin),
        }
    }

    /// Time left until the interval has passed, without the margin.
    ///
    /// Returns `None` if a call may start now.
    pub fn time_until_available(&self) -> Option<Duration> {
        let elapsed = self.last_call?.elapsed();
        (elapsed < self.interval).then(|| self.interval - elapsed)
    }

    /// Time since the previous slot was taken, if any.
    pub fn since_last_call(&self) -> Option<Duration> {
        self.last_call.map(|at| at.elapsed())
    }

    /// Forget the previous call.
    pub fn reset(&mut self) {
        self.last_call = None;
    }

    /// The configured minimum interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_free() {
        let mut limiter = MinIntervalLimiter::new(Duration::from_secs(1), Duration::from_millis(10));

        assert!(limiter.time_until_available().is_none());
        assert!(limiter.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_includes_margin() {
        let mut limiter = MinIntervalLimiter::new(Duration::from_secs(1), Duration::from_millis(10));

        limiter.try_acquire().unwrap();
        tokio::time::advance(Duration::from_millis(200)).await;

        assert_eq!(limiter.try_acquire(), Err(Duration::from_millis(810)));
        // A refused attempt does not move the slot.
        assert_eq!(limiter.since_last_call(), Some(Duration::from_millis(200)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_available_after_interval() {
        let mut limiter = MinIntervalLimiter::new(Duration::from_secs(1), Duration::from_millis(10));

        limiter.try_acquire().unwrap();
        tokio::time::advance(Duration::from_millis(1000)).await;

        assert!(limiter.try_acquire().is_ok());
        assert_eq!(limiter.since_last_call(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset() {
        let mut limiter = MinIntervalLimiter::new(Duration::from_secs(1), Duration::ZERO);

        limiter.try_acquire().unwrap();
        assert!(limiter.try_acquire().is_err());

        limiter.reset();
        assert!(limiter.try_acquire().is_ok());
    }
}

//! Async rate limiter shared by the authenticated call path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::rate_limit::{MinIntervalLimiter, RateLimitConfig};

/// Serializes authenticated calls so their starts are spaced by at least
/// the configured interval.
///
/// Cloning shares the underlying state, so every clone of a client paces
/// against the same clock.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Arc<Mutex<MinIntervalLimiter>>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        let state = MinIntervalLimiter::new(config.min_interval, config.margin);
        Self {
            config,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Wait until a call may start, then mark the slot taken.
    ///
    /// Returns the total time spent sleeping.
    pub async fn await_slot(&self) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }

        let mut waited = Duration::ZERO;
        loop {
            let mut limiter = self.state.lock().await;
            match limiter.try_acquire() {
                Ok(()) => {
                    if !waited.is_zero() {
                        tracing::debug!(waited_ms = waited.as_millis() as u64, "rate limit slot acquired");
                    }
                    return waited;
                }
                Err(wait_time) => {
                    drop(limiter);
                    tokio::time::sleep(wait_time).await;
                    waited += wait_time;
                }
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

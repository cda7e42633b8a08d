//! Rate limiting for CoinSpot's private API.
//!
//! CoinSpot limits authenticated requests to one per second per API key.
//! Every private call waits on a [`RateLimiter`] before it is dispatched;
//! public calls are not paced.
//!
//! The spacing is measured from the start of one call to the start of the
//! next, so a slow response does not delay the following request further.
//!
//! ## Example
//!
//! ```rust
//! use coinspot_updater::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let limiter = RateLimiter::new(RateLimitConfig::default());
//!
//! // Returns immediately the first time, sleeps ~1s on a second call.
//! limiter.await_slot().await;
//! # }
//! ```

mod interval;
mod limiter;

pub use interval::MinIntervalLimiter;
pub use limiter::RateLimiter;

use std::time::Duration;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Minimum time between the starts of authenticated calls.
    pub min_interval: Duration,
    /// Padding added to every wait.
    pub margin: Duration,
    /// Whether to enable rate limiting.
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval: limits::MIN_INTERVAL,
            margin: limits::SAFETY_MARGIN,
            enabled: true,
        }
    }
}

/// Rate limit constants.
pub mod limits {
    use std::time::Duration;

    /// One authenticated request per second.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1000);
    /// Added to every wait.
    pub const SAFETY_MARGIN: Duration = Duration::from_millis(10);
}

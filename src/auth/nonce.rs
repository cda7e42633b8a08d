//! Nonce generation for CoinSpot API authentication.
//!
//! CoinSpot accepts each nonce once per key, so it must grow between
//! requests. The conventional value is the current Unix time in whole
//! seconds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for providing nonces for authenticated requests.
pub trait NonceProvider: Send + Sync {
    /// Generate the next nonce value.
    ///
    /// This value must be greater than any previously returned value.
    fn next_nonce(&self) -> u64;
}

/// A nonce provider returning Unix seconds, bumped so it strictly increases.
///
/// Two nonces asked for within the same second, or a wall clock stepping
/// backwards, yield the last issued value plus one.
#[derive(Debug, Default)]
pub struct UnixSecondsNonce {
    last_nonce: AtomicU64,
}

impl UnixSecondsNonce {
    /// Create a new nonce provider.
    pub fn new() -> Self {
        Self {
            last_nonce: AtomicU64::new(0),
        }
    }

    fn current_time_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

impl NonceProvider for UnixSecondsNonce {
    fn next_nonce(&self) -> u64 {
        let now = Self::current_time_secs();
        let next = |last: u64| now.max(last.saturating_add(1));
        // The closure always returns Some, so both arms carry the previous value.
        let previous = match self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(next(last)))
        {
            Ok(last) | Err(last) => last,
        };
        next(previous)
    }
}

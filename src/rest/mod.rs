//! CoinSpot REST API client.
//!
//! [`CoinSpotClient`] exposes the two raw call shapes, an unauthenticated
//! GET ([`CoinSpotClient::public_call`]) and a signed, rate-limited POST
//! ([`CoinSpotClient::private_call`]), plus typed wrappers for the
//! endpoints the updater reads.
//!
//! # Trait-based API
//!
//! The [`CoinSpotApi`] trait abstracts those operations so the updater can
//! be driven by any implementation.
//!
//! ```rust,ignore
//! use coinspot_updater::rest::{CoinSpotApi, CoinSpotClient};
//!
//! async fn portfolio<C: CoinSpotApi>(client: &C) -> coinspot_updater::Result<()> {
//!     let balances = client.get_my_balances().await?;
//!     println!("Total: {}", balances.total());
//!     Ok(())
//! }
//! ```

mod client;
pub mod endpoints;
pub mod private;
pub mod public;
mod traits;

pub use client::{CoinSpotClient, CoinSpotClientBuilder, DEFAULT_TIMEOUT};
pub use traits::CoinSpotApi;

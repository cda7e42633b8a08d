//! # CoinSpot Updater
//!
//! A small async client for the CoinSpot REST API and the glue that writes
//! portfolio figures into a Google Sheet.
//!
//! ## Features
//!
//! - Signed private calls (HMAC-SHA512 over the nonce-augmented body)
//! - One-call-per-second pacing of authenticated requests
//! - Typed balance, price, transaction and deposit endpoints
//! - Financial precision with `rust_decimal`
//! - A spreadsheet service trait with a Google Sheets v4 implementation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinspot_updater::auth::EnvCredentials;
//! use coinspot_updater::rest::CoinSpotClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinSpotClient::builder()
//!         .base_url("https://www.coinspot.com.au")
//!         .credentials(Arc::new(EnvCredentials::from_env()?))
//!         .build()?;
//!
//!     let balances = client.get_my_balances().await?;
//!     println!("{balances}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod repl;
pub mod rest;
pub mod sheets;
pub mod updater;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{ApiError, CoinSpotError};
pub use rest::{CoinSpotApi, CoinSpotClient};
pub use updater::Updater;

/// Result type alias using CoinSpotError
pub type Result<T> = std::result::Result<T, CoinSpotError>;

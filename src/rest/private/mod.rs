//! Private REST API endpoints (authentication required).
//!
//! These endpoints require API credentials to be configured on the client.
//! All of them are read-only.

mod types;

pub use types::*;

use crate::error::CoinSpotError;
use crate::rest::CoinSpotClient;
use crate::rest::endpoints::private;

impl CoinSpotClient {
    /// Get the balance of every coin held.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinspot_updater::auth::StaticCredentials;
    /// use coinspot_updater::rest::CoinSpotClient;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let credentials = Arc::new(StaticCredentials::new("key", "secret"));
    ///     let client = CoinSpotClient::builder()
    ///         .base_url("https://www.coinspot.com.au")
    ///         .credentials(credentials)
    ///         .build()?;
    ///
    ///     let balances = client.get_my_balances().await?;
    ///     println!("{balances}");
    ///     println!("TOTAL: {} AUD", balances.total());
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_my_balances(&self) -> Result<Balances, CoinSpotError> {
        self.private_post(private::BALANCES, "{}").await
    }

    /// Get the raw balance response for a single coin.
    pub async fn get_coin_balance_json(&self, coin: &str) -> Result<String, CoinSpotError> {
        let path = format!("{}{}", private::COIN_BALANCE_PREFIX, coin.to_ascii_uppercase());
        self.private_call(&path, "{}").await
    }

    /// Get open buy and sell orders.
    pub async fn get_open_transactions(&self) -> Result<OpenTransactions, CoinSpotError> {
        self.private_post(private::OPEN_TRANSACTIONS, "{}").await
    }

    /// Get AUD deposit history.
    pub async fn get_deposits(&self) -> Result<Deposits, CoinSpotError> {
        self.private_post(private::DEPOSITS, "{}").await
    }
}

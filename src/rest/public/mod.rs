//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use crate::error::CoinSpotError;
use crate::rest::CoinSpotClient;
use crate::rest::endpoints::public;

impl CoinSpotClient {
    /// Get the latest prices of every coin.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinspot_updater::rest::CoinSpotClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinSpotClient::builder()
    ///         .base_url("https://www.coinspot.com.au")
    ///         .build()?;
    ///     let prices = client.get_latest_prices().await?;
    ///     if let Some(btc) = prices.price("BTC") {
    ///         println!("BTC last: {:?}", btc.last);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_latest_prices(&self) -> Result<LatestPrices, CoinSpotError> {
        self.public_get(public::LATEST).await
    }
}

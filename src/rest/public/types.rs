//! Types for public REST API endpoints.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response of `/pubapi/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestPrices {
    /// `"ok"` on success
    pub status: String,
    /// Prices keyed by lower-case coin symbol
    #[serde(default)]
    pub prices: HashMap<String, CoinPrice>,
}

impl LatestPrices {
    /// Look up a coin's prices, ignoring the case of the symbol.
    pub fn price(&self, coin: &str) -> Option<&CoinPrice> {
        self.prices.get(&coin.to_ascii_lowercase()).or_else(|| {
            self.prices
                .iter()
                .find(|(symbol, _)| symbol.eq_ignore_ascii_case(coin))
                .map(|(_, price)| price)
        })
    }
}

/// Latest prices of a single coin, in AUD.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinPrice {
    /// Best bid
    #[serde(default)]
    pub bid: Option<Decimal>,
    /// Best ask
    #[serde(default)]
    pub ask: Option<Decimal>,
    /// Last traded price
    #[serde(default)]
    pub last: Option<Decimal>,
}

//! Trait definition for the CoinSpot REST API client.
//!
//! [`CoinSpotApi`] abstracts the calls the updater makes, so the updater can
//! run against a mock or a wrapped client.

use std::future::Future;

use rust_decimal::Decimal;

use crate::error::CoinSpotError;
use crate::rest::CoinSpotClient;
use crate::rest::private::{Balances, Deposits, OpenTransactions};
use crate::rest::public::LatestPrices;

/// Trait defining the CoinSpot REST API operations.
///
/// All methods are async and return `Result<T, CoinSpotError>`.
pub trait CoinSpotApi: Send + Sync {
    // ========== Raw calls ==========

    /// Unauthenticated GET returning the body text.
    fn public_call(&self, path: &str) -> impl Future<Output = Result<String, CoinSpotError>> + Send;

    /// Signed, rate-limited POST returning the body text.
    fn private_call(
        &self,
        path: &str,
        body: &str,
    ) -> impl Future<Output = Result<String, CoinSpotError>> + Send;

    // ========== Public Endpoints ==========

    /// Get the latest prices of every coin.
    fn get_latest_prices(&self) -> impl Future<Output = Result<LatestPrices, CoinSpotError>> + Send;

    // ========== Private Endpoints ==========

    /// Get the balance of every coin held.
    fn get_my_balances(&self) -> impl Future<Output = Result<Balances, CoinSpotError>> + Send;

    /// Get the raw balance response for a single coin.
    fn get_coin_balance_json(
        &self,
        coin: &str,
    ) -> impl Future<Output = Result<String, CoinSpotError>> + Send;

    /// Get open buy and sell orders.
    fn get_open_transactions(
        &self,
    ) -> impl Future<Output = Result<OpenTransactions, CoinSpotError>> + Send;

    /// Get AUD deposit history.
    fn get_deposits(&self) -> impl Future<Output = Result<Deposits, CoinSpotError>> + Send;

    /// Total AUD value of every non-AUD holding.
    fn get_portfolio_value(&self) -> impl Future<Output = Result<Decimal, CoinSpotError>> + Send {
        async { Ok(self.get_my_balances().await?.total()) }
    }
}

impl CoinSpotApi for CoinSpotClient {
    async fn public_call(&self, path: &str) -> Result<String, CoinSpotError> {
        CoinSpotClient::public_call(self, path).await
    }

    async fn private_call(&self, path: &str, body: &str) -> Result<String, CoinSpotError> {
        CoinSpotClient::private_call(self, path, body).await
    }

    async fn get_latest_prices(&self) -> Result<LatestPrices, CoinSpotError> {
        CoinSpotClient::get_latest_prices(self).await
    }

    async fn get_my_balances(&self) -> Result<Balances, CoinSpotError> {
        CoinSpotClient::get_my_balances(self).await
    }

    async fn get_coin_balance_json(&self, coin: &str) -> Result<String, CoinSpotError> {
        CoinSpotClient::get_coin_balance_json(self, coin).await
    }

    async fn get_open_transactions(&self) -> Result<OpenTransactions, CoinSpotError> {
        CoinSpotClient::get_open_transactions(self).await
    }

    async fn get_deposits(&self) -> Result<Deposits, CoinSpotError> {
        CoinSpotClient::get_deposits(self).await
    }
}

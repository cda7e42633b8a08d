//! Portfolio actions: read CoinSpot, write the spreadsheet.
//!
//! [`Updater`] ties a [`CoinSpotApi`] to a [`SpreadsheetService`]. Every
//! action returns its result or error to the caller; nothing here prints.

use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::error::CoinSpotError;
use crate::rest::CoinSpotApi;
use crate::rest::endpoints::private;
use crate::rest::private::Balances;
use crate::rest::public::CoinPrice;
use crate::sheets::{SpreadsheetService, cell, cell_decimal};

/// Cell ranges of the summary sheet.
pub mod ranges {
    /// Total AUD value of the portfolio.
    pub const TOTAL_VALUE: &str = "Summary!G6";
    /// Date of the last update.
    pub const UPDATE_DATE: &str = "Summary!G4";
    /// Time of the last update.
    pub const UPDATE_TIME: &str = "Summary!H4";
    /// Spent, value, gain and gain percent, one per row.
    pub const STATUS: &str = "Summary!G5:G8";
    /// Gain as a percentage of spent.
    pub const GAIN_PERCENT: &str = "Summary!G8";
    /// Table that history rows are appended to.
    pub const HISTORY: &str = "History!A:C";
}

/// Figures read back from the summary sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortfolioStatus {
    /// AUD spent buying coins
    pub spent: Option<Decimal>,
    /// Current AUD value
    pub value: Option<Decimal>,
    /// AUD gain
    pub gain: Option<Decimal>,
    /// Gain as a percentage of spent
    pub gain_percent: Option<Decimal>,
}

impl fmt::Display for PortfolioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Spent = {}", aud(self.spent))?;
        writeln!(f, "Value = {}", aud(self.value))?;
        writeln!(f, "Gain$ = {}", aud(self.gain))?;
        write!(f, "Gain% = {}", percent(self.gain_percent))
    }
}

/// What [`Updater::update_spreadsheet`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Portfolio total written to the total cell
    pub total: Decimal,
    /// Date stamp, e.g. `05 Mar`
    pub date: String,
    /// Time stamp, e.g. `3:07 PM`
    pub time: String,
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Updated spreadsheet: {} at {} {}",
            aud(Some(self.total)),
            self.date,
            self.time
        )
    }
}

/// Runs portfolio actions against an exchange client and a spreadsheet.
#[derive(Debug, Clone)]
pub struct Updater<C, S> {
    exchange: C,
    sheet: S,
}

impl<C, S> Updater<C, S>
where
    C: CoinSpotApi,
    S: SpreadsheetService,
{
    /// Create a new updater.
    pub fn new(exchange: C, sheet: S) -> Self {
        Self { exchange, sheet }
    }

    /// The exchange client.
    pub fn exchange(&self) -> &C {
        &self.exchange
    }

    /// The spreadsheet service.
    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    /// Write the current portfolio total and a local date/time stamp.
    pub async fn update_spreadsheet(&self) -> Result<UpdateReport, CoinSpotError> {
        self.update_spreadsheet_at(local_now()).await
    }

    /// [`update_spreadsheet`](Self::update_spreadsheet) with an explicit
    /// timestamp.
    pub async fn update_spreadsheet_at(
        &self,
        now: OffsetDateTime,
    ) -> Result<UpdateReport, CoinSpotError> {
        let total = self.exchange.get_portfolio_value().await?;
        let (date, time) = stamp(now)?;

        self.sheet
            .set_value(ranges::TOTAL_VALUE, amount_cell(total))
            .await?;
        self.sheet
            .set_value(ranges::UPDATE_DATE, Value::String(date.clone()))
            .await?;
        self.sheet
            .set_value(ranges::UPDATE_TIME, Value::String(time.clone()))
            .await?;

        tracing::info!(%total, "spreadsheet updated");
        Ok(UpdateReport { total, date, time })
    }

    /// Append `[date, time, total]` to the history table.
    ///
    /// Returns the range the row landed in.
    pub async fn record_history(&self) -> Result<String, CoinSpotError> {
        self.record_history_at(local_now()).await
    }

    /// [`record_history`](Self::record_history) with an explicit timestamp.
    pub async fn record_history_at(&self, now: OffsetDateTime) -> Result<String, CoinSpotError> {
        let total = self.exchange.get_portfolio_value().await?;
        let (date, time) = stamp(now)?;

        let range = self
            .sheet
            .append_row(
                ranges::HISTORY,
                vec![Value::String(date), Value::String(time), amount_cell(total)],
            )
            .await?;

        tracing::info!(%range, %total, "history row appended");
        Ok(range)
    }

    /// Read spent, value, gain and gain percent from the summary sheet.
    pub async fn status(&self) -> Result<PortfolioStatus, CoinSpotError> {
        let grid = self.sheet.get_range(ranges::STATUS).await?;
        let at = |row| cell(&grid, row, 0).and_then(cell_decimal);

        Ok(PortfolioStatus {
            spent: at(0),
            value: at(1),
            gain: at(2),
            gain_percent: at(3),
        })
    }

    /// Read the gain percentage from the summary sheet.
    pub async fn gain_percent(&self) -> Result<Option<Decimal>, CoinSpotError> {
        let grid = self.sheet.get_range(ranges::GAIN_PERCENT).await?;
        Ok(cell(&grid, 0, 0).and_then(cell_decimal))
    }

    /// Fetch every coin balance.
    pub async fn balances(&self) -> Result<Balances, CoinSpotError> {
        self.exchange.get_my_balances().await
    }

    /// Fetch the latest prices of one coin.
    pub async fn price(&self, coin: &str) -> Result<CoinPrice, CoinSpotError> {
        let prices = self.exchange.get_latest_prices().await?;
        prices
            .price(coin)
            .cloned()
            .ok_or_else(|| CoinSpotError::InvalidResponse(format!("no price listed for {coin}")))
    }

    /// Make a raw private call to a read-only endpoint.
    ///
    /// `path` is relative to `/api/ro/`, e.g. `my/balances`.
    pub async fn call(&self, path: &str) -> Result<String, CoinSpotError> {
        self.exchange
            .private_call(&private::read_only(path), "{}")
            .await
    }

    /// Update the spreadsheet now and then once per `period`.
    ///
    /// A failed update is logged and the next tick tries again. Runs forever
    /// when `max_runs` is `None`; returns the number of successful updates
    /// otherwise.
    pub async fn run_periodic(&self, period: Duration, max_runs: Option<u64>) -> u64 {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut runs = 0u64;
        let mut succeeded = 0u64;
        while max_runs.is_none_or(|max| runs < max) {
            interval.tick().await;
            runs += 1;
            match self.update_spreadsheet().await {
                Ok(report) => {
                    succeeded += 1;
                    tracing::info!(run = runs, "{report}");
                }
                Err(err) => tracing::error!(run = runs, error = %err, "periodic update failed"),
            }
        }
        succeeded
    }
}

/// Format a timestamp as the sheet's date and time strings.
pub fn stamp(now: OffsetDateTime) -> Result<(String, String), CoinSpotError> {
    let date = now.format(format_description!("[day] [month repr:short]"))?;
    let time = now.format(format_description!(
        "[hour repr:12 padding:none]:[minute] [period]"
    ))?;
    Ok((date, time))
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| {
        tracing::debug!("local offset unavailable, using UTC");
        OffsetDateTime::now_utc()
    })
}

/// A monetary amount as a sheet cell, rounded to cents.
fn amount_cell(amount: Decimal) -> Value {
    Value::String(amount.round_dp(2).to_string())
}

fn aud(amount: Option<Decimal>) -> String {
    match amount {
        Some(value) if value.is_sign_negative() => format!("-${:.2}", value.abs()),
        Some(value) => format!("${value:.2}"),
        None => "n/a".to_string(),
    }
}

fn percent(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "n/a".to_string(), |value| value.round_dp(2).normalize().to_string())
}

//! Spreadsheet service the updater writes its figures into.
//!
//! [`SpreadsheetService`] is the whole contract: read a range as a grid of
//! cells, write one value into a range, append a row. [`GoogleSheetsClient`]
//! implements it over the Google Sheets v4 REST API.

mod client;
mod types;

pub use client::{DEFAULT_SHEETS_BASE_URL, GoogleSheetsClient, GoogleSheetsClientBuilder};
pub use types::*;

use std::future::Future;

use serde_json::Value;

use crate::error::CoinSpotError;

/// A grid of cell values, row-major.
pub type Grid = Vec<Vec<Value>>;

/// Trait defining the spreadsheet operations the updater needs.
///
/// Ranges use A1 notation, e.g. `Summary!G5:G8`.
pub trait SpreadsheetService: Send + Sync {
    /// Read a range. Trailing empty rows and cells are omitted.
    fn get_range(&self, range: &str) -> impl Future<Output = Result<Grid, CoinSpotError>> + Send;

    /// Write a single value into the first cell of a range.
    fn set_value(
        &self,
        range: &str,
        value: Value,
    ) -> impl Future<Output = Result<(), CoinSpotError>> + Send;

    /// Append a row after the table found in a range.
    ///
    /// Returns the range the row was written to.
    fn append_row(
        &self,
        range: &str,
        values: Vec<Value>,
    ) -> impl Future<Output = Result<String, CoinSpotError>> + Send;
}

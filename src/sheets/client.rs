//! Google Sheets v4 REST client.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::error::CoinSpotError;
use crate::rest::DEFAULT_TIMEOUT;
use crate::sheets::types::{AppendValuesResponse, ReadParams, ValueRange, WriteParams};
use crate::sheets::{Grid, SpreadsheetService};

/// Base URL of the public Sheets API.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Cells are parsed as if typed by a user, so `12.5%` stays a percentage.
const INPUT_OPTION: &str = "USER_ENTERED";
/// Reads return raw numbers rather than display strings.
const RENDER_OPTION: &str = "UNFORMATTED_VALUE";

/// A [`SpreadsheetService`] backed by one Google spreadsheet.
///
/// Requests carry an OAuth bearer access token.
#[derive(Clone)]
pub struct GoogleSheetsClient {
    http_client: ClientWithMiddleware,
    base_url: Url,
    spreadsheet_id: String,
    access_token: SecretString,
}

impl GoogleSheetsClient {
    /// Create a new client builder.
    pub fn builder() -> GoogleSheetsClientBuilder {
        GoogleSheetsClientBuilder::new()
    }

    /// The spreadsheet this client reads and writes.
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Build `{base}/v4/spreadsheets/{id}/values/{segment}?{query}`.
    fn values_url<Q>(&self, segment: &str, query: &Q) -> Result<Url, CoinSpotError>
    where
        Q: serde::Serialize,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CoinSpotError::InvalidConfiguration("sheetsBaseUrl cannot be a base".to_string())
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", segment]);

        let query_string = serde_urlencoded::to_string(query)
            .map_err(|e| CoinSpotError::Sheets(e.to_string()))?;
        url.set_query(Some(&query_string));
        Ok(url)
    }

    async fn send(&self, request: reqwest_middleware::RequestBuilder) -> Result<String, CoinSpotError> {
        let response = request
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Sheets API returned an error status");
            return Err(CoinSpotError::Sheets(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

impl SpreadsheetService for GoogleSheetsClient {
    async fn get_range(&self, range: &str) -> Result<Grid, CoinSpotError> {
        let url = self.values_url(
            range,
            &ReadParams {
                value_render_option: RENDER_OPTION,
            },
        )?;
        tracing::debug!(range, "reading spreadsheet range");

        let body = self.send(self.http_client.get(url)).await?;
        let values: ValueRange = serde_json::from_str(&body)?;
        Ok(values.values)
    }

    async fn set_value(&self, range: &str, value: Value) -> Result<(), CoinSpotError> {
        let url = self.values_url(
            range,
            &WriteParams {
                value_input_option: INPUT_OPTION,
            },
        )?;
        tracing::debug!(range, %value, "writing spreadsheet cell");

        let payload = ValueRange::rows(range, vec![vec![value]]);
        let request = self
            .http_client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(&payload)?);
        self.send(request).await?;
        Ok(())
    }

    async fn append_row(&self, range: &str, values: Vec<Value>) -> Result<String, CoinSpotError> {
        let url = self.values_url(
            &format!("{range}:append"),
            &WriteParams {
                value_input_option: INPUT_OPTION,
            },
        )?;
        tracing::debug!(range, cells = values.len(), "appending spreadsheet row");

        let payload = ValueRange::rows(range, vec![values]);
        let request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(&payload)?);
        let body = self.send(request).await?;
        let appended: AppendValuesResponse = serde_json::from_str(&body)?;
        Ok(appended.updates.updated_range)
    }
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("base_url", &self.base_url.as_str())
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Builder for [`GoogleSheetsClient`].
pub struct GoogleSheetsClientBuilder {
    base_url: String,
    spreadsheet_id: Option<String>,
    access_token: Option<SecretString>,
    timeout: Duration,
}

impl GoogleSheetsClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            spreadsheet_id: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the spreadsheet ID, the long token in the sheet's URL.
    pub fn spreadsheet_id(mut self, id: impl Into<String>) -> Self {
        self.spreadsheet_id = Some(id.into());
        self
    }

    /// Set the OAuth access token.
    pub fn access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GoogleSheetsClient, CoinSpotError> {
        let spreadsheet_id = self
            .spreadsheet_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(CoinSpotError::ConfigurationMissing("spreadsheetId"))?;
        let access_token = self
            .access_token
            .filter(|token| !token.expose_secret().trim().is_empty())
            .ok_or(CoinSpotError::ConfigurationMissing("sheetsAccessToken"))?;
        let base_url = Url::parse(self.base_url.trim())?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("coinspot-updater/", env!("CARGO_PKG_VERSION"))),
        );

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(GoogleSheetsClient {
            http_client,
            base_url,
            spreadsheet_id,
            access_token,
        })
    }
}

impl Default for GoogleSheetsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleSheetsClient {
        GoogleSheetsClient::builder()
            .base_url("https://sheets.example/")
            .spreadsheet_id("sheet-1")
            .access_token(SecretString::from("token"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_values_url() {
        let url = client()
            .values_url(
                "Summary!G5:G8",
                &ReadParams {
                    value_render_option: RENDER_OPTION,
                },
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example/v4/spreadsheets/sheet-1/values/Summary!G5:G8?valueRenderOption=UNFORMATTED_VALUE"
        );
    }

    #[test]
    fn test_values_url_encodes_sheet_names() {
        let url = client()
            .values_url(
                "My Sheet!A1",
                &WriteParams {
                    value_input_option: INPUT_OPTION,
                },
            )
            .unwrap();
        assert!(url.path().ends_with("/values/My%20Sheet!A1"));
    }

    #[test]
    fn test_build_requires_spreadsheet_id() {
        let err = GoogleSheetsClient::builder()
            .access_token(SecretString::from("token"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoinSpotError::ConfigurationMissing("spreadsheetId")));
    }

    #[test]
    fn test_build_requires_token() {
        let err = GoogleSheetsClient::builder()
            .spreadsheet_id("sheet-1")
            .build()
            .unwrap_err();
        assert!(matches!(err, CoinSpotError::ConfigurationMissing("sheetsAccessToken")));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("\"token\""));
    }
}

//! Runtime configuration.
//!
//! Values come from a JSON file (camelCase keys), from environment
//! variables, or both; file values win. Nothing is validated until a client
//! is built from the configuration, and then every missing value fails with
//! [`CoinSpotError::ConfigurationMissing`] naming the key.
//!
//! ```json
//! {
//!     "apiKey": "...",
//!     "apiSecret": "...",
//!     "baseUrl": "https://www.coinspot.com.au",
//!     "spreadsheetId": "...",
//!     "sheetsAccessToken": "..."
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::auth::{Credentials, StaticCredentials};
use crate::error::CoinSpotError;
use crate::rest::{CoinSpotClient, DEFAULT_TIMEOUT};
use crate::sheets::GoogleSheetsClient;

/// Environment variable names read by [`Config::from_env`].
pub mod env_vars {
    pub const API_KEY: &str = "COINSPOT_API_KEY";
    pub const API_SECRET: &str = "COINSPOT_API_SECRET";
    pub const BASE_URL: &str = "COINSPOT_BASE_URL";
    pub const TIMEOUT_SECS: &str = "COINSPOT_TIMEOUT_SECS";
    pub const SPREADSHEET_ID: &str = "GOOGLE_SPREADSHEET_ID";
    pub const SHEETS_ACCESS_TOKEN: &str = "GOOGLE_SHEETS_TOKEN";
    pub const SHEETS_BASE_URL: &str = "GOOGLE_SHEETS_BASE_URL";
}

/// Updater configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// CoinSpot API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// CoinSpot API secret
    #[serde(default, deserialize_with = "secret")]
    pub api_secret: Option<SecretString>,
    /// CoinSpot base URL, e.g. `https://www.coinspot.com.au`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Google spreadsheet ID
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    /// Google OAuth access token
    #[serde(default, deserialize_with = "secret")]
    pub sheets_access_token: Option<SecretString>,
    /// Sheets API base URL override
    #[serde(default)]
    pub sheets_base_url: Option<String>,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoinSpotError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoinSpotError::InvalidConfiguration(format!("reading {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, CoinSpotError> {
        Self::default().or_env()
    }

    /// Fill every unset value from environment variables.
    ///
    /// A variable is only read, and so only validated, when the
    /// configuration leaves its key unset.
    pub fn or_env(self) -> Result<Self, CoinSpotError> {
        self.or_vars(env_value)
    }

    fn or_vars(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoinSpotError> {
        let timeout_secs = match self.timeout_secs {
            Some(secs) => Some(secs),
            None => match lookup(env_vars::TIMEOUT_SECS) {
                Some(raw) => Some(raw.trim().parse().map_err(|_| {
                    CoinSpotError::InvalidConfiguration(format!(
                        "{} must be a whole number of seconds, got {raw:?}",
                        env_vars::TIMEOUT_SECS
                    ))
                })?),
                None => None,
            },
        };

        Ok(Self {
            api_key: self.api_key.or_else(|| lookup(env_vars::API_KEY)),
            api_secret: self
                .api_secret
                .or_else(|| lookup(env_vars::API_SECRET).map(SecretString::from)),
            base_url: self.base_url.or_else(|| lookup(env_vars::BASE_URL)),
            timeout_secs,
            spreadsheet_id: self
                .spreadsheet_id
                .or_else(|| lookup(env_vars::SPREADSHEET_ID)),
            sheets_access_token: self
                .sheets_access_token
                .or_else(|| lookup(env_vars::SHEETS_ACCESS_TOKEN).map(SecretString::from)),
            sheets_base_url: self
                .sheets_base_url
                .or_else(|| lookup(env_vars::SHEETS_BASE_URL)),
        })
    }

    /// Fill every unset value from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            api_key: self.api_key.or(fallback.api_key),
            api_secret: self.api_secret.or(fallback.api_secret),
            base_url: self.base_url.or(fallback.base_url),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            spreadsheet_id: self.spreadsheet_id.or(fallback.spreadsheet_id),
            sheets_access_token: self.sheets_access_token.or(fallback.sheets_access_token),
            sheets_base_url: self.sheets_base_url.or(fallback.sheets_base_url),
        }
    }

    /// The request timeout, defaulting to 30 seconds.
    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// The CoinSpot credentials.
    pub fn credentials(&self) -> Result<Credentials, CoinSpotError> {
        let api_key = present(self.api_key.as_deref())
            .ok_or(CoinSpotError::ConfigurationMissing("apiKey"))?;
        let api_secret = self
            .api_secret
            .as_ref()
            .filter(|secret| !secret.expose_secret().trim().is_empty())
            .ok_or(CoinSpotError::ConfigurationMissing("apiSecret"))?;
        Ok(Credentials::from_secret(api_key, api_secret.clone()))
    }

    /// Build the CoinSpot client.
    ///
    /// Fails before any network activity if `apiKey`, `apiSecret` or
    /// `baseUrl` is missing.
    pub fn coinspot_client(&self) -> Result<CoinSpotClient, CoinSpotError> {
        let base_url = present(self.base_url.as_deref())
            .ok_or(CoinSpotError::ConfigurationMissing("baseUrl"))?;
        let credentials = self.credentials()?;

        CoinSpotClient::builder()
            .base_url(base_url)
            .credentials(Arc::new(StaticCredentials::from(credentials)))
            .timeout(self.timeout())
            .build()
    }

    /// Build the Google Sheets client.
    pub fn sheets_client(&self) -> Result<GoogleSheetsClient, CoinSpotError> {
        let mut builder = GoogleSheetsClient::builder().timeout(self.timeout());
        if let Some(id) = &self.spreadsheet_id {
            builder = builder.spreadsheet_id(id.clone());
        }
        if let Some(token) = &self.sheets_access_token {
            builder = builder.access_token(token.clone());
        }
        if let Some(url) = present(self.sheets_base_url.as_deref()) {
            builder = builder.base_url(url);
        }
        builder.build()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

//! Error types for the CoinSpot updater.

use thiserror::Error;

/// The main error type for all CoinSpot client and updater operations.
#[derive(Error, Debug)]
pub enum CoinSpotError {
    /// A required configuration value was absent or empty
    #[error("Missing configuration: {0} is required")]
    ConfigurationMissing(&'static str),

    /// A configuration value was present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The request body could not be augmented with a nonce
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Connection, DNS, TLS or timeout failure
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// HTTP error raised while reading a response
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// CoinSpot returned `"status": "error"` in the response body
    #[error("CoinSpot API error: {0}")]
    Api(ApiError),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Date or time formatting failed
    #[error("Time formatting error: {0}")]
    Format(#[from] time::error::Format),

    /// Spreadsheet read or write failed
    #[error("Spreadsheet error: {0}")]
    Sheets(String),
}

impl CoinSpotError {
    /// Whether the error came from the network layer rather than the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_))
    }
}

/// An error reported by CoinSpot inside a response body.
///
/// CoinSpot answers with HTTP 200 and `{"status": "error", "message": "..."}`
/// for most rejected requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The `status` field (normally `"error"`)
    pub status: String,
    /// The `message` field, empty when absent
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.status)
        } else {
            write!(f, "{}: {}", self.status, self.message)
        }
    }
}

impl ApiError {
    /// Create a new API error from status and message.
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }

    /// Check if this is an invalid nonce error.
    pub fn is_invalid_nonce(&self) -> bool {
        self.message.to_ascii_lowercase().contains("nonce")
    }

    /// Check if this is an invalid key or signature error.
    pub fn is_invalid_auth(&self) -> bool {
        let message = self.message.to_ascii_lowercase();
        message.contains("invalid key") || message.contains("sign")
    }
}

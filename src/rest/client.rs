//! CoinSpot REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONNECTION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use url::Url;

use crate::auth::{
    CredentialsProvider, NonceProvider, UnixSecondsNonce, parse_body, sign_body, with_nonce,
};
use crate::error::{ApiError, CoinSpotError};
use crate::rate_limit::{RateLimitConfig, RateLimiter};

/// Default request timeout for both public and private calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The CoinSpot REST API client.
///
/// Public calls are plain GETs. Private calls get a nonce, an HMAC-SHA512
/// signature and wait on the client's rate limiter before being sent.
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
///     let credentials = Arc::new(StaticCredentials::new("api_key", "api_secret"));
///     let client = CoinSpotClient::builder()
///         .base_url("https://www.coinspot.com.au")
///         .credentials(credentials)
///         .build()?;
///
///     let raw = client.private_call("/api/ro/my/balances", "{}").await?;
///     println!("{raw}");
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinSpotClient {
    public_http: ClientWithMiddleware,
    private_http: ClientWithMiddleware,
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Arc<dyn NonceProvider>,
    rate_limiter: RateLimiter,
}

impl CoinSpotClient {
    /// Create a new client builder.
    pub fn builder() -> CoinSpotClientBuilder {
        CoinSpotClientBuilder::new()
    }

    /// The base URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The limiter pacing private calls.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Issue an unauthenticated GET to `base_url + path`.
    ///
    /// Not signed and not rate limited. Returns the body text of a 2xx
    /// response.
    pub async fn public_call(&self, path: &str) -> Result<String, CoinSpotError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "public call");
        let response = self.public_http.get(&url).send().await?;
        read_body(response).await
    }

    /// Issue an authenticated POST to `base_url + path`.
    ///
    /// `body` must be a JSON object (`"{}"` for none) and is checked before
    /// anything else. The call then waits until at least one second has
    /// passed since the previous private call started, inserts a fresh
    /// `nonce` as the first key and signs the resulting bytes. Returns the
    /// body text of a 2xx response.
    ///
    /// Private calls are never retried automatically: a resend would carry
    /// an already used nonce.
    pub async fn private_call(&self, path: &str, body: &str) -> Result<String, CoinSpotError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(CoinSpotError::ConfigurationMissing("apiKey"))?
            .get_credentials();
        let fields = parse_body(body)?;

        // The nonce is taken after the wait so paced calls never share one.
        self.rate_limiter.await_slot().await;

        let nonce = self.nonce_provider.next_nonce();
        let payload = with_nonce(fields, nonce)?;
        let signature = sign_body(credentials, payload.as_bytes())?;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, nonce, "private call");
        let response = self
            .private_http
            .post(&url)
            .header("key", &credentials.api_key)
            .header("sign", signature.to_lowercase())
            .header(CONTENT_TYPE, "application/json")
            .header(CONNECTION, "close")
            .body(payload)
            .send()
            .await?;

        read_body(response).await
    }

    /// [`private_call`](Self::private_call) with every failure folded into
    /// the returned text.
    ///
    /// Compatibility mode for callers that print whatever comes back: a
    /// transport or HTTP failure yields the error message in place of the
    /// response body, so the two cannot be told apart.
    pub async fn private_call_compat(&self, path: &str, body: &str) -> String {
        match self.private_call(path, body).await {
            Ok(text) => text,
            Err(err) => err.to_string(),
        }
    }

    /// Make a public GET request and parse the JSON response.
    pub(crate) async fn public_get<T>(&self, endpoint: &str) -> Result<T, CoinSpotError>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = self.public_call(endpoint).await?;
        parse_response(&body)
    }

    /// Make an authenticated POST request and parse the JSON response.
    pub(crate) async fn private_post<T>(&self, endpoint: &str, body: &str) -> Result<T, CoinSpotError>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = self.private_call(endpoint, body).await?;
        parse_response(&body)
    }
}

impl std::fmt::Debug for CoinSpotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinSpotClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.is_some())
            .field("rate_limit", self.rate_limiter.config())
            .finish()
    }
}

/// Read the body of a response, turning a non-2xx status into an error.
async fn read_body(response: reqwest::Response) -> Result<String, CoinSpotError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "CoinSpot returned an error status");
        return Err(CoinSpotError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// Parse a CoinSpot JSON body, checking its `status` field first.
///
/// CoinSpot reports rejected requests as `{"status": "error", "message": ...}`
/// with HTTP 200.
pub(crate) fn parse_response<T>(body: &str) -> Result<T, CoinSpotError>
where
    T: serde::de::DeserializeOwned,
{
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        CoinSpotError::InvalidResponse(format!("Failed to parse response: {e}. Body: {body}"))
    })?;

    if let Some(status) = value.get("status").and_then(|s| s.as_str()) {
        if status != "ok" {
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default();
            return Err(CoinSpotError::Api(ApiError::new(status, message)));
        }
    }

    serde_json::from_value(value).map_err(|e| {
        CoinSpotError::InvalidResponse(format!("Unexpected response shape: {e}. Body: {body}"))
    })
}

/// Builder for [`CoinSpotClient`].
pub struct CoinSpotClientBuilder {
    base_url: Option<String>,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    rate_limit: RateLimitConfig,
    timeout: Duration,
    user_agent: Option<String>,
    max_retries: u32,
}

impl CoinSpotClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// There is no default base URL; [`build`](Self::build) fails until one
    /// is set.
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            nonce_provider: None,
            rate_limit: RateLimitConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            max_retries: 3,
        }
    }

    /// Set the base URL, e.g. `https://www.coinspot.com.au`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom nonce provider.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Set the rate limit applied to private calls.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of retries for transient failures of public calls.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the client.
    ///
    /// Fails with [`CoinSpotError::ConfigurationMissing`] when no base URL
    /// was given, before any network activity.
    pub fn build(self) -> Result<CoinSpotClient, CoinSpotError> {
        let base_url = match self.base_url {
            Some(url) if !url.trim().is_empty() => normalize_base_url(&url)?,
            _ => return Err(CoinSpotError::ConfigurationMissing("baseUrl")),
        };

        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("coinspot-updater/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("coinspot-updater"));
        headers.insert(USER_AGENT, header_value);

        // No idle connections are kept, so every request opens a fresh one.
        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(self.max_retries);

        let public_http = ClientBuilder::new(reqwest_client.clone())
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let private_http = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let nonce_provider = self
            .nonce_provider
            .unwrap_or_else(|| Arc::new(UnixSecondsNonce::new()));

        Ok(CoinSpotClient {
            public_http,
            private_http,
            base_url,
            credentials: self.credentials,
            nonce_provider,
            rate_limiter: RateLimiter::new(self.rate_limit),
        })
    }
}

impl Default for CoinSpotClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a base URL and strip any trailing slash.
fn normalize_base_url(raw: &str) -> Result<String, CoinSpotError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoinSpotError::InvalidConfiguration(format!(
            "baseUrl must be http or https, got {}",
            url.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

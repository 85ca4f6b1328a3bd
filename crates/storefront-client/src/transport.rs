//! # Transport
//!
//! The only place that talks HTTP to the commerce API.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fetcher Request Flow                             │
//! │                                                                         │
//! │  caller ──► Fetcher::get / post (path)                                 │
//! │                 │                                                       │
//! │                 ├── credentials()  ── missing key ──► MissingApiKey     │
//! │                 │                     (no request is sent)             │
//! │                 ▼                                                       │
//! │          base_url + path, auth header, JSON body                        │
//! │                 │                                                       │
//! │                 ├── transport failure ──► Transport(NETWORK_ERROR)      │
//! │                 ├── non-2xx           ──► Transport(HTTP_<status>)      │
//! │                 └── 2xx               ──► serde_json::Value             │
//! │                                                                         │
//! │  One request per call. Never retries.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{ApiCredentials, AuthScheme, ClientConfig};
use crate::error::{ApiError, ClientResult};

/// Header carrying the key under [`AuthScheme::ApiKeyHeader`].
pub const API_KEY_HEADER: &str = "x-api-key";

// =============================================================================
// Fetcher Trait
// =============================================================================

/// JSON request seam between the sync layer and the commerce API.
///
/// `path` always starts with `/` and may carry a query string.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn get(&self, path: &str) -> ClientResult<Value>;

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value>;
}

/// Shared, type-erased fetcher.
pub type SharedFetcher = Arc<dyn Fetcher>;

/// GET and decode into `T`.
pub async fn get_json<T: DeserializeOwned>(fetcher: &dyn Fetcher, path: &str) -> ClientResult<T> {
    let value = fetcher.get(path).await?;
    Ok(serde_json::from_value(value)?)
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// [`Fetcher`] backed by `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl HttpFetcher {
    /// Builds the HTTP client. Credentials are checked per request, not here,
    /// so a storefront can start without them.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(HttpFetcher {
            client,
            config: Arc::new(config),
        })
    }

    pub fn shared(config: ClientConfig) -> ClientResult<SharedFetcher> {
        Ok(Arc::new(Self::new(config)?))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            warn!(status = status.as_u16(), message = %err.message, "Commerce API returned an error");
            return Err(err.into());
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Joins `path` onto the base URL, keeping any path prefix of the base.
pub fn endpoint(base_url: &Url, path: &str) -> ClientResult<Url> {
    let base = base_url.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{}/{}", base, path))?)
}

/// Percent-encodes an opaque id for use as one path segment.
///
/// Everything outside `A-Z a-z 0-9 * - . _` is escaped, so `/`, `?`, `#`,
/// `+` and `=` cannot change the shape of the url.
pub fn encode_path_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Reverses [`encode_path_segment`].
pub fn decode_path_segment(encoded: &str) -> String {
    url::form_urlencoded::parse(encoded.as_bytes())
        .next()
        .map(|(segment, _)| segment.into_owned())
        .unwrap_or_default()
}

fn authorize(request: reqwest::RequestBuilder, credentials: &ApiCredentials) -> reqwest::RequestBuilder {
    match credentials.auth_scheme {
        AuthScheme::ApiKeyHeader => request.header(API_KEY_HEADER, &credentials.api_key),
        AuthScheme::Bearer => request.bearer_auth(&credentials.api_key),
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn get(&self, path: &str) -> ClientResult<Value> {
        let credentials = self.config.credentials()?;
        let url = endpoint(&credentials.base_url, path)?;
        debug!(%url, "GET");

        let request = authorize(self.client.get(url), &credentials);
        self.send(request).await
    }

    #[instrument(skip(self, body))]
    async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        let credentials = self.config.credentials()?;
        let url = endpoint(&credentials.base_url, path)?;
        debug!(%url, "POST");

        let request = authorize(self.client.post(url), &credentials).json(&body);
        self.send(request).await
    }
}

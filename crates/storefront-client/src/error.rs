//! # Client Error Types
//!
//! Error types for the ordering-session and cart sync layer.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Session             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  MissingApiKey  │  │  Transport      │  │  SessionExpired         │ │
//! │  │  MissingBaseUrl │  │  (ApiError)     │  │  SessionRejected        │ │
//! │  │  InvalidUrl     │  │  Decode         │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   NotReady      │  │  Validation /   │                              │
//! │  │  (waiting, not  │  │  Persistence    │                              │
//! │  │   a failure)    │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! │                                                                         │
//! │  Every variant normalizes into ApiError {message, status, code}        │
//! │  before it reaches hook state.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use storefront_core::ValidationError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Message used when an error body carries nothing readable.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

// =============================================================================
// Normalized API Error
// =============================================================================

/// Transport-neutral error shape exposed to the UI.
///
/// ```json
/// { "message": "not found", "status": 404, "code": "HTTP_404" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable cause.
    pub message: String,

    /// HTTP status, when a response was received.
    #[serde(default)]
    pub status: Option<u16>,

    /// Machine-readable code for programmatic handling.
    #[serde(default)]
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            status: None,
            code: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Builds an error from a non-2xx response.
    ///
    /// The message is read from the body's `message` field, then `error`
    /// (string or `{message}` object), and defaults to "Unknown error" when
    /// the body is not JSON. A string `code` field is kept, otherwise the
    /// code is `HTTP_<status>`.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .or_else(|| v.get("error").and_then(|e| e.as_str()))
                    .or_else(|| v.pointer("/error/message").and_then(|m| m.as_str()))
            })
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
            .to_string();

        let code = parsed
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP_{}", status));

        ApiError {
            message,
            status: Some(status),
            code: Some(code),
        }
    }

    /// Returns true for 5xx responses and failures without a response.
    pub fn is_server_or_network(&self) -> bool {
        self.status.map_or(true, |s| s >= 500)
    }
}

// =============================================================================
// Client Error
// =============================================================================

/// Closed set of failure kinds, for callers that branch on category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Transport,
    SessionExpired,
    NotReady,
    Validation,
    Internal,
}

/// Client error type covering every failure of the sync layer.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// API key absent; requests are never sent unauthenticated.
    #[error("Commerce API key is not configured (set STOREFRONT_API_KEY)")]
    MissingApiKey,

    /// API base URL absent.
    #[error("Commerce API base URL is not configured (set STOREFRONT_API_BASE_URL)")]
    MissingBaseUrl,

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Network failure or non-2xx response.
    #[error("{0}")]
    Transport(ApiError),

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// A resumed cart is no longer valid server side.
    #[error("Ordering session for cart {cart_id} has expired")]
    SessionExpired { cart_id: String },

    /// The server answered 2xx but refused to open a session.
    #[error("{0}")]
    SessionRejected(String),

    // =========================================================================
    // Preconditions
    // =========================================================================
    /// A precondition is not satisfied yet. Callers treat this as waiting.
    #[error("Not ready: {missing} is not known yet")]
    NotReady { missing: &'static str },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Local Storage
    // =========================================================================
    #[error("Cart storage error: {0}")]
    Persistence(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::MissingApiKey
            | ClientError::MissingBaseUrl
            | ClientError::InvalidUrl(_)
            | ClientError::InvalidConfig(_)
            | ClientError::ConfigLoadFailed(_) => ErrorKind::Configuration,
            ClientError::Transport(_)
            | ClientError::Decode(_)
            | ClientError::SessionRejected(_) => ErrorKind::Transport,
            ClientError::SessionExpired { .. } => ErrorKind::SessionExpired,
            ClientError::NotReady { .. } => ErrorKind::NotReady,
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Persistence(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Returns true if a user-triggered retry may succeed.
    ///
    /// Nothing in this crate retries automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(api) => api.is_server_or_network(),
            ClientError::SessionExpired { .. } => true,
            _ => false,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ClientError::MissingApiKey
            | ClientError::MissingBaseUrl
            | ClientError::InvalidUrl(_)
            | ClientError::InvalidConfig(_)
            | ClientError::ConfigLoadFailed(_) => "CONFIGURATION_ERROR",
            ClientError::Transport(_) => "NETWORK_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::SessionExpired { .. } => "SESSION_EXPIRED",
            ClientError::SessionRejected(_) => "SESSION_REJECTED",
            ClientError::NotReady { .. } => "NOT_READY",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Persistence(_) => "STORAGE_ERROR",
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<&ClientError> for ApiError {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Transport(api) => api.clone(),
            other => ApiError::new(other.to_string()).with_code(other.code()),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(api) => api,
            other => ApiError::from(&other),
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        ClientError::Transport(err)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::Decode(err.to_string());
        }
        let mut api = ApiError::new(err.to_string()).with_code("NETWORK_ERROR");
        if let Some(status) = err.status() {
            api = api.with_status(status.as_u16());
        }
        ClientError::Transport(api)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Persistence(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_reads_message() {
        let err = ApiError::from_response(404, br#"{"message":"not found"}"#);
        assert_eq!(err.status, Some(404));
        assert_eq!(err.message, "not found");
        assert_eq!(err.code.as_deref(), Some("HTTP_404"));
    }

    #[test]
    fn test_from_response_falls_back() {
        let err = ApiError::from_response(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.message, UNKNOWN_ERROR_MESSAGE);

        let err = ApiError::from_response(400, br#"{"error":{"message":"bad date"},"code":"INVALID_DATE"}"#);
        assert_eq!(err.message, "bad date");
        assert_eq!(err.code.as_deref(), Some("INVALID_DATE"));

        let err = ApiError::from_response(500, br#"{"error":"boom"}"#);
        assert_eq!(err.message, "boom");

        let err = ApiError::from_response(500, br#"{"message":""}"#);
        assert_eq!(err.message, UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ClientError::MissingApiKey.kind(), ErrorKind::Configuration);
        assert!(ClientError::MissingBaseUrl.is_config_error());
        assert_eq!(
            ClientError::NotReady { missing: "orderDate" }.kind(),
            ErrorKind::NotReady
        );
        assert_eq!(
            ClientError::SessionExpired { cart_id: "c_1".into() }.kind(),
            ErrorKind::SessionExpired
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ClientError::Transport(ApiError::new("offline")).is_retryable());
        assert!(ClientError::Transport(ApiError::new("down").with_status(503)).is_retryable());
        assert!(!ClientError::Transport(ApiError::new("nope").with_status(404)).is_retryable());
        assert!(!ClientError::MissingApiKey.is_retryable());
    }

    #[test]
    fn test_normalization() {
        let api: ApiError = ClientError::MissingApiKey.into();
        assert_eq!(api.code.as_deref(), Some("CONFIGURATION_ERROR"));
        assert_eq!(api.status, None);

        let upstream = ApiError::new("gone").with_status(410);
        let api: ApiError = ClientError::Transport(upstream.clone()).into();
        assert_eq!(api, upstream);

        let api = ApiError::from(&ClientError::SessionExpired { cart_id: "c_9".into() });
        assert_eq!(api.code.as_deref(), Some("SESSION_EXPIRED"));
        assert!(api.message.contains("c_9"));
    }
}

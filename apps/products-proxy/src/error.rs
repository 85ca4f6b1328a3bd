//! Error types for the products proxy.
//!
//! Every error renders as `{"message": "..."}` with the status below.
//!
//! | Error          | Status                    |
//! |----------------|---------------------------|
//! | `Config`       | 500                       |
//! | `InvalidInput` | 400                       |
//! | `Upstream`     | upstream status, as is    |
//! | `Unreachable`  | 502                       |
//! | `BadUpstream`  | 502                       |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storefront_client::ClientError;

/// Products proxy errors.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    InvalidInput(String),

    /// Upstream answered with a non-2xx status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Upstream could not be reached.
    #[error("Commerce API unreachable: {0}")]
    Unreachable(String),

    #[error("Commerce API returned an invalid response: {0}")]
    BadUpstream(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::Unreachable(_) | ProxyError::BadUpstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ClientError> for ProxyError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Transport(api) => match api.status {
                Some(status) => ProxyError::Upstream {
                    status,
                    message: api.message,
                },
                None => ProxyError::Unreachable(api.message),
            },
            ClientError::Decode(msg) => ProxyError::BadUpstream(msg),
            ClientError::Validation(e) => ProxyError::InvalidInput(e.to_string()),
            other => ProxyError::Config(other.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

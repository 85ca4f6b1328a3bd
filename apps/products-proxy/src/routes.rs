//! HTTP routes of the products proxy.
//!
//! ```text
//! GET /health                                   "OK"
//! GET /api/v1/locations/{location_id}/products  upstream JSON, passed through
//! ```

use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use storefront_client::{ClientConfig, SharedFetcher};
use storefront_core::validation::validate_location_id;
use tracing::{debug, error, instrument, warn};

use crate::error::ProxyError;

/// Shared state of the proxy handlers.
pub struct ProxyState {
    pub client: ClientConfig,
    pub upstream: SharedFetcher,
}

pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/locations/{location_id}/products", get(products_handler))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

pub fn products_path(location_id: &str, query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("/api/v1/locations/{}/products?{}", location_id, query),
        None => format!("/api/v1/locations/{}/products", location_id),
    }
}

/// Forwards a product listing request with the server-held API key.
#[instrument(skip(state, query))]
pub async fn products_handler(
    State(state): State<Arc<ProxyState>>,
    Path(location_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ProxyError> {
    if let Err(e) = state.client.credentials() {
        error!(error = %e, "Refusing to proxy products without commerce API credentials");
        return Err(e.into());
    }
    validate_location_id(&location_id).map_err(|e| ProxyError::InvalidInput(e.to_string()))?;

    let path = products_path(&location_id, query.as_deref());
    match state.upstream.get(&path).await {
        Ok(body) => {
            debug!("Products proxied");
            Ok(Json(body))
        }
        Err(e) => {
            warn!(error = %e, "Upstream products request failed");
            Err(e.into())
        }
    }
}

//! # Mock Transport
//!
//! In-memory [`Fetcher`] implementations for testing hooks and managers
//! without a commerce API.
//!
//! - [`MockFetcher`]: scripted responses per method and path.
//! - [`MockCommerceBackend`]: a small stateful commerce API (locations,
//!   carts, ordering sessions, menus).
//!
//! Both record every request so tests can assert on exactly what was sent.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use storefront_core::{Cart, MenuBundle, OrderingSessionRequest};

use crate::error::{ApiError, ClientError, ClientResult};
use crate::transport::{decode_path_segment, Fetcher};

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn not_found(message: &str) -> ClientError {
    ClientError::Transport(ApiError::new(message).with_status(404).with_code("HTTP_404"))
}

// =============================================================================
// Request Log
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Default)]
struct RequestLog {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RequestLog {
    fn record(&self, method: Method, path: &str, body: Option<Value>) {
        guard(&self.requests).push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });
    }

    fn all(&self) -> Vec<RecordedRequest> {
        guard(&self.requests).clone()
    }

    fn count(&self) -> usize {
        guard(&self.requests).len()
    }

    fn count_with_prefix(&self, prefix: &str) -> usize {
        guard(&self.requests)
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .count()
    }
}

// =============================================================================
// Scripted Fetcher
// =============================================================================

/// Fetcher answering from a response table. Unscripted paths get a 404.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: Arc<Mutex<HashMap<(Method, String), Result<Value, ApiError>>>>,
    log: RequestLog,
    latency: Duration,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response (lets tests observe in-flight state).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn respond_get(&self, path: &str, body: Value) {
        self.script(Method::Get, path, Ok(body));
    }

    pub fn respond_post(&self, path: &str, body: Value) {
        self.script(Method::Post, path, Ok(body));
    }

    pub fn fail_get(&self, path: &str, error: ApiError) {
        self.script(Method::Get, path, Err(error));
    }

    pub fn fail_post(&self, path: &str, error: ApiError) {
        self.script(Method::Post, path, Err(error));
    }

    fn script(&self, method: Method, path: &str, response: Result<Value, ApiError>) {
        guard(&self.responses).insert((method, path.to_string()), response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.all()
    }

    pub fn request_count(&self) -> usize {
        self.log.count()
    }

    pub fn requests_with_prefix(&self, prefix: &str) -> usize {
        self.log.count_with_prefix(prefix)
    }

    async fn respond(&self, method: Method, path: &str) -> ClientResult<Value> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let scripted = guard(&self.responses).get(&(method, path.to_string())).cloned();
        match scripted {
            Some(response) => response.map_err(ClientError::Transport),
            None => Err(not_found("not found")),
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get(&self, path: &str) -> ClientResult<Value> {
        self.log.record(Method::Get, path, None);
        self.respond(Method::Get, path).await
    }

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.log.record(Method::Post, path, Some(body));
        self.respond(Method::Post, path).await
    }
}

// =============================================================================
// Stateful Backend
// =============================================================================

#[derive(Debug, Clone)]
struct StoredCart {
    location_id: String,
    cart: Cart,
}

#[derive(Debug, Default)]
struct BackendState {
    locations: HashMap<String, MenuBundle>,
    carts: HashMap<String, StoredCart>,
    next_cart_ids: VecDeque<String>,
    session_rejection: Option<String>,
}

/// Commerce API simulation covering the endpoints the sync layer uses.
///
/// ```text
/// POST /api/v1/locations/{id}/ordering-sessions   resume or open a cart
/// GET  /api/v1/carts/{cartId}                     cart with schedule
/// GET  /api/v1/locations/{id}/menus?orderDate=&orderTime=
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCommerceBackend {
    state: Arc<Mutex<BackendState>>,
    log: RequestLog,
    latency: Duration,
}

impl MockCommerceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn add_location(&self, location_id: &str) {
        guard(&self.state)
            .locations
            .entry(location_id.to_string())
            .or_default();
    }

    pub fn set_menus(&self, location_id: &str, menus: MenuBundle) {
        guard(&self.state)
            .locations
            .insert(location_id.to_string(), menus);
    }

    /// Registers an existing cart (and its location).
    pub fn add_cart(&self, location_id: &str, cart: Cart) {
        let mut state = guard(&self.state);
        state.locations.entry(location_id.to_string()).or_default();
        state.carts.insert(
            cart.id.clone(),
            StoredCart {
                location_id: location_id.to_string(),
                cart,
            },
        );
    }

    pub fn set_schedule(&self, cart_id: &str, order_date: Option<&str>, order_time: Option<&str>) {
        if let Some(stored) = guard(&self.state).carts.get_mut(cart_id) {
            stored.cart.order_date = order_date.map(str::to_string);
            stored.cart.order_time = order_time.map(str::to_string);
        }
    }

    /// Id for the next cart the backend opens (random ids otherwise).
    pub fn queue_cart_id(&self, cart_id: &str) {
        guard(&self.state).next_cart_ids.push_back(cart_id.to_string());
    }

    /// Drops a cart server side, as if its session timed out.
    pub fn expire_cart(&self, cart_id: &str) {
        guard(&self.state).carts.remove(cart_id);
    }

    /// Makes the next sessions answer 2xx with this `errorMessage`.
    pub fn reject_sessions(&self, message: Option<&str>) {
        guard(&self.state).session_rejection = message.map(str::to_string);
    }

    pub fn cart(&self, cart_id: &str) -> Option<Cart> {
        guard(&self.state).carts.get(cart_id).map(|s| s.cart.clone())
    }

    pub fn cart_count(&self) -> usize {
        guard(&self.state).carts.len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.all()
    }

    pub fn request_count(&self) -> usize {
        self.log.count()
    }

    pub fn requests_with_prefix(&self, prefix: &str) -> usize {
        self.log.count_with_prefix(prefix)
    }

    /// Menu requests issued for a location.
    pub fn menu_request_count(&self, location_id: &str) -> usize {
        self.requests_with_prefix(&format!("/api/v1/locations/{}/menus", location_id))
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn open_session(&self, location_id: &str, request: OrderingSessionRequest) -> ClientResult<Value> {
        let mut state = guard(&self.state);
        if !state.locations.contains_key(location_id) {
            return Err(not_found("Location not found"));
        }
        if let Some(message) = &state.session_rejection {
            return Ok(json!({ "cartId": null, "errorMessage": message }));
        }

        if let Some(existing) = request.existing_cart_id.as_deref() {
            let resumable = state
                .carts
                .get(existing)
                .is_some_and(|stored| stored.location_id == location_id);
            if resumable {
                return Ok(json!({ "cartId": existing, "errorMessage": "" }));
            }
        }

        let cart_id = state
            .next_cart_ids
            .pop_front()
            .unwrap_or_else(|| format!("c_{}", uuid::Uuid::new_v4().simple()));
        state.carts.insert(
            cart_id.clone(),
            StoredCart {
                location_id: location_id.to_string(),
                cart: Cart {
                    id: cart_id.clone(),
                    ..Default::default()
                },
            },
        );
        Ok(json!({ "cartId": cart_id, "errorMessage": "" }))
    }

    fn menus(&self, location_id: &str, query: Option<&str>) -> ClientResult<Value> {
        let params: HashMap<&str, &str> = query
            .unwrap_or_default()
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect();
        let has = |key: &str| params.get(key).is_some_and(|v| !v.is_empty());
        if !has("orderDate") || !has("orderTime") {
            return Err(ClientError::Transport(
                ApiError::new("orderDate and orderTime are required")
                    .with_status(400)
                    .with_code("HTTP_400"),
            ));
        }

        let state = guard(&self.state);
        let bundle = state
            .locations
            .get(location_id)
            .ok_or_else(|| not_found("Location not found"))?;
        Ok(serde_json::to_value(bundle)?)
    }
}

#[async_trait]
impl Fetcher for MockCommerceBackend {
    async fn get(&self, path: &str) -> ClientResult<Value> {
        self.log.record(Method::Get, path, None);
        self.delay().await;

        let (route, query) = match path.split_once('?') {
            Some((route, query)) => (route, Some(query)),
            None => (path, None),
        };
        let segments: Vec<&str> = route.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            ["api", "v1", "carts", cart_id] => {
                let cart = self
                    .cart(&decode_path_segment(cart_id))
                    .ok_or_else(|| not_found("Cart not found"))?;
                Ok(serde_json::to_value(cart)?)
            }
            ["api", "v1", "locations", location_id, "menus"] => self.menus(location_id, query),
            _ => Err(not_found("not found")),
        }
    }

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.log.record(Method::Post, path, Some(body.clone()));
        self.delay().await;

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["api", "v1", "locations", location_id, "ordering-sessions"] => {
                let request: OrderingSessionRequest = serde_json::from_value(body)?;
                self.open_session(location_id, request)
            }
            _ => Err(not_found("not found")),
        }
    }
}

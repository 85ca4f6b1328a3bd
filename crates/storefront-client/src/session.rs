//! # Ordering Sessions
//!
//! Opens or resumes the server-side ordering session of a location and keeps
//! the local cart id in step with it.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     UseOrderingSession::start                           │
//! │                                                                         │
//! │  existing_cart_id? ──no──► CartIdStore::load(location)                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  is_loading = true  (hook + CartStore)                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  POST /api/v1/locations/{id}/ordering-sessions   (exactly once)        │
//! │         │                                                               │
//! │         ├── ok(cart_id) ──► CartIdStore::save ──► CartStore.cart_id    │
//! │         ├── expired     ──► CartIdStore::forget, error SESSION_EXPIRED  │
//! │         └── failure     ──► error set, cart_id untouched               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  is_loading = false                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A resumed session must come back with the same cart id. When the server
//! no longer knows the cart (404/410) or hands out a different one, the
//! result is [`ClientError::SessionExpired`]; a divergent cart is never
//! adopted silently.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_core::validation::{validate_cart_id, validate_location_id};
use storefront_core::{OrderingSessionOutcome, OrderingSessionRequest, OrderingSessionResponse};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::cart_store::CartStore;
use crate::error::{ApiError, ClientError, ClientResult};
use crate::persistence::SharedCartIdStore;
use crate::scope::{ComponentScope, ScopeToken};
use crate::transport::SharedFetcher;

/// `POST` target for opening a session at a location.
pub fn ordering_session_path(location_id: &str) -> String {
    format!("/api/v1/locations/{}/ordering-sessions", location_id)
}

/// Optional inputs of a session request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartSessionOptions {
    /// Query parameters of the landing page, forwarded as is.
    pub search_params: Option<BTreeMap<String, String>>,

    /// Cart to resume.
    pub existing_cart_id: Option<String>,

    pub marketplace_id: Option<String>,
}

impl StartSessionOptions {
    pub fn resume(cart_id: impl Into<String>) -> Self {
        StartSessionOptions {
            existing_cart_id: Some(cart_id.into()),
            ..Default::default()
        }
    }
}

// =============================================================================
// Manager
// =============================================================================

/// Issues ordering-session requests. Stateless apart from the fetcher.
#[derive(Clone)]
pub struct OrderingSessionManager {
    fetcher: SharedFetcher,
}

impl OrderingSessionManager {
    pub fn new(fetcher: SharedFetcher) -> Self {
        OrderingSessionManager { fetcher }
    }

    /// Opens or resumes a session and returns its cart id.
    ///
    /// Sends exactly one request, or none when the input is invalid.
    #[instrument(skip(self, options), fields(resume = options.existing_cart_id.is_some()))]
    pub async fn try_start_ordering_session(
        &self,
        location_id: &str,
        options: StartSessionOptions,
    ) -> ClientResult<String> {
        validate_location_id(location_id)?;
        let existing = options.existing_cart_id.filter(|id| !id.is_empty());
        if let Some(cart_id) = existing.as_deref() {
            validate_cart_id(cart_id)?;
        }

        let request = OrderingSessionRequest {
            search_params: options.search_params,
            existing_cart_id: existing.clone(),
            marketplace_id: options.marketplace_id,
        };
        let body = serde_json::to_value(&request)?;

        let value = match self.fetcher.post(&ordering_session_path(location_id), body).await {
            Ok(value) => value,
            Err(ClientError::Transport(api)) if matches!(api.status, Some(404) | Some(410)) => {
                return match existing {
                    Some(cart_id) => {
                        warn!(%cart_id, status = ?api.status, "Resumed cart is gone server side");
                        Err(ClientError::SessionExpired { cart_id })
                    }
                    None => Err(ClientError::Transport(api)),
                };
            }
            Err(e) => return Err(e),
        };

        let response: OrderingSessionResponse = serde_json::from_value(value)?;

        if let Some(message) = response.error_message.filter(|m| !m.is_empty()) {
            warn!(%message, "Ordering session rejected");
            return Err(ClientError::SessionRejected(message));
        }

        let cart_id = response
            .cart_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::SessionRejected("Ordering session response did not include a cart id".into()))?;

        if let Some(expected) = existing {
            if expected != cart_id {
                warn!(expected = %expected, issued = %cart_id, "Server issued a different cart for a resumed session");
                return Err(ClientError::SessionExpired { cart_id: expected });
            }
            debug!(%cart_id, "Ordering session resumed");
        } else {
            info!(%cart_id, "Ordering session opened");
        }

        Ok(cart_id)
    }

    /// [`try_start_ordering_session`](Self::try_start_ordering_session) in
    /// outcome form: success carries the cart id and an empty message,
    /// failure carries the message.
    pub async fn start_ordering_session(
        &self,
        location_id: &str,
        options: StartSessionOptions,
    ) -> OrderingSessionOutcome {
        match self.try_start_ordering_session(location_id, options).await {
            Ok(cart_id) => OrderingSessionOutcome::success(cart_id),
            Err(e) => OrderingSessionOutcome::failure(ApiError::from(e).message),
        }
    }

    /// Binds a hook to a component.
    pub fn use_ordering_session(
        &self,
        scope: &ComponentScope,
        cart_store: CartStore,
        cart_ids: SharedCartIdStore,
    ) -> UseOrderingSession {
        let (state, _rx) = watch::channel(SessionState::default());
        UseOrderingSession {
            inner: Arc::new(SessionHook {
                manager: self.clone(),
                cart_store,
                cart_ids,
                scope: scope.token(),
                state,
            }),
        }
    }
}

// =============================================================================
// Hook
// =============================================================================

/// What the component sees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub cart_id: Option<String>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

struct SessionHook {
    manager: OrderingSessionManager,
    cart_store: CartStore,
    cart_ids: SharedCartIdStore,
    scope: ScopeToken,
    state: watch::Sender<SessionState>,
}

impl SessionHook {
    fn publish(&self, modify: impl FnOnce(&mut SessionState)) -> bool {
        if !self.scope.is_mounted() {
            debug!(scope = %self.scope.name(), "Scope unmounted; dropping session update");
            return false;
        }
        self.state.send_modify(modify);
        true
    }

    /// Forgets the persisted id of `location_id` only if it is the expired one.
    fn forget_expired(&self, location_id: &str, expired: &str) {
        match self.cart_ids.load(location_id) {
            Ok(Some(persisted)) if persisted == expired => {
                if let Err(e) = self.cart_ids.forget(location_id) {
                    warn!(location_id, error = %e, "Failed to forget expired cart id");
                } else {
                    debug!(location_id, cart_id = expired, "Forgot expired cart id");
                }
            }
            Ok(_) => {}
            Err(e) => warn!(location_id, error = %e, "Could not read persisted cart id"),
        }
    }

    fn fail(&self, error: &ClientError) {
        let api = ApiError::from(error);
        self.publish(|s| {
            s.error = Some(api);
            s.is_loading = false;
        });
    }
}

/// Session hook of one component.
#[derive(Clone)]
pub struct UseOrderingSession {
    inner: Arc<SessionHook>,
}

impl UseOrderingSession {
    /// Opens or resumes the session of `location_id`.
    ///
    /// Without an explicit `existing_cart_id` the id persisted for the
    /// location is resumed.
    pub async fn start(&self, location_id: &str, mut options: StartSessionOptions) -> SessionState {
        let hook = &self.inner;

        if options.existing_cart_id.is_none() {
            options.existing_cart_id = match hook.cart_ids.load(location_id) {
                Ok(id) => id,
                Err(e) => {
                    warn!(location_id, error = %e, "Could not read persisted cart id; starting fresh");
                    None
                }
            };
        }

        hook.publish(|s| {
            s.is_loading = true;
            s.error = None;
        });
        hook.cart_store.set_is_loading(true);

        let result = hook.manager.try_start_ordering_session(location_id, options).await;

        hook.cart_store.set_is_loading(false);

        if !hook.scope.is_mounted() {
            debug!(location_id, "Session settled after unmount; result dropped");
            return self.snapshot();
        }

        match result {
            Ok(cart_id) => {
                if let Err(e) = hook.cart_ids.save(location_id, &cart_id) {
                    warn!(location_id, error = %e, "Failed to persist cart id");
                    hook.fail(&e);
                    return self.snapshot();
                }
                hook.cart_store.set_cart_id_state(cart_id.clone());
                hook.publish(|s| {
                    s.cart_id = Some(cart_id);
                    s.is_loading = false;
                    s.error = None;
                });
            }
            Err(ClientError::SessionExpired { cart_id }) => {
                hook.forget_expired(location_id, &cart_id);
                hook.fail(&ClientError::SessionExpired { cart_id });
            }
            Err(e) => {
                warn!(location_id, error = %e, "Ordering session failed");
                hook.fail(&e);
            }
        }

        self.snapshot()
    }

    /// Clears hook state (not the CartStore) before a user retry.
    pub fn reset(&self) {
        self.inner.publish(|s| *s = SessionState::default());
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use storefront_core::Cart;

    use super::*;
    use crate::mock::{MockCommerceBackend, MockFetcher};
    use crate::persistence::{CartIdStore, MemoryCartIdStore};

    fn manager_with(mock: &MockFetcher) -> OrderingSessionManager {
        OrderingSessionManager::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_empty_location_fails_without_request() {
        let mock = MockFetcher::new();
        let outcome = manager_with(&mock)
            .start_ordering_session("", StartSessionOptions::default())
            .await;

        assert!(!outcome.is_success());
        assert!(outcome.cart_id.is_none());
        assert!(!outcome.error_message.is_empty());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_success_sends_one_request_with_camel_case_body() {
        let mock = MockFetcher::new();
        mock.respond_post("/api/v1/locations/L1/ordering-sessions", json!({"cartId": "c_1", "errorMessage": ""}));

        let mut params = BTreeMap::new();
        params.insert("utm_source".to_string(), "qr".to_string());
        let outcome = manager_with(&mock)
            .start_ordering_session(
                "L1",
                StartSessionOptions {
                    search_params: Some(params),
                    marketplace_id: Some("m_1".into()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(outcome, OrderingSessionOutcome::success("c_1"));
        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].body,
            Some(json!({"searchParams": {"utm_source": "qr"}, "marketplaceId": "m_1"}))
        );
    }

    #[tokio::test]
    async fn test_server_error_message_is_failure() {
        let mock = MockFetcher::new();
        mock.respond_post(
            "/api/v1/locations/L1/ordering-sessions",
            json!({"cartId": null, "errorMessage": "Location closed"}),
        );

        let outcome = manager_with(&mock)
            .start_ordering_session("L1", StartSessionOptions::default())
            .await;
        assert_eq!(outcome, OrderingSessionOutcome::failure("Location closed"));
    }

    #[tokio::test]
    async fn test_http_error_message_is_surfaced() {
        let mock = MockFetcher::new();
        mock.fail_post(
            "/api/v1/locations/L1/ordering-sessions",
            ApiError::new("Service unavailable").with_status(503),
        );

        let outcome = manager_with(&mock)
            .start_ordering_session("L1", StartSessionOptions::default())
            .await;
        assert_eq!(outcome.error_message, "Service unavailable");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_resume_is_idempotent() {
        let backend = MockCommerceBackend::new();
        backend.add_cart("L1", Cart { id: "c_123".into(), ..Default::default() });
        let manager = OrderingSessionManager::new(Arc::new(backend.clone()));

        for _ in 0..2 {
            let cart_id = manager
                .try_start_ordering_session("L1", StartSessionOptions::resume("c_123"))
                .await
                .unwrap();
            assert_eq!(cart_id, "c_123");
        }
        assert_eq!(backend.request_count(), 2);
        assert_eq!(backend.cart_count(), 1);
    }

    #[tokio::test]
    async fn test_divergent_cart_is_expired_session() {
        let backend = MockCommerceBackend::new();
        backend.add_location("L1");
        let manager = OrderingSessionManager::new(Arc::new(backend.clone()));

        let err = manager
            .try_start_ordering_session("L1", StartSessionOptions::resume("c_old"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::SessionExpired { ref cart_id } if cart_id == "c_old"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_gone_cart_is_expired_session() {
        let mock = MockFetcher::new();
        mock.fail_post("/api/v1/locations/L1/ordering-sessions", ApiError::new("gone").with_status(410));

        let err = manager_with(&mock)
            .try_start_ordering_session("L1", StartSessionOptions::resume("c_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::SessionExpired { .. }));

        let err = manager_with(&mock)
            .try_start_ordering_session("L1", StartSessionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_hook_persists_before_publishing() {
        let backend = MockCommerceBackend::new();
        backend.add_location("L1");
        let manager = OrderingSessionManager::new(Arc::new(backend.clone()));
        let store = CartStore::new();
        let cart_ids = Arc::new(MemoryCartIdStore::new());
        let scope = ComponentScope::new("landing");
        let hook = manager.use_ordering_session(&scope, store.clone(), cart_ids.clone());

        let mut rx = store.subscribe();
        let observed_ids = cart_ids.clone();
        let watcher = tokio::spawn(async move {
            loop {
                if rx.changed().await.is_err() {
                    return false;
                }
                let cart_id = rx.borrow_and_update().cart_id.clone();
                if !cart_id.is_empty() {
                    return observed_ids.load("L1").unwrap().as_deref() == Some(cart_id.as_str());
                }
            }
        });

        let state = hook.start("L1", StartSessionOptions::default()).await;
        let cart_id = state.cart_id.clone().unwrap();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(store.cart_id(), cart_id);
        assert!(!store.is_loading());
        assert!(watcher.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hook_loading_only_while_in_flight() {
        let backend = MockCommerceBackend::new().with_latency(Duration::from_millis(20));
        backend.add_location("L1");
        let manager = OrderingSessionManager::new(Arc::new(backend));
        let store = CartStore::new();
        let scope = ComponentScope::new("landing");
        let hook = manager.use_ordering_session(&scope, store.clone(), Arc::new(MemoryCartIdStore::new()));

        let probe = hook.clone();
        let probe_store = store.clone();
        let (done, during) = tokio::join!(hook.start("L1", StartSessionOptions::default()), async move {
            tokio::task::yield_now().await;
            (probe.snapshot().is_loading, probe_store.is_loading())
        });

        assert_eq!(during, (true, true));
        assert!(!done.is_loading);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_hook_failure_leaves_cart_id_untouched() {
        let mock = MockFetcher::new();
        mock.fail_post("/api/v1/locations/L1/ordering-sessions", ApiError::new("boom").with_status(500));
        let store = CartStore::new();
        store.set_cart_id_state("c_prev");
        let scope = ComponentScope::new("landing");
        let hook = manager_with(&mock).use_ordering_session(&scope, store.clone(), Arc::new(MemoryCartIdStore::new()));

        let state = hook.start("L1", StartSessionOptions::default()).await;
        assert_eq!(state.error.unwrap().message, "boom");
        assert!(state.cart_id.is_none());
        assert_eq!(store.cart_id(), "c_prev");

        hook.reset();
        assert_eq!(hook.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn test_hook_forgets_expired_cart() {
        let backend = MockCommerceBackend::new();
        backend.add_location("L1");
        let cart_ids = Arc::new(MemoryCartIdStore::with_entry("L1", "c_stale"));
        let scope = ComponentScope::new("landing");
        let hook = OrderingSessionManager::new(Arc::new(backend.clone())).use_ordering_session(
            &scope,
            CartStore::new(),
            cart_ids.clone(),
        );

        let state = hook.start("L1", StartSessionOptions::default()).await;
        assert_eq!(state.error.unwrap().code.as_deref(), Some("SESSION_EXPIRED"));
        assert_eq!(cart_ids.load("L1").unwrap(), None);

        let state = hook.start("L1", StartSessionOptions::default()).await;
        assert!(state.error.is_none());
        assert!(state.cart_id.is_some());
    }

    #[tokio::test]
    async fn test_expired_explicit_resume_keeps_other_persisted_cart() {
        let backend = MockCommerceBackend::new();
        backend.add_cart("L1", Cart { id: "c_live".into(), ..Default::default() });
        let cart_ids = Arc::new(MemoryCartIdStore::with_entry("L1", "c_live"));
        let scope = ComponentScope::new("landing");
        let hook = OrderingSessionManager::new(Arc::new(backend.clone())).use_ordering_session(
            &scope,
            CartStore::new(),
            cart_ids.clone(),
        );

        let state = hook.start("L1", StartSessionOptions::resume("c_old")).await;
        assert_eq!(state.error.unwrap().code.as_deref(), Some("SESSION_EXPIRED"));
        assert_eq!(cart_ids.load("L1").unwrap().as_deref(), Some("c_live"));

        let state = hook.start("L1", StartSessionOptions::default()).await;
        assert_eq!(state.cart_id.as_deref(), Some("c_live"));
    }

    #[tokio::test]
    async fn test_opaque_server_cart_ids_resume() {
        let long_id = format!("c_{}", "x".repeat(140));
        for issued in ["c/abc+def==", "c?tab=1 #%", long_id.as_str()] {
            let backend = MockCommerceBackend::new();
            backend.add_location("L1");
            backend.queue_cart_id(issued);
            let cart_ids = Arc::new(MemoryCartIdStore::new());
            let store = CartStore::new();
            let scope = ComponentScope::new("landing");
            let hook = OrderingSessionManager::new(Arc::new(backend.clone())).use_ordering_session(
                &scope,
                store.clone(),
                cart_ids.clone(),
            );

            let first = hook.start("L1", StartSessionOptions::default()).await;
            assert!(first.error.is_none());
            assert_eq!(first.cart_id.as_deref(), Some(issued));

            let again = hook.start("L1", StartSessionOptions::default()).await;
            assert!(again.error.is_none(), "resume of {issued:?} failed: {:?}", again.error);
            assert_eq!(again.cart_id.as_deref(), Some(issued));
            assert_eq!(store.cart_id(), issued);
            assert_eq!(cart_ids.load("L1").unwrap().as_deref(), Some(issued));

            let requests = backend.requests();
            assert_eq!(requests.len(), 2);
            assert_eq!(requests[1].body.as_ref().unwrap()["existingCartId"], issued);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmounted_hook_drops_result() {
        let backend = MockCommerceBackend::new().with_latency(Duration::from_millis(20));
        backend.add_location("L1");
        let store = CartStore::new();
        let cart_ids = Arc::new(MemoryCartIdStore::new());
        let scope = ComponentScope::new("landing");
        let hook = OrderingSessionManager::new(Arc::new(backend)).use_ordering_session(
            &scope,
            store.clone(),
            cart_ids.clone(),
        );

        let (state, _) = tokio::join!(hook.start("L1", StartSessionOptions::default()), async {
            scope.unmount();
        });

        assert!(state.cart_id.is_none());
        assert_eq!(store.cart_id(), "");
        assert!(!store.is_loading());
        assert_eq!(cart_ids.load("L1").unwrap(), None);
    }
}

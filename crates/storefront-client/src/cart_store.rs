//! # Cart Store
//!
//! The single shared register of client-side cart state.
//!
//! ## State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CartStoreState                                 │
//! │                                                                         │
//! │   cart_id:    String   ("" until a session produced one)               │
//! │   is_loading: bool     (an ordering session request is in flight)      │
//! │                                                                         │
//! │   set_cart_id_state(id)  ──► cart_id = id                              │
//! │   set_is_loading(flag)   ──► is_loading = flag                         │
//! │                                                                         │
//! │   Last write wins. No validation, no derived fields.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is injected wherever it is needed; there is no global instance.
//! Cloning a `CartStore` shares the container.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

/// Snapshot of the cart register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartStoreState {
    pub cart_id: String,
    pub is_loading: bool,
}

/// Observable container for [`CartStoreState`].
#[derive(Debug, Clone)]
pub struct CartStore {
    tx: Arc<watch::Sender<CartStoreState>>,
}

impl CartStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CartStoreState::default());
        CartStore { tx: Arc::new(tx) }
    }

    pub fn set_cart_id_state(&self, cart_id: impl Into<String>) {
        let cart_id = cart_id.into();
        debug!(cart_id = %cart_id, "CartStore: cart id set");
        self.tx.send_modify(|state| state.cart_id = cart_id);
    }

    pub fn set_is_loading(&self, is_loading: bool) {
        self.tx.send_modify(|state| state.is_loading = is_loading);
    }

    pub fn snapshot(&self) -> CartStoreState {
        self.tx.borrow().clone()
    }

    pub fn cart_id(&self) -> String {
        self.tx.borrow().cart_id.clone()
    }

    /// Current cart id, `None` while it is still empty.
    pub fn current_cart_id(&self) -> Option<String> {
        let id = self.cart_id();
        (!id.is_empty()).then_some(id)
    }

    pub fn is_loading(&self) -> bool {
        self.tx.borrow().is_loading
    }

    /// Receiver notified on every write.
    pub fn subscribe(&self) -> watch::Receiver<CartStoreState> {
        self.tx.subscribe()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let store = CartStore::new();
        assert_eq!(store.snapshot(), CartStoreState::default());
        assert_eq!(store.cart_id(), "");
        assert!(store.current_cart_id().is_none());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_last_write_wins_without_validation() {
        let store = CartStore::new();
        store.set_cart_id_state("c_1");
        store.set_cart_id_state("c_2");
        assert_eq!(store.cart_id(), "c_2");

        store.set_cart_id_state("");
        assert_eq!(store.cart_id(), "");

        store.set_is_loading(true);
        store.set_is_loading(true);
        assert!(store.is_loading());
        store.set_is_loading(false);
        assert!(!store.is_loading());
    }

    #[test]
    fn test_clones_share_state_and_fresh_stores_do_not() {
        let store = CartStore::new();
        let shared = store.clone();
        shared.set_cart_id_state("c_123");
        assert_eq!(store.cart_id(), "c_123");

        let fresh = CartStore::new();
        assert_eq!(fresh.cart_id(), "");
    }

    #[tokio::test]
    async fn test_subscribers_see_writes() {
        let store = CartStore::new();
        let mut rx = store.subscribe();

        store.set_is_loading(true);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading);

        store.set_cart_id_state("c_9");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().cart_id, "c_9");
    }
}

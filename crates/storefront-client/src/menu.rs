//! # Menu Fetcher
//!
//! Loads the menus valid for the cart's chosen order date and time.
//!
//! ## Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          UseMenus::refresh                              │
//! │                                                                         │
//! │  is_enabled?            ──no──► Disabled                                │
//! │  cart id known?         ──no──► NoCart                                  │
//! │      (persisted for the location, else CartStore)                      │
//! │  GET /api/v1/carts/{id} ──no data──► LoadingCart                       │
//! │  orderDate + orderTime? ──no──► MissingSchedule                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Ready(schedule) ──► GET /api/v1/locations/{id}/menus                  │
//! │                          ?orderDate={date}&orderTime={time}            │
//! │                                                                         │
//! │  Only Ready issues a menu request. Every other gate is a waiting       │
//! │  state, never an error.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_core::{Cart, MenuBundle, Schedule};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cart_store::CartStore;
use crate::error::{ClientError, ClientResult};
use crate::persistence::SharedCartIdStore;
use crate::resource::{ApiResourceClient, ResourceOptions, ResourceSnapshot, ResourceState, UseApiResource};
use crate::scope::ComponentScope;
use crate::transport::encode_path_segment;

// =============================================================================
// Paths
// =============================================================================

/// Cart url. The opaque id is percent-encoded as one path segment.
pub fn cart_path(cart_id: &str) -> String {
    format!("/api/v1/carts/{}", encode_path_segment(cart_id))
}

/// Menu url for a location and schedule. Date and time are embedded as is.
///
/// Returns [`ClientError::NotReady`] while either value is missing or empty.
pub fn menu_path(location_id: &str, order_date: Option<&str>, order_time: Option<&str>) -> ClientResult<String> {
    let order_date = order_date
        .filter(|d| !d.is_empty())
        .ok_or(ClientError::NotReady { missing: "orderDate" })?;
    let order_time = order_time
        .filter(|t| !t.is_empty())
        .ok_or(ClientError::NotReady { missing: "orderTime" })?;

    Ok(schedule_path(
        location_id,
        &Schedule {
            order_date: order_date.to_string(),
            order_time: order_time.to_string(),
        },
    ))
}

fn schedule_path(location_id: &str, schedule: &Schedule) -> String {
    format!(
        "/api/v1/locations/{}/menus?orderDate={}&orderTime={}",
        location_id, schedule.order_date, schedule.order_time
    )
}

// =============================================================================
// Gate
// =============================================================================

/// Why the menu request is (not) allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MenuGate {
    #[default]
    Disabled,
    NoCart,
    LoadingCart,
    MissingSchedule,
    Ready(Schedule),
}

impl MenuGate {
    pub fn should_fetch(&self) -> bool {
        matches!(self, MenuGate::Ready(_))
    }
}

// =============================================================================
// Fetcher
// =============================================================================

/// Builds menu hooks sharing one resource cache.
#[derive(Clone)]
pub struct MenuFetcher {
    resources: ApiResourceClient,
    cart_store: CartStore,
    cart_ids: SharedCartIdStore,
}

impl MenuFetcher {
    pub fn new(resources: ApiResourceClient, cart_store: CartStore, cart_ids: SharedCartIdStore) -> Self {
        MenuFetcher {
            resources,
            cart_store,
            cart_ids,
        }
    }

    pub fn use_menus(&self, scope: &ComponentScope, location_id: impl Into<String>, is_enabled: bool) -> UseMenus {
        let (gate, _rx) = watch::channel(MenuGate::default());
        UseMenus {
            location_id: location_id.into(),
            is_enabled,
            cart_store: self.cart_store.clone(),
            cart_ids: self.cart_ids.clone(),
            cart: self.resources.use_resource::<Cart>(scope),
            menus: self.resources.use_resource::<MenuBundle>(scope),
            gate,
        }
    }
}

/// Menu hook of one component.
pub struct UseMenus {
    location_id: String,
    is_enabled: bool,
    cart_store: CartStore,
    cart_ids: SharedCartIdStore,
    cart: UseApiResource<Cart>,
    menus: UseApiResource<MenuBundle>,
    gate: watch::Sender<MenuGate>,
}

impl UseMenus {
    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    pub fn set_enabled(&mut self, is_enabled: bool) {
        self.is_enabled = is_enabled;
    }

    fn resolve_cart_id(&self) -> Option<String> {
        let persisted = match self.cart_ids.load(&self.location_id) {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(e) => {
                warn!(location_id = %self.location_id, error = %e, "Could not read persisted cart id");
                None
            }
        };
        persisted.or_else(|| self.cart_store.current_cart_id())
    }

    /// Re-evaluates the gate and fetches when it opens.
    pub async fn refresh(&self) -> MenuGate {
        let gate = self.evaluate().await;

        if let MenuGate::Ready(schedule) = &gate {
            let url = schedule_path(&self.location_id, schedule);
            self.menus.update(Some(url.as_str()), ResourceOptions::gated(true)).await;
        } else {
            debug!(location_id = %self.location_id, ?gate, "Menu request gated");
            self.menus.update(None, ResourceOptions::gated(false)).await;
        }

        self.gate.send_replace(gate.clone());
        gate
    }

    async fn evaluate(&self) -> MenuGate {
        if !self.is_enabled {
            self.cart.update(None, ResourceOptions::gated(false)).await;
            return MenuGate::Disabled;
        }

        let Some(cart_id) = self.resolve_cart_id() else {
            self.cart.update(None, ResourceOptions::gated(false)).await;
            return MenuGate::NoCart;
        };

        let url = cart_path(&cart_id);
        let cart = self.cart.update(Some(url.as_str()), ResourceOptions::gated(true)).await;

        match cart.data.filter(|c| c.id == cart_id) {
            None => MenuGate::LoadingCart,
            Some(cart) => match cart.schedule() {
                Some(schedule) => MenuGate::Ready(schedule),
                None => MenuGate::MissingSchedule,
            },
        }
    }

    /// Reloads the cart (schedule may have changed) and the menus.
    pub async fn revalidate(&self) -> MenuGate {
        self.cart.revalidate().await;
        self.refresh().await
    }

    pub fn gate(&self) -> MenuGate {
        self.gate.borrow().clone()
    }

    pub fn subscribe_gate(&self) -> watch::Receiver<MenuGate> {
        self.gate.subscribe()
    }

    /// Menu data with loading and error state.
    ///
    /// Cart failures surface here too, since they block the menus.
    pub fn snapshot(&self) -> ResourceSnapshot<MenuBundle> {
        let mut menus = self.menus.snapshot();
        let cart = self.cart.snapshot();

        menus.is_loading = menus.is_loading || (cart.is_loading && self.gate() == MenuGate::LoadingCart);
        if menus.error.is_none() && cart.state == ResourceState::Error {
            menus.error = cart.error;
        }
        menus
    }

    /// Cart behind the menus, as last fetched.
    pub fn cart(&self) -> Option<Cart> {
        self.cart.snapshot().data
    }
}

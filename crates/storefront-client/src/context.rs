//! # Storefront Context
//!
//! Wires the sync layer together once per storefront instance.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StorefrontContext                                 │
//! │                                                                         │
//! │   ClientConfig ──► HttpFetcher ──┬──► OrderingSessionManager           │
//! │                                  └──► ApiResourceClient ──► MenuFetcher│
//! │                                                                         │
//! │   CartStore    (one per context, shared by sessions and menus)         │
//! │   CartIdStore  (file under the data dir, or memory)                    │
//! │   PriceCalculator (locale + currency of the business)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tests build a context over a mock fetcher with [`StorefrontContext::with_fetcher`].

use storefront_core::PriceCalculator;

use crate::cart_store::CartStore;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::menu::{MenuFetcher, UseMenus};
use crate::persistence::{open_cart_id_store, SharedCartIdStore};
use crate::resource::ApiResourceClient;
use crate::scope::ComponentScope;
use crate::session::{OrderingSessionManager, UseOrderingSession};
use crate::transport::{HttpFetcher, SharedFetcher};

#[derive(Clone)]
pub struct StorefrontContext {
    pub cart_store: CartStore,
    pub cart_ids: SharedCartIdStore,
    pub resources: ApiResourceClient,
    pub sessions: OrderingSessionManager,
    pub menus: MenuFetcher,
    pub prices: PriceCalculator,
}

impl StorefrontContext {
    /// Production wiring: HTTP transport and file-backed cart ids.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let cart_ids = open_cart_id_store(&config);
        let fetcher = HttpFetcher::shared(config.clone())?;
        Self::with_fetcher(fetcher, &config, cart_ids)
    }

    pub fn with_fetcher(fetcher: SharedFetcher, config: &ClientConfig, cart_ids: SharedCartIdStore) -> ClientResult<Self> {
        let cart_store = CartStore::new();
        let resources = ApiResourceClient::new(fetcher.clone(), config.cache.clone());
        let business = config.business()?;

        Ok(StorefrontContext {
            menus: MenuFetcher::new(resources.clone(), cart_store.clone(), cart_ids.clone()),
            sessions: OrderingSessionManager::new(fetcher),
            prices: PriceCalculator::new(&business),
            cart_store,
            cart_ids,
            resources,
        })
    }

    pub fn use_ordering_session(&self, scope: &ComponentScope) -> UseOrderingSession {
        self.sessions
            .use_ordering_session(scope, self.cart_store.clone(), self.cart_ids.clone())
    }

    pub fn use_menus(&self, scope: &ComponentScope, location_id: impl Into<String>, is_enabled: bool) -> UseMenus {
        self.menus.use_menus(scope, location_id, is_enabled)
    }
}

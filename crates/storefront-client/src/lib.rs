//! # storefront-client: Ordering Sessions and Cart Sync
//!
//! This crate keeps a storefront's local cart state consistent with the
//! commerce API: it opens ordering sessions, remembers cart ids, and loads
//! menus once the cart knows when the order is for.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Sync Architecture                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │          ComponentScope (one per mounted UI component)           │  │
//! │  └───────────────┬──────────────────────────────┬───────────────────┘  │
//! │                  ▼                              ▼                      │
//! │  ┌───────────────────────────┐   ┌──────────────────────────────────┐ │
//! │  │    UseOrderingSession     │   │            UseMenus              │ │
//! │  │                           │   │                                  │ │
//! │  │ POST ordering-sessions    │   │ cart id ─► GET cart ─► schedule  │ │
//! │  │ persist id ─► CartStore   │   │ ─► GET menus (gated)             │ │
//! │  └─────────────┬─────────────┘   └────────────────┬─────────────────┘ │
//! │                │          ┌──────────────┐        │                    │
//! │                ├─────────►│  CartStore   │◄───────┤                    │
//! │                │          │ {cartId,     │        │                    │
//! │                │          │  isLoading}  │        ▼                    │
//! │                │          └──────────────┘ ┌─────────────────────┐    │
//! │                │                            │ ApiResourceClient   │    │
//! │                │                            │ SWR cache + dedupe  │    │
//! │                │                            └──────────┬──────────┘    │
//! │                └───────────────┬───────────────────────┘               │
//! │                                ▼                                        │
//! │                  ┌──────────────────────────┐                          │
//! │                  │  Fetcher (reqwest/mock)  │──► Commerce REST API     │
//! │                  └──────────────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Client configuration (API, cache policy, business, storage)
//! - [`error`] - `ClientError` taxonomy and the normalized `ApiError`
//! - [`transport`] - `Fetcher` trait and the reqwest `HttpFetcher`
//! - [`resource`] - `ApiResourceClient` cache and `UseApiResource` hooks
//! - [`cart_store`] - `CartStore`, the shared `{cartId, isLoading}` register
//! - [`persistence`] - Location → cart id storage
//! - [`session`] - `OrderingSessionManager` and `UseOrderingSession`
//! - [`menu`] - `MenuFetcher`, `UseMenus` and the schedule gate
//! - [`scope`] - Component lifecycle guard
//! - [`context`] - One-stop wiring of all of the above
//! - [`mock`] - In-memory fetchers for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_client::{ClientConfig, ComponentScope, StartSessionOptions, StorefrontContext};
//!
//! let ctx = StorefrontContext::from_config(ClientConfig::load_or_default(None))?;
//! let scope = ComponentScope::new("location-page");
//!
//! let session = ctx.use_ordering_session(&scope);
//! session.start("L1", StartSessionOptions::default()).await;
//!
//! let menus = ctx.use_menus(&scope, "L1", true);
//! let gate = menus.refresh().await;
//! println!("menu gate: {:?}", gate);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_store;
pub mod config;
pub mod context;
pub mod error;
pub mod menu;
pub mod mock;
pub mod persistence;
pub mod resource;
pub mod scope;
pub mod session;
pub mod transport;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart_store::{CartStore, CartStoreState};
pub use config::{ApiCredentials, AuthScheme, CacheSettings, ClientConfig};
pub use context::StorefrontContext;
pub use error::{ApiError, ClientError, ClientResult, ErrorKind};
pub use menu::{cart_path, menu_path, MenuFetcher, MenuGate, UseMenus};
pub use persistence::{CartIdStore, FileCartIdStore, MemoryCartIdStore, SharedCartIdStore};
pub use resource::{ApiResourceClient, ResourceOptions, ResourceSnapshot, ResourceState, UseApiResource};
pub use scope::ComponentScope;
pub use session::{OrderingSessionManager, SessionState, StartSessionOptions, UseOrderingSession};
pub use transport::{Fetcher, HttpFetcher, SharedFetcher};

//! # Storefront Products Proxy
//!
//! Server-side guard for the commerce API key. The browser calls this proxy;
//! the proxy attaches the key and forwards to the commerce API, passing the
//! upstream status and `{message}` body back unchanged.

pub mod config;
pub mod error;
pub mod routes;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use routes::{router, ProxyState};

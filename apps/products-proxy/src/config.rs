//! Products proxy configuration.
//!
//! Listener settings come from `PROXY_BIND_ADDR` / `PROXY_PORT`; everything
//! about the commerce API is the shared [`ClientConfig`] (file + `STOREFRONT_*`
//! environment). The API key is optional at startup: requests without it are
//! answered with a configuration error instead.

use std::env;

use storefront_client::ClientConfig;
use tracing::warn;

use crate::error::ProxyError;

pub const ENV_PORT: &str = "PROXY_PORT";
pub const ENV_BIND_ADDR: &str = "PROXY_BIND_ADDR";

/// Products proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Interface to listen on.
    pub bind_addr: String,

    /// HTTP port.
    pub port: u16,

    /// Commerce API settings shared with the storefront client.
    pub client: ClientConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        ProxyConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            client: ClientConfig::default(),
        }
    }
}

impl ProxyConfig {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ProxyError> {
        let client = ClientConfig::load(None).map_err(|e| ProxyError::Config(e.to_string()))?;

        let port = match env::var(ENV_PORT) {
            Ok(port) => port
                .parse()
                .map_err(|_| ProxyError::Config(format!("Invalid value for {}", ENV_PORT)))?,
            Err(_) => 8080,
        };

        let config = ProxyConfig {
            bind_addr: env::var(ENV_BIND_ADDR).unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            client,
        };

        if config.client.credentials().is_err() {
            warn!("Commerce API credentials incomplete; product requests will fail until they are set");
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_address() {
        let config = ProxyConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.client.api.api_key.is_none());
    }
}

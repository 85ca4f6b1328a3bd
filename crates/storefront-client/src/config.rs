//! # Client Configuration
//!
//! Configuration management for the storefront client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_API_BASE_URL=https://api.example.com                    │
//! │     STOREFRONT_API_KEY=sk_live_...                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.client/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no base URL, no key, en-US / USD, SWR cache defaults               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://commerce.example.com"
//! auth_scheme = "api_key_header"   # api_key_header | bearer
//! request_timeout_secs = 15
//!
//! [cache]
//! dedupe_interval_ms = 2000
//! revalidate_if_stale = true
//! revalidate_on_focus = false
//! revalidate_on_reconnect = false
//! keep_previous_data = true
//! max_age_ms = 300000
//! max_entries = 256
//!
//! [business]
//! locale = "en-US"
//! currency = "USD"
//!
//! [storage]
//! cart_store_path = "/var/lib/storefront/cart-ids.json"
//! ```
//!
//! The API key is never read from the file by convention; set it through
//! the environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_core::BusinessConfig;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Environment Keys
// =============================================================================

pub const ENV_API_BASE_URL: &str = "STOREFRONT_API_BASE_URL";
pub const ENV_API_KEY: &str = "STOREFRONT_API_KEY";
pub const ENV_AUTH_SCHEME: &str = "STOREFRONT_AUTH_SCHEME";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";
pub const ENV_LOCALE: &str = "STOREFRONT_LOCALE";
pub const ENV_CURRENCY: &str = "STOREFRONT_CURRENCY";
pub const ENV_CART_STORE_PATH: &str = "STOREFRONT_CART_STORE_PATH";

// =============================================================================
// Auth Scheme
// =============================================================================

/// How the API key travels to the commerce API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `x-api-key: <key>`
    #[default]
    ApiKeyHeader,

    /// `Authorization: Bearer <key>`
    Bearer,
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScheme::ApiKeyHeader => write!(f, "api_key_header"),
            AuthScheme::Bearer => write!(f, "bearer"),
        }
    }
}

impl std::str::FromStr for AuthScheme {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "api_key_header" | "api-key" | "x-api-key" | "header" => Ok(AuthScheme::ApiKeyHeader),
            "bearer" => Ok(AuthScheme::Bearer),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown auth scheme: '{}'. Valid options: api_key_header, bearer",
                other
            ))),
        }
    }
}

// =============================================================================
// API Settings
// =============================================================================

/// Where and how to reach the commerce API.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// Per-request timeout (seconds). Not a retry policy.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: None,
            api_key: None,
            auth_scheme: AuthScheme::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("auth_scheme", &self.auth_scheme)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Validated credentials, only obtainable when both URL and key are set.
#[derive(Clone)]
pub struct ApiCredentials {
    pub base_url: Url,
    pub api_key: String,
    pub auth_scheme: AuthScheme,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("auth_scheme", &self.auth_scheme)
            .finish()
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Stale-while-revalidate policy of the resource cache.
///
/// ## Policy
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  age < dedupe_interval        → serve cache, no request                │
/// │  age ≥ dedupe_interval        → serve cache, revalidate in background  │
/// │                                 (only if revalidate_if_stale)          │
/// │  window focus / reconnect     → ignored unless the flags are enabled   │
/// │  url changes while loading    → previous data stays visible            │
/// │                                 (keep_previous_data)                   │
/// │  age ≥ max_age                → evicted on the next insert             │
/// │  more than max_entries        → oldest entries evicted on insert       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_dedupe_interval")]
    pub dedupe_interval_ms: u64,

    #[serde(default = "default_true")]
    pub revalidate_if_stale: bool,

    #[serde(default)]
    pub revalidate_on_focus: bool,

    #[serde(default)]
    pub revalidate_on_reconnect: bool,

    #[serde(default = "default_true")]
    pub keep_previous_data: bool,

    /// Entries older than this are dropped when the cache is written.
    #[serde(default = "default_max_age")]
    pub max_age_ms: u64,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_age() -> u64 {
    300_000
}

fn default_max_entries() -> usize {
    256
}

fn default_dedupe_interval() -> u64 {
    2_000
}

fn default_true() -> bool {
    true
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            dedupe_interval_ms: default_dedupe_interval(),
            revalidate_if_stale: true,
            revalidate_on_focus: false,
            revalidate_on_reconnect: false,
            keep_previous_data: true,
            max_age_ms: default_max_age(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheSettings {
    pub fn dedupe_interval(&self) -> Duration {
        Duration::from_millis(self.dedupe_interval_ms)
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }
}

// =============================================================================
// Business & Storage Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSettings {
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for BusinessSettings {
    fn default() -> Self {
        BusinessSettings {
            locale: default_locale(),
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// JSON file holding the cart id per location.
    /// Defaults to `cart-ids.json` in the platform data dir.
    #[serde(default)]
    pub cart_store_path: Option<PathBuf>,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub business: BusinessSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Validates the configuration.
    ///
    /// Missing URL or key is *not* a validation failure here: a storefront
    /// can render cached state without them. [`credentials`](Self::credentials)
    /// enforces them at the point of a network call.
    pub fn validate(&self) -> ClientResult<()> {
        if let Some(ref url) = self.api.base_url {
            let parsed = Url::parse(url)?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ClientError::InvalidUrl(format!(
                    "API base URL must start with http:// or https://, got: {}",
                    url
                )));
            }
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.cache.max_entries == 0 {
            return Err(ClientError::InvalidConfig("cache.max_entries must be greater than 0".into()));
        }
        if self.cache.max_age_ms < self.cache.dedupe_interval_ms {
            return Err(ClientError::InvalidConfig(
                "cache.max_age_ms must not be shorter than cache.dedupe_interval_ms".into(),
            ));
        }

        self.business()?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a key lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = Some(url);
        }

        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            debug!("API key provided by environment");
            self.api.api_key = Some(key);
        }

        if let Some(scheme) = lookup(ENV_AUTH_SCHEME) {
            match scheme.parse() {
                Ok(parsed) => self.api.auth_scheme = parsed,
                Err(e) => warn!(scheme = %scheme, "Ignoring auth scheme override: {}", e),
            }
        }

        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => warn!(timeout = %timeout, "Ignoring non-numeric request timeout"),
            }
        }

        if let Some(locale) = lookup(ENV_LOCALE) {
            self.business.locale = locale;
        }

        if let Some(currency) = lookup(ENV_CURRENCY) {
            self.business.currency = currency;
        }

        if let Some(path) = lookup(ENV_CART_STORE_PATH) {
            self.storage.cart_store_path = Some(PathBuf::from(path));
        }
    }

    /// Returns credentials for a network call, failing fast when the URL or
    /// key is missing.
    pub fn credentials(&self) -> ClientResult<ApiCredentials> {
        let base_url = match self.api.base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Url::parse(url)?,
            _ => {
                error!("Commerce API base URL is not configured; refusing to send request");
                return Err(ClientError::MissingBaseUrl);
            }
        };

        let api_key = match self.api.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => {
                error!("Commerce API key is not configured; refusing to send unauthenticated request");
                return Err(ClientError::MissingApiKey);
            }
        };

        Ok(ApiCredentials {
            base_url,
            api_key,
            auth_scheme: self.api.auth_scheme,
        })
    }

    /// Locale/currency rules for price formatting.
    pub fn business(&self) -> ClientResult<BusinessConfig> {
        BusinessConfig::new(&self.business.locale, &self.business.currency)
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Path of the persisted cart-id map, if one can be determined.
    pub fn cart_store_path(&self) -> Option<PathBuf> {
        self.storage.cart_store_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "storefront", "client")
                .map(|dirs| dirs.data_dir().join("cart-ids.json"))
        })
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "client")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn with_env(vars: &[(&str, &str)]) -> ClientConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = ClientConfig::default();
        config.apply_overrides_from(|key| map.get(key).cloned());
        config
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.api.base_url.is_none());
        assert_eq!(config.cache.dedupe_interval(), Duration::from_secs(2));
        assert!(config.cache.revalidate_if_stale);
        assert!(!config.cache.revalidate_on_focus);
        assert!(!config.cache.revalidate_on_reconnect);
        assert!(config.cache.keep_previous_data);
        assert_eq!(config.cache.max_age(), Duration::from_secs(300));
        assert_eq!(config.cache.max_entries, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let config = with_env(&[(ENV_API_BASE_URL, "https://api.example.com")]);
        assert!(matches!(config.credentials(), Err(ClientError::MissingApiKey)));

        let config = with_env(&[(ENV_API_KEY, "secret")]);
        assert!(matches!(config.credentials(), Err(ClientError::MissingBaseUrl)));

        let config = with_env(&[(ENV_API_BASE_URL, "https://api.example.com"), (ENV_API_KEY, "  ")]);
        assert!(matches!(config.credentials(), Err(ClientError::MissingApiKey)));
    }

    #[test]
    fn test_env_overrides() {
        let config = with_env(&[
            (ENV_API_BASE_URL, "https://api.example.com"),
            (ENV_API_KEY, "secret"),
            (ENV_AUTH_SCHEME, "bearer"),
            (ENV_REQUEST_TIMEOUT_SECS, "30"),
            (ENV_LOCALE, "de-DE"),
            (ENV_CURRENCY, "EUR"),
        ]);

        let creds = config.credentials().unwrap();
        assert_eq!(creds.base_url.as_str(), "https://api.example.com/");
        assert_eq!(creds.api_key, "secret");
        assert_eq!(creds.auth_scheme, AuthScheme::Bearer);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.business().unwrap().currency_code, "EUR");
    }

    #[test]
    fn test_validation() {
        let mut config = ClientConfig::default();
        config.api.base_url = Some("ftp://api.example.com".into());
        assert!(config.validate().is_err());

        config.api.base_url = Some("https://api.example.com".into());
        assert!(config.validate().is_ok());

        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.request_timeout_secs = 5;
        config.cache.max_entries = 0;
        assert!(config.validate().is_err());

        config.cache.max_entries = 10;
        config.cache.max_age_ms = 1_000;
        assert!(config.validate().is_err());

        config.cache.max_age_ms = 60_000;
        assert!(config.validate().is_ok());

        config.business.currency = "EURO".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_parsing_and_key_never_serialized() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"
            api_key = "from-file"

            [cache]
            dedupe_interval_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.cache.dedupe_interval_ms, 500);
        assert!(config.cache.keep_previous_data);

        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("[api]"));
        assert!(!rendered.contains("from-file"));
        assert!(!format!("{:?}", config).contains("from-file"));
    }

    #[test]
    fn test_auth_scheme_parsing() {
        assert_eq!("bearer".parse::<AuthScheme>().unwrap(), AuthScheme::Bearer);
        assert_eq!("x-api-key".parse::<AuthScheme>().unwrap(), AuthScheme::ApiKeyHeader);
        assert!("basic".parse::<AuthScheme>().is_err());
    }
}

//! # API Resource Client
//!
//! Stale-while-revalidate cache plus the gated fetch state machine used by
//! every data hook.
//!
//! ## Hook State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ResourceState transitions                         │
//! │                                                                         │
//! │   Idle ──update(should_fetch=false | no url)──► WaitingForPreconditions│
//! │    │                                                     │              │
//! │    └──────────update(url, should_fetch=true)─────────────┤              │
//! │                                                          ▼              │
//! │                    fresh cache hit ─────────────────► Success           │
//! │                    stale cache hit ──► Success + background revalidate  │
//! │                    miss ──► Fetching ──► Success | Error                │
//! │                                                                         │
//! │   `data` survives every transition (keep previous data).              │
//! │   Same url again ──► no request.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shared Cache
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ApiResourceClient (cloned into every hook)                            │
//! │                                                                         │
//! │   cache:     url ──► { json, fetched_at }   (max_age, max_entries)     │
//! │   in_flight: url ──► Shared<future>   (concurrent callers join it)     │
//! │   hooks:     Weak<hook>               (focus / reconnect fan-out)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

use crate::config::CacheSettings;
use crate::error::{ApiError, ClientError};
use crate::scope::{ComponentScope, ScopeToken};
use crate::transport::SharedFetcher;

type InFlight = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Hook State
// =============================================================================

/// Where a hook is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    /// Never updated.
    #[default]
    Idle,

    /// No url yet, or the caller's preconditions are unmet.
    WaitingForPreconditions,

    Fetching,

    Success,

    Error,
}

/// What a component renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
    pub state: ResourceState,
}

impl<T> Default for ResourceSnapshot<T> {
    fn default() -> Self {
        ResourceSnapshot {
            data: None,
            is_loading: false,
            error: None,
            state: ResourceState::Idle,
        }
    }
}

/// Per-update fetch options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceOptions {
    pub should_fetch: bool,
}

impl ResourceOptions {
    pub fn gated(should_fetch: bool) -> Self {
        ResourceOptions { should_fetch }
    }
}

impl Default for ResourceOptions {
    fn default() -> Self {
        ResourceOptions { should_fetch: true }
    }
}

// =============================================================================
// Cache
// =============================================================================

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    fetched_at: Instant,
}

/// Result of a cache lookup against the dedupe interval.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Fresh(Value),
    Stale(Value),
    Miss,
}

/// Fan-out target for focus/reconnect revalidation.
trait Revalidate: Send + Sync {
    fn revalidate_in_background(self: Arc<Self>);
}

struct ClientShared {
    fetcher: SharedFetcher,
    settings: CacheSettings,
    cache: Mutex<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, InFlight>>,
    hooks: Mutex<Vec<Weak<dyn Revalidate>>>,
}

impl ClientShared {
    /// Writes an entry, then evicts entries past `max_age` and the oldest
    /// ones beyond `max_entries`.
    fn store(&self, url: &str, data: Value) {
        let now = Instant::now();
        let max_age = self.settings.max_age();
        let max_entries = self.settings.max_entries.max(1);

        let mut cache = guard(&self.cache);
        let mut evicted = 0usize;
        cache.retain(|key, entry| {
            let keep = key == url || now.duration_since(entry.fetched_at) < max_age;
            if !keep {
                evicted += 1;
            }
            keep
        });
        cache.insert(url.to_string(), CacheEntry { data, fetched_at: now });

        while cache.len() > max_entries {
            let oldest = cache
                .iter()
                .filter(|(key, _)| key.as_str() != url)
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    cache.remove(&key);
                    evicted += 1;
                }
                None => break,
            }
        }

        if evicted > 0 {
            debug!(evicted, entries = cache.len(), "Evicted cache entries");
        }
    }
}

/// Shared request cache. Clones share one cache.
#[derive(Clone)]
pub struct ApiResourceClient {
    shared: Arc<ClientShared>,
}

impl ApiResourceClient {
    pub fn new(fetcher: SharedFetcher, settings: CacheSettings) -> Self {
        ApiResourceClient {
            shared: Arc::new(ClientShared {
                fetcher,
                settings,
                cache: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                hooks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.shared.settings
    }

    /// Creates a hook bound to `scope`.
    pub fn use_resource<T>(&self, scope: &ComponentScope) -> UseApiResource<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let (state, _rx) = watch::channel(ResourceSnapshot::default());
        let inner = Arc::new(HookInner {
            client: self.clone(),
            scope: scope.token(),
            state,
            target: Mutex::new(Target::default()),
        });

        let as_revalidate: Arc<dyn Revalidate> = inner.clone();
        let mut hooks = guard(&self.shared.hooks);
        hooks.retain(|hook| hook.strong_count() > 0);
        hooks.push(Arc::downgrade(&as_revalidate));

        UseApiResource { inner }
    }

    /// Fetches `url`, joining a request already in flight for it.
    ///
    /// Successful responses are written to the cache; failures leave the
    /// cache untouched.
    pub async fn fetch(&self, url: &str) -> Result<Value, ApiError> {
        let request = {
            let mut in_flight = guard(&self.shared.in_flight);
            match in_flight.get(url) {
                Some(existing) => {
                    debug!(url, "Joining in-flight request");
                    existing.clone()
                }
                None => {
                    let request = self.start_request(url);
                    in_flight.insert(url.to_string(), request.clone());
                    request
                }
            }
        };
        request.await
    }

    fn start_request(&self, url: &str) -> InFlight {
        let fetcher = self.shared.fetcher.clone();
        let weak = Arc::downgrade(&self.shared);
        let key = url.to_string();

        async move {
            debug!(url = %key, "Cache miss; requesting");
            let result = fetcher.get(&key).await.map_err(ApiError::from);

            if let Some(shared) = weak.upgrade() {
                if let Ok(data) = &result {
                    shared.store(&key, data.clone());
                }
                guard(&shared.in_flight).remove(&key);
            }
            result
        }
        .boxed()
        .shared()
    }

    pub fn lookup(&self, url: &str) -> CacheLookup {
        let settings = &self.shared.settings;
        match guard(&self.shared.cache).get(url) {
            Some(entry) if entry.fetched_at.elapsed() < settings.dedupe_interval() => {
                CacheLookup::Fresh(entry.data.clone())
            }
            Some(entry) if entry.fetched_at.elapsed() < settings.max_age() => {
                CacheLookup::Stale(entry.data.clone())
            }
            _ => CacheLookup::Miss,
        }
    }

    /// Cached JSON for `url`, fresh or stale.
    pub fn cached(&self, url: &str) -> Option<Value> {
        guard(&self.shared.cache).get(url).map(|entry| entry.data.clone())
    }

    /// Drops one cache entry. Returns whether it existed.
    pub fn invalidate(&self, url: &str) -> bool {
        guard(&self.shared.cache).remove(url).is_some()
    }

    pub fn clear(&self) {
        guard(&self.shared.cache).clear();
    }

    /// Window regained focus. Returns the number of hooks revalidated.
    pub fn on_focus(&self) -> usize {
        if !self.shared.settings.revalidate_on_focus {
            debug!("Focus revalidation disabled");
            return 0;
        }
        self.revalidate_hooks()
    }

    /// Network came back. Returns the number of hooks revalidated.
    pub fn on_reconnect(&self) -> usize {
        if !self.shared.settings.revalidate_on_reconnect {
            debug!("Reconnect revalidation disabled");
            return 0;
        }
        self.revalidate_hooks()
    }

    fn revalidate_hooks(&self) -> usize {
        let live: Vec<Arc<dyn Revalidate>> = {
            let mut hooks = guard(&self.shared.hooks);
            hooks.retain(|hook| hook.strong_count() > 0);
            hooks.iter().filter_map(Weak::upgrade).collect()
        };
        let count = live.len();
        for hook in live {
            hook.revalidate_in_background();
        }
        count
    }
}

// =============================================================================
// Hook
// =============================================================================

#[derive(Debug, Default)]
struct Target {
    url: Option<String>,
    should_fetch: bool,
    generation: u64,
}

enum Decision {
    Wait,
    Unchanged,
    Load { url: String, generation: u64 },
}

struct HookInner<T> {
    client: ApiResourceClient,
    scope: ScopeToken,
    state: watch::Sender<ResourceSnapshot<T>>,
    target: Mutex<Target>,
}

impl<T> HookInner<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn snapshot(&self) -> ResourceSnapshot<T> {
        self.state.borrow().clone()
    }

    fn publish(&self, modify: impl FnOnce(&mut ResourceSnapshot<T>)) -> bool {
        if !self.scope.is_mounted() {
            debug!(scope = %self.scope.name(), "Scope unmounted; skipping state write");
            return false;
        }
        self.state.send_modify(modify);
        true
    }

    fn decide(&self, url: Option<String>, options: ResourceOptions) -> Decision {
        let mut target = guard(&self.target);
        match url {
            Some(url) if options.should_fetch => {
                if target.should_fetch && target.url.as_deref() == Some(url.as_str()) {
                    return Decision::Unchanged;
                }
                target.url = Some(url.clone());
                target.should_fetch = true;
                target.generation += 1;
                Decision::Load {
                    url,
                    generation: target.generation,
                }
            }
            url => {
                if target.should_fetch || target.url != url {
                    target.generation += 1;
                }
                target.url = url;
                target.should_fetch = false;
                Decision::Wait
            }
        }
    }

    async fn update(self: &Arc<Self>, url: Option<String>, options: ResourceOptions) -> ResourceSnapshot<T> {
        let (url, generation) = match self.decide(url, options) {
            Decision::Wait => {
                self.publish(|s| {
                    s.state = ResourceState::WaitingForPreconditions;
                    s.is_loading = false;
                });
                return self.snapshot();
            }
            Decision::Unchanged => return self.snapshot(),
            Decision::Load { url, generation } => (url, generation),
        };

        match self.client.lookup(&url) {
            CacheLookup::Fresh(data) => {
                debug!(url = %url, "Fresh cache hit");
                self.apply(generation, Ok(data));
            }
            CacheLookup::Stale(data) => {
                debug!(url = %url, "Stale cache hit");
                self.apply(generation, Ok(data));
                if self.client.settings().revalidate_if_stale {
                    let this = self.clone();
                    tokio::spawn(async move {
                        let result = this.client.fetch(&url).await;
                        this.apply(generation, result);
                    });
                }
            }
            CacheLookup::Miss => {
                let keep_previous = self.client.settings().keep_previous_data;
                self.publish(|s| {
                    s.state = ResourceState::Fetching;
                    s.is_loading = true;
                    if !keep_previous {
                        s.data = None;
                    }
                });
                let result = self.client.fetch(&url).await;
                self.apply(generation, result);
            }
        }
        self.snapshot()
    }

    async fn revalidate(self: &Arc<Self>) -> ResourceSnapshot<T> {
        let current = {
            let target = guard(&self.target);
            match (&target.url, target.should_fetch) {
                (Some(url), true) => Some((url.clone(), target.generation)),
                _ => None,
            }
        };
        let Some((url, generation)) = current else {
            return self.snapshot();
        };

        self.publish(|s| {
            s.state = ResourceState::Fetching;
            s.is_loading = true;
        });
        let result = self.client.fetch(&url).await;
        self.apply(generation, result);
        self.snapshot()
    }

    /// Writes a fetch result unless the scope is gone or the url moved on.
    fn apply(&self, generation: u64, result: Result<Value, ApiError>) -> bool {
        if guard(&self.target).generation != generation {
            debug!("Dropping result for a superseded url");
            return false;
        }

        let decoded = result.and_then(|value| {
            serde_json::from_value::<T>(value).map_err(|e| ApiError::from(ClientError::from(e)))
        });

        self.publish(move |s| {
            match decoded {
                Ok(data) => {
                    s.data = Some(data);
                    s.error = None;
                    s.state = ResourceState::Success;
                }
                Err(error) => {
                    s.error = Some(error);
                    s.state = ResourceState::Error;
                }
            }
            s.is_loading = false;
        })
    }
}

impl<T> Revalidate for HookInner<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn revalidate_in_background(self: Arc<Self>) {
        tokio::spawn(async move {
            self.revalidate().await;
        });
    }
}

/// Data hook over one url at a time.
pub struct UseApiResource<T> {
    inner: Arc<HookInner<T>>,
}

impl<T> Clone for UseApiResource<T> {
    fn clone(&self) -> Self {
        UseApiResource {
            inner: self.inner.clone(),
        }
    }
}

impl<T> UseApiResource<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Points the hook at `url` and settles: returns once any request this
    /// update issued has completed.
    pub async fn update(&self, url: Option<&str>, options: ResourceOptions) -> ResourceSnapshot<T> {
        let url = url.filter(|u| !u.is_empty()).map(str::to_string);
        self.inner.update(url, options).await
    }

    /// Re-issues the current url (user-triggered retry). No-op while gated.
    pub async fn revalidate(&self) -> ResourceSnapshot<T> {
        self.inner.revalidate().await
    }

    pub fn snapshot(&self) -> ResourceSnapshot<T> {
        self.inner.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceSnapshot<T>> {
        self.inner.state.subscribe()
    }

    /// Url of the last update, if any.
    pub fn url(&self) -> Option<String> {
        guard(&self.inner.target).url.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::mock::MockFetcher;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        name: String,
    }

    fn client(mock: &MockFetcher) -> ApiResourceClient {
        ApiResourceClient::new(Arc::new(mock.clone()), CacheSettings::default())
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_gated_hook_never_requests() {
        let mock = MockFetcher::new();
        mock.respond_get("/items/1", json!({"name": "latte"}));
        let client = client(&mock);
        let scope = ComponentScope::new("test");
        let hook = client.use_resource::<Item>(&scope);

        assert_eq!(hook.snapshot().state, ResourceState::Idle);

        let snap = hook.update(Some("/items/1"), ResourceOptions::gated(false)).await;
        assert_eq!(snap.state, ResourceState::WaitingForPreconditions);
        assert!(!snap.is_loading);
        assert!(snap.data.is_none());

        let snap = hook.update(None, ResourceOptions::default()).await;
        assert_eq!(snap.state, ResourceState::WaitingForPreconditions);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_once_then_unchanged() {
        let mock = MockFetcher::new();
        mock.respond_get("/items/1", json!({"name": "latte"}));
        let client = client(&mock);
        let scope = ComponentScope::new("test");
        let hook = client.use_resource::<Item>(&scope);

        let snap = hook.update(Some("/items/1"), ResourceOptions::default()).await;
        assert_eq!(snap.state, ResourceState::Success);
        assert_eq!(snap.data.unwrap().name, "latte");

        hook.update(Some("/items/1"), ResourceOptions::default()).await;
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_hit_is_served_without_request() {
        let mock = MockFetcher::new();
        mock.respond_get("/items/1", json!({"name": "latte"}));
        let client = client(&mock);
        let scope = ComponentScope::new("test");

        client.use_resource::<Item>(&scope).update(Some("/items/1"), ResourceOptions::default()).await;
        let other = client.use_resource::<Item>(&scope);
        let snap = other.update(Some("/items/1"), ResourceOptions::default()).await;

        assert_eq!(snap.data.unwrap().name, "latte");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_hit_served_and_revalidated() {
        let mock = MockFetcher::new();
        mock.respond_get("/items/1", json!({"name": "latte"}));
        let client = client(&mock);
        let scope = ComponentScope::new("test");

        client.use_resource::<Item>(&scope).update(Some("/items/1"), ResourceOptions::default()).await;
        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(matches!(client.lookup("/items/1"), CacheLookup::Stale(_)));

        mock.respond_get("/items/1", json!({"name": "mocha"}));
        let other = client.use_resource::<Item>(&scope);
        let snap = other.update(Some("/items/1"), ResourceOptions::default()).await;
        assert_eq!(snap.data.unwrap().name, "latte");

        settle().await;
        assert_eq!(mock.request_count(), 2);
        assert_eq!(other.snapshot().data.unwrap().name, "mocha");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_are_deduplicated() {
        let mock = MockFetcher::new().with_latency(Duration::from_millis(50));
        mock.respond_get("/items/1", json!({"name": "latte"}));
        let client = client(&mock);
        let scope = ComponentScope::new("test");
        let a = client.use_resource::<Item>(&scope);
        let b = client.use_resource::<Item>(&scope);

        let (sa, sb) = tokio::join!(
            a.update(Some("/items/1"), ResourceOptions::default()),
            b.update(Some("/items/1"), ResourceOptions::default()),
        );
        assert_eq!(sa.data, sb.data);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_previous_data_kept_while_fetching_and_on_error() {
        let mock = MockFetcher::new().with_latency(Duration::from_millis(10));
        mock.respond_get("/items/1", json!({"name": "latte"}));
        mock.fail_get("/items/2", ApiError::new("not found").with_status(404));
        let client = client(&mock);
        let scope = ComponentScope::new("test");
        let hook = client.use_resource::<Item>(&scope);

        hook.update(Some("/items/1"), ResourceOptions::default()).await;

        let watcher = hook.clone();
        let (snap, during) = tokio::join!(hook.update(Some("/items/2"), ResourceOptions::default()), async move {
            tokio::task::yield_now().await;
            watcher.snapshot()
        });

        assert!(during.is_loading);
        assert_eq!(during.state, ResourceState::Fetching);
        assert_eq!(during.data.as_ref().unwrap().name, "latte");

        assert_eq!(snap.state, ResourceState::Error);
        assert_eq!(snap.error.as_ref().unwrap().status, Some(404));
        assert_eq!(snap.data.unwrap().name, "latte");
        assert!(client.cached("/items/1").is_some());
        assert!(client.cached("/items/2").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmounted_scope_drops_result() {
        let mock = MockFetcher::new().with_latency(Duration::from_millis(10));
        mock.respond_get("/items/1", json!({"name": "latte"}));
        let client = client(&mock);
        let scope = ComponentScope::new("test");
        let hook = client.use_resource::<Item>(&scope);

        let (snap, _) = tokio::join!(hook.update(Some("/items/1"), ResourceOptions::default()), async {
            scope.unmount();
        });

        assert!(snap.data.is_none());
        assert_eq!(mock.request_count(), 1);
        assert!(client.cached("/items/1").is_some());
    }

    #[tokio::test]
    async fn test_revalidate_reissues_current_url() {
        let mock = MockFetcher::new();
        mock.fail_get("/items/1", ApiError::new("boom").with_status(500));
        let client = client(&mock);
        let scope = ComponentScope::new("test");
        let hook = client.use_resource::<Item>(&scope);

        let snap = hook.update(Some("/items/1"), ResourceOptions::default()).await;
        assert_eq!(snap.state, ResourceState::Error);

        mock.respond_get("/items/1", json!({"name": "latte"}));
        let snap = hook.revalidate().await;
        assert_eq!(snap.state, ResourceState::Success);
        assert!(snap.error.is_none());
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_focus_and_reconnect_follow_settings() {
        let mock = MockFetcher::new();
        mock.respond_get("/items/1", json!({"name": "latte"}));
        let scope = ComponentScope::new("test");

        let quiet = client(&mock);
        let hook = quiet.use_resource::<Item>(&scope);
        hook.update(Some("/items/1"), ResourceOptions::default()).await;
        assert_eq!(quiet.on_focus(), 0);
        assert_eq!(quiet.on_reconnect(), 0);
        settle().await;
        assert_eq!(mock.request_count(), 1);

        let settings = CacheSettings {
            revalidate_on_focus: true,
            ..CacheSettings::default()
        };
        let eager = ApiResourceClient::new(Arc::new(mock.clone()), settings);
        let hook = eager.use_resource::<Item>(&scope);
        hook.update(Some("/items/1"), ResourceOptions::default()).await;
        assert_eq!(eager.on_focus(), 1);
        settle().await;
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_evicts_expired_and_oldest_entries() {
        let mock = MockFetcher::new();
        for path in ["/a", "/b", "/c", "/d"] {
            mock.respond_get(path, json!({"name": path}));
        }
        let settings = CacheSettings {
            max_age_ms: 10_000,
            max_entries: 2,
            ..CacheSettings::default()
        };
        let client = ApiResourceClient::new(Arc::new(mock.clone()), settings);

        client.fetch("/a").await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(client.lookup("/a"), CacheLookup::Miss);

        client.fetch("/b").await.unwrap();
        assert!(client.cached("/a").is_none());
        assert!(client.cached("/b").is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        client.fetch("/c").await.unwrap();
        tokio::time::advance(Duration::from_millis(1)).await;
        client.fetch("/d").await.unwrap();

        assert!(client.cached("/b").is_none());
        assert!(client.cached("/c").is_some());
        assert!(client.cached("/d").is_some());
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let mock = MockFetcher::new();
        mock.respond_get("/items/1", json!({"name": "latte"}));
        let client = client(&mock);

        client.fetch("/items/1").await.unwrap();
        assert!(client.invalidate("/items/1"));
        assert!(!client.invalidate("/items/1"));
        assert_eq!(client.lookup("/items/1"), CacheLookup::Miss);

        client.fetch("/items/1").await.unwrap();
        client.clear();
        assert!(client.cached("/items/1").is_none());
    }
}

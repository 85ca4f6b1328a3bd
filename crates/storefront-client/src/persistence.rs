//! # Cart Id Persistence
//!
//! Remembers which cart belongs to which location across restarts, so an
//! ordering session can be resumed instead of opening a new cart.
//!
//! ```text
//! cart-ids.json
//! {
//!   "L1": "c_123",
//!   "L7": "c_9f2e"
//! }
//! ```
//!
//! All operations are synchronous.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Store Trait
// =============================================================================

/// Location → cart id storage.
pub trait CartIdStore: Send + Sync {
    fn load(&self, location_id: &str) -> ClientResult<Option<String>>;

    fn save(&self, location_id: &str, cart_id: &str) -> ClientResult<()>;

    /// Drops the entry for a location (expired sessions).
    fn forget(&self, location_id: &str) -> ClientResult<()>;
}

pub type SharedCartIdStore = Arc<dyn CartIdStore>;

/// File store at the configured path, or an in-memory store when no data
/// directory can be determined.
pub fn open_cart_id_store(config: &ClientConfig) -> SharedCartIdStore {
    match config.cart_store_path() {
        Some(path) => {
            info!(?path, "Persisting cart ids to file");
            Arc::new(FileCartIdStore::new(path))
        }
        None => {
            warn!("No data directory available; cart ids will not survive a restart");
            Arc::new(MemoryCartIdStore::new())
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> ClientResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| ClientError::Persistence("cart id store lock poisoned".into()))
}

// =============================================================================
// File Store
// =============================================================================

/// JSON map on disk. Writes go through a temp file and a rename.
#[derive(Debug)]
pub struct FileCartIdStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileCartIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCartIdStore {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> ClientResult<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&contents) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Cart id file is corrupt; starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(map)
            .map_err(|e| ClientError::Persistence(e.to_string()))?;
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CartIdStore for FileCartIdStore {
    fn load(&self, location_id: &str) -> ClientResult<Option<String>> {
        let _guard = lock(&self.guard)?;
        Ok(self.read_map()?.remove(location_id))
    }

    fn save(&self, location_id: &str, cart_id: &str) -> ClientResult<()> {
        let _guard = lock(&self.guard)?;
        let mut map = self.read_map()?;
        map.insert(location_id.to_string(), cart_id.to_string());
        self.write_map(&map)?;
        debug!(location_id, cart_id, "Cart id persisted");
        Ok(())
    }

    fn forget(&self, location_id: &str) -> ClientResult<()> {
        let _guard = lock(&self.guard)?;
        let mut map = self.read_map()?;
        if map.remove(location_id).is_some() {
            self.write_map(&map)?;
            debug!(location_id, "Cart id forgotten");
        }
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryCartIdStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCartIdStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store.
    pub fn with_entry(location_id: &str, cart_id: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(location_id.to_string(), cart_id.to_string());
        }
        store
    }
}

impl CartIdStore for MemoryCartIdStore {
    fn load(&self, location_id: &str) -> ClientResult<Option<String>> {
        Ok(lock(&self.entries)?.get(location_id).cloned())
    }

    fn save(&self, location_id: &str, cart_id: &str) -> ClientResult<()> {
        lock(&self.entries)?.insert(location_id.to_string(), cart_id.to_string());
        Ok(())
    }

    fn forget(&self, location_id: &str) -> ClientResult<()> {
        lock(&self.entries)?.remove(location_id);
        Ok(())
    }
}

//! Persistent store adapter mirroring the subscription collection.

use crate::error::{Result, TrackerError};
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::types::Subscription;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "recurly_subscriptions";

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Data directory for the file-backed store.
    pub path: PathBuf,

    /// Key holding the serialized collection.
    pub key: String,

    /// Whether to create the data directory if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./recurly"),
            key: DEFAULT_STORAGE_KEY.to_string(),
            create_if_missing: true,
        }
    }
}

/// What happened when the persisted collection was read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored under the key.
    Missing,

    /// A well-formed collection was read.
    Loaded { count: usize },

    /// Stored data was unreadable and was discarded.
    Recovered { reason: String },
}

/// Reads and writes the whole collection under a single storage key.
///
/// The store never mutates the collection; it only mirrors what the manager
/// hands it. Every save is a full rewrite.
pub struct SubscriptionStore {
    backend: Box<dyn KeyValueStorage>,
    key: String,
}

impl SubscriptionStore {
    /// Store over `backend` using [`DEFAULT_STORAGE_KEY`].
    pub fn new(backend: impl KeyValueStorage + 'static) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Store over `backend` using a custom key.
    pub fn with_key(backend: impl KeyValueStorage + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    /// Open a file-backed store.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let backend = FileStorage::open(&config.path, config.create_if_missing)?;
        // Reject unusable keys up front
        backend.slot_path(&config.key)?;
        Ok(Self::with_key(backend, config.key))
    }

    /// Store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    // --- Reads ---

    /// Read the persisted collection.
    ///
    /// Missing or unreadable data yields an empty collection; the failure is
    /// logged and never surfaced.
    pub fn load(&self) -> Vec<Subscription> {
        self.load_with_outcome().0
    }

    /// Read the persisted collection and report how the read went.
    pub fn load_with_outcome(&self) -> (Vec<Subscription>, LoadOutcome) {
        match self.try_load() {
            Ok(Some(subscriptions)) => {
                let count = subscriptions.len();
                (subscriptions, LoadOutcome::Loaded { count })
            }
            Ok(None) => (Vec::new(), LoadOutcome::Missing),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable subscriptions");
                (
                    Vec::new(),
                    LoadOutcome::Recovered {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }

    /// Strict read: `Ok(None)` when absent, `Err(Corruption)` when unreadable.
    pub fn try_load(&self) -> Result<Option<Vec<Subscription>>> {
        let Some(blob) = self.backend.get(&self.key)? else {
            return Ok(None);
        };

        serde_json::from_str::<Vec<Subscription>>(&blob)
            .map(Some)
            .map_err(|e| TrackerError::Corruption {
                key: self.key.clone(),
                reason: e.to_string(),
            })
    }

    // --- Writes ---

    /// Overwrite the persisted collection.
    ///
    /// Best-effort: a failed write is logged and otherwise ignored, since the
    /// in-memory copy stays authoritative.
    pub fn save(&self, subscriptions: &[Subscription]) {
        if let Err(e) = self.try_save(subscriptions) {
            warn!(key = %self.key, error = %e, "Failed to persist subscriptions");
        }
    }

    /// Strict write returning `PersistenceWriteFailed` on failure.
    pub fn try_save(&self, subscriptions: &[Subscription]) -> Result<()> {
        let blob = serde_json::to_string(subscriptions)?;

        self.backend
            .set(&self.key, &blob)
            .map_err(|e| TrackerError::PersistenceWriteFailed {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;

        debug!(key = %self.key, count = subscriptions.len(), "Persisted subscriptions");
        Ok(())
    }

    /// Remove the persisted collection. Returns whether anything was stored.
    pub fn clear(&self) -> Result<bool> {
        self.backend.remove(&self.key)
    }
}

impl fmt::Debug for SubscriptionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

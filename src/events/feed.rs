//! Change feed broadcasting collection mutations to watchers.

use crate::types::{Subscription, SubscriptionId};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{ChangeEvent, DropReason, WatchConfig, WatchHandle, WatchId};

/// Internal watcher state.
struct Watcher {
    config: WatchConfig,
    sender: Sender<ChangeEvent>,
}

impl Watcher {
    /// Try to send an event. Returns false if the watcher should be dropped.
    fn try_send(&self, event: ChangeEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    fn matches(&self, event: &ChangeEvent) -> bool {
        event.kind().map_or(true, |kind| self.config.wants(kind))
    }
}

/// Fans change events out to every interested watcher.
pub struct ChangeFeed {
    /// Active watchers by ID.
    watchers: RwLock<HashMap<WatchId, Watcher>>,
    /// Counter for generating watcher IDs.
    next_id: AtomicU64,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self {
            watchers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a watcher and return its receiving handle.
    pub fn watch(&self, config: WatchConfig) -> WatchHandle {
        let id = WatchId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        self.watchers.write().insert(id, Watcher { config, sender });

        WatchHandle { id, receiver }
    }

    /// Remove a watcher, telling it why (best effort).
    pub fn unwatch(&self, id: WatchId) {
        if let Some(watcher) = self.watchers.write().remove(&id) {
            let _ = watcher.sender.try_send(ChangeEvent::Dropped {
                reason: DropReason::Unwatched,
            });
        }
    }

    /// Number of live watchers.
    pub fn watcher_count(&self) -> usize {
        self.watchers.read().len()
    }

    // --- Broadcasting ---

    pub fn broadcast_loaded(&self, count: usize) {
        self.broadcast(ChangeEvent::Loaded { count });
    }

    pub fn broadcast_added(&self, subscription: &Subscription) {
        self.broadcast(ChangeEvent::Added {
            subscription: subscription.clone(),
        });
    }

    pub fn broadcast_updated(&self, subscription: &Subscription) {
        self.broadcast(ChangeEvent::Updated {
            subscription: subscription.clone(),
        });
    }

    pub fn broadcast_deleted(&self, id: &SubscriptionId) {
        self.broadcast(ChangeEvent::Deleted { id: id.clone() });
    }

    /// Send to every matching watcher, dropping those that can't keep up.
    fn broadcast(&self, event: ChangeEvent) {
        let mut to_remove = Vec::new();

        {
            let watchers = self.watchers.read();
            if watchers.is_empty() {
                return;
            }
            for (id, watcher) in watchers.iter() {
                if watcher.matches(&event) && !watcher.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut watchers = self.watchers.write();
            for id in to_remove {
                if let Some(watcher) = watchers.remove(&id) {
                    debug!(watch_id = id.0, "Dropping slow watcher");
                    let _ = watcher.sender.try_send(ChangeEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

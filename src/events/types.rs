//! Change feed types.

use crate::types::{Subscription, SubscriptionId};
use serde::{Deserialize, Serialize};

/// Default number of buffered events per watcher.
pub const DEFAULT_WATCH_BUFFER: usize = 256;

/// Configuration for a watcher.
#[derive(Clone, Debug)]
pub struct WatchConfig {
    /// Max buffered events before the watcher is dropped.
    pub buffer_size: usize,

    /// Event kinds to deliver (None = all).
    pub kinds: Option<Vec<ChangeKind>>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_WATCH_BUFFER,
            kinds: None,
        }
    }
}

impl WatchConfig {
    /// Watch only the given kinds.
    pub fn kinds(kinds: Vec<ChangeKind>) -> Self {
        Self {
            kinds: Some(kinds),
            ..Default::default()
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub(crate) fn wants(&self, kind: ChangeKind) -> bool {
        match self.kinds {
            Some(ref kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

/// Kind of a change event, for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Loaded,
    Added,
    Updated,
    Deleted,
}

/// Events delivered to watchers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// The manager became ready with `count` subscriptions.
    Loaded { count: usize },

    /// A subscription was added.
    Added { subscription: Subscription },

    /// A subscription was edited; carries the merged result.
    Updated { subscription: Subscription },

    /// A subscription was removed.
    Deleted { id: SubscriptionId },

    /// The watcher was dropped; no further events follow.
    Dropped { reason: DropReason },
}

impl ChangeEvent {
    /// Kind of this event, or `None` for lifecycle events.
    pub fn kind(&self) -> Option<ChangeKind> {
        match self {
            ChangeEvent::Loaded { .. } => Some(ChangeKind::Loaded),
            ChangeEvent::Added { .. } => Some(ChangeKind::Added),
            ChangeEvent::Updated { .. } => Some(ChangeKind::Updated),
            ChangeEvent::Deleted { .. } => Some(ChangeKind::Deleted),
            ChangeEvent::Dropped { .. } => None,
        }
    }
}

/// Why a watcher was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unwatched.
    Unwatched,
}

/// Unique identifier for a watcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// Handle held by a watcher.
pub struct WatchHandle {
    pub id: WatchId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<ChangeEvent>,
}

impl WatchHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<ChangeEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<ChangeEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<ChangeEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.receiver.try_iter().collect()
    }
}

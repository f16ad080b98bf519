//! Subscription manager: the authoritative in-memory collection.

use crate::error::{Result, TrackerError};
use crate::events::{ChangeFeed, WatchConfig, WatchHandle, WatchId};
use crate::filter::{self, FilterCriteria};
use crate::input::{SubscriptionInput, SubscriptionPatch};
use crate::metrics::{self, DashboardSummary, DUE_SOON_DAYS, UPCOMING_DAYS};
use crate::store::{LoadOutcome, SubscriptionStore};
use crate::types::{RenewalInstant, Subscription, SubscriptionId};
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock, RwLockWriteGuard};
use tracing::{debug, info};

/// Manager configuration.
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    /// Width of the "due soon" window.
    pub due_soon_window: Duration,

    /// Width of the "upcoming renewal" window.
    pub upcoming_window: Duration,
}

impl ManagerConfig {
    /// Negative windows become empty (zero width).
    fn clamped(self) -> Self {
        Self {
            due_soon_window: self.due_soon_window.max(Duration::zero()),
            upcoming_window: self.upcoming_window.max(Duration::zero()),
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            due_soon_window: Duration::days(DUE_SOON_DAYS),
            upcoming_window: Duration::days(UPCOMING_DAYS),
        }
    }
}

/// Lifecycle of a manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagerState {
    /// Persisted data not read yet. Mutations are refused.
    Uninitialized,
    /// Collection loaded; every mutation persists.
    Ready,
}

/// Owns the subscription collection.
///
/// Provides:
/// - Add, update and delete, each followed by a full write to the store
/// - Derived metrics (monthly/yearly spend, counts, renewal windows)
/// - Filtering for list views
/// - A change feed for watchers
///
/// Mutations are serialized by a single write lock held across the change
/// and the write to the store; reads only take the collection's read lock.
pub struct SubscriptionManager {
    config: ManagerConfig,

    /// Persistent mirror of the collection.
    store: SubscriptionStore,

    /// Newest first.
    subscriptions: RwLock<Vec<Subscription>>,

    state: RwLock<ManagerState>,

    /// How the initial load went (None until initialized).
    load_outcome: RwLock<Option<LoadOutcome>>,

    feed: ChangeFeed,

    /// Lock for write operations to keep mutate-and-persist atomic.
    write_lock: Mutex<()>,
}

impl SubscriptionManager {
    /// Create an uninitialized manager over `store`.
    pub fn new(store: SubscriptionStore) -> Self {
        Self::with_config(store, ManagerConfig::default())
    }

    /// Create an uninitialized manager with custom windows.
    pub fn with_config(store: SubscriptionStore, config: ManagerConfig) -> Self {
        Self {
            config: config.clamped(),
            store,
            subscriptions: RwLock::new(Vec::new()),
            state: RwLock::new(ManagerState::Uninitialized),
            load_outcome: RwLock::new(None),
            feed: ChangeFeed::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a manager and load the persisted collection.
    pub fn open(store: SubscriptionStore) -> Self {
        let manager = Self::new(store);
        manager.initialize();
        manager
    }

    // --- Lifecycle ---

    /// Load the persisted collection and become ready.
    ///
    /// Only the first call reads the store; later calls are no-ops.
    pub fn initialize(&self) -> ManagerState {
        let _lock = self.write_lock.lock();

        if *self.state.read() == ManagerState::Ready {
            return ManagerState::Ready;
        }

        let (loaded, outcome) = self.store.load_with_outcome();
        let count = loaded.len();

        *self.subscriptions.write() = loaded;
        *self.load_outcome.write() = Some(outcome);
        *self.state.write() = ManagerState::Ready;

        info!(key = %self.store.key(), count, "Subscription manager ready");
        self.feed.broadcast_loaded(count);

        ManagerState::Ready
    }

    pub fn state(&self) -> ManagerState {
        *self.state.read()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ManagerState::Ready
    }

    /// How the initial load went, once initialized.
    pub fn load_outcome(&self) -> Option<LoadOutcome> {
        self.load_outcome.read().clone()
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn store(&self) -> &SubscriptionStore {
        &self.store
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(TrackerError::NotInitialized)
        }
    }

    // --- Mutations ---

    /// Add a subscription at the front of the collection.
    ///
    /// The manager assigns `id` and `created_at`.
    pub fn add(&self, input: SubscriptionInput) -> Result<Subscription> {
        let _lock = self.write_lock.lock();
        self.ensure_ready()?;

        let (name, cost, billing_cycle, category, next_renewal, notes) = input.into_parts();

        let mut subs = self.subscriptions.write();
        let subscription = Subscription {
            id: unique_id(&subs),
            name,
            cost,
            billing_cycle,
            category,
            next_renewal,
            notes,
            created_at: Utc::now(),
        };
        subs.insert(0, subscription.clone());

        let subs = RwLockWriteGuard::downgrade(subs);
        self.store.save(&subs);
        drop(subs);

        debug!(id = %subscription.id, name = %subscription.name, "Added subscription");
        self.feed.broadcast_added(&subscription);

        Ok(subscription)
    }

    /// Merge `patch` over the subscription with `id`.
    ///
    /// Returns the merged subscription, or `NotFound` (collection untouched).
    pub fn update(&self, id: &SubscriptionId, patch: SubscriptionPatch) -> Result<Subscription> {
        let _lock = self.write_lock.lock();
        self.ensure_ready()?;

        let mut subs = self.subscriptions.write();
        let Some(existing) = subs.iter_mut().find(|sub| &sub.id == id) else {
            debug!(id = %id, "Update target not found");
            return Err(TrackerError::NotFound(id.clone()));
        };

        patch.apply_to(existing);
        let updated = existing.clone();

        let subs = RwLockWriteGuard::downgrade(subs);
        self.store.save(&subs);
        drop(subs);

        debug!(id = %id, "Updated subscription");
        self.feed.broadcast_updated(&updated);

        Ok(updated)
    }

    /// Remove the subscription with `id`.
    ///
    /// Idempotent: returns whether anything was removed. The collection is
    /// persisted either way.
    pub fn delete(&self, id: &SubscriptionId) -> Result<bool> {
        let _lock = self.write_lock.lock();
        self.ensure_ready()?;

        let mut subs = self.subscriptions.write();
        let before = subs.len();
        subs.retain(|sub| &sub.id != id);
        let removed = subs.len() != before;

        let subs = RwLockWriteGuard::downgrade(subs);
        self.store.save(&subs);
        drop(subs);

        if removed {
            debug!(id = %id, "Deleted subscription");
            self.feed.broadcast_deleted(id);
        } else {
            debug!(id = %id, "Delete target not found");
        }

        Ok(removed)
    }

    // --- Reads ---

    /// Snapshot of the collection, newest first.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.read().clone()
    }

    /// Run `f` over the collection without cloning it.
    pub fn with_subscriptions<R>(&self, f: impl FnOnce(&[Subscription]) -> R) -> R {
        f(&self.subscriptions.read())
    }

    pub fn get(&self, id: &SubscriptionId) -> Option<Subscription> {
        self.subscriptions
            .read()
            .iter()
            .find(|sub| &sub.id == id)
            .cloned()
    }

    // --- Derived Metrics ---

    pub fn monthly_cost(&self) -> f64 {
        metrics::monthly_cost(&self.subscriptions.read())
    }

    pub fn yearly_cost(&self) -> f64 {
        metrics::yearly_cost(&self.subscriptions.read())
    }

    pub fn active_count(&self) -> usize {
        metrics::active_count(&self.subscriptions.read())
    }

    /// Whether `at` falls within the due-soon window from the current time.
    pub fn is_renewal_due_soon(&self, at: impl RenewalInstant) -> bool {
        self.is_renewal_due_soon_at(at, Utc::now())
    }

    pub fn is_renewal_due_soon_at(&self, at: impl RenewalInstant, now: DateTime<Utc>) -> bool {
        metrics::is_due_within(at, now, self.config.due_soon_window)
    }

    /// Subscriptions renewing within the upcoming window, soonest first.
    pub fn upcoming_renewals(&self) -> Vec<Subscription> {
        self.upcoming_renewals_at(Utc::now())
    }

    pub fn upcoming_renewals_at(&self, now: DateTime<Utc>) -> Vec<Subscription> {
        metrics::upcoming_renewals(&self.subscriptions.read(), now, self.config.upcoming_window)
    }

    pub fn upcoming_renewals_count(&self) -> usize {
        self.upcoming_renewals_count_at(Utc::now())
    }

    pub fn upcoming_renewals_count_at(&self, now: DateTime<Utc>) -> usize {
        metrics::upcoming_renewals_count(
            &self.subscriptions.read(),
            now,
            self.config.upcoming_window,
        )
    }

    /// Headline figures for the dashboard.
    pub fn summary(&self) -> DashboardSummary {
        self.summary_at(Utc::now())
    }

    pub fn summary_at(&self, now: DateTime<Utc>) -> DashboardSummary {
        DashboardSummary::compute(&self.subscriptions.read(), now, self.config.upcoming_window)
    }

    // --- Filtering ---

    /// Subscriptions matching `criteria`, in collection order.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Subscription> {
        self.filter_at(criteria, Utc::now())
    }

    pub fn filter_at(&self, criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<Subscription> {
        filter::apply(
            &self.subscriptions.read(),
            criteria,
            now,
            self.config.upcoming_window,
        )
    }

    // --- Change Feed ---

    /// Start watching collection changes.
    pub fn watch(&self, config: WatchConfig) -> WatchHandle {
        self.feed.watch(config)
    }

    pub fn unwatch(&self, id: WatchId) {
        self.feed.unwatch(id)
    }

    pub fn watcher_count(&self) -> usize {
        self.feed.watcher_count()
    }
}

/// A fresh id not used by any subscription in `subs`.
fn unique_id(subs: &[Subscription]) -> SubscriptionId {
    loop {
        let id = SubscriptionId::generate();
        if !subs.iter().any(|sub| sub.id == id) {
            return id;
        }
    }
}

//! # Recurly
//!
//! A personal subscription tracker: record recurring payments, see what they
//! cost per month and per year, find the ones renewing soon, filter them, and
//! export them to CSV. State lives in device-local key-value storage.
//!
//! ## Core Concepts
//!
//! - **Store**: mirrors the whole collection under one storage key
//! - **Manager**: owns the collection; every add/update/delete persists
//! - **Metrics**: spend totals and renewal windows, computed on demand
//! - **Filter**: name search, category, and cycle/upcoming selection
//!
//! ## Example
//!
//! ```ignore
//! use recurly::{
//!     BillingCycle, FilterCriteria, StoreConfig, SubscriptionInput, SubscriptionManager,
//!     SubscriptionStore,
//! };
//!
//! let store = SubscriptionStore::open(StoreConfig {
//!     path: "./recurly".into(),
//!     ..Default::default()
//! })?;
//! let manager = SubscriptionManager::open(store);
//!
//! let netflix = SubscriptionInput::new(
//!     "Netflix",
//!     15.49,
//!     BillingCycle::Monthly,
//!     "Streaming",
//!     renewal_date,
//! )?;
//! manager.add(netflix)?;
//!
//! println!("{:.2} per month", manager.monthly_cost());
//!
//! let streaming = manager.filter(&FilterCriteria::new().with_category("Streaming"));
//! recurly::export::export_to_file(&streaming, recurly::export::DEFAULT_EXPORT_FILENAME)?;
//! ```

pub mod error;
pub mod events;
pub mod export;
pub mod filter;
pub mod input;
pub mod manager;
pub mod metrics;
pub mod storage;
pub mod store;
pub mod types;

// Re-exports
pub use error::{Result, TrackerError, ValidationError};
pub use events::{ChangeEvent, ChangeFeed, ChangeKind, DropReason, WatchConfig, WatchHandle, WatchId};
pub use filter::{CycleFilter, FilterCriteria};
pub use input::{SubscriptionDraft, SubscriptionInput, SubscriptionPatch, SubscriptionUpdate};
pub use manager::{ManagerConfig, ManagerState, SubscriptionManager};
pub use metrics::DashboardSummary;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{LoadOutcome, StoreConfig, SubscriptionStore, DEFAULT_STORAGE_KEY};
pub use types::*;

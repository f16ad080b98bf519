//! Change feed for collection mutations.
//!
//! Presentation collaborators watch the manager instead of polling it:
//! - `Loaded` once the persisted collection is in memory
//! - `Added`, `Updated`, `Deleted` after each successful mutation
//!
//! Watchers get bounded buffers; a watcher that falls behind is dropped.
//!
//! # Example
//!
//! ```ignore
//! let handle = manager.watch(WatchConfig::kinds(vec![ChangeKind::Added]));
//!
//! manager.add(input)?;
//!
//! match handle.recv()? {
//!     ChangeEvent::Added { subscription } => println!("added {}", subscription.name),
//!     ChangeEvent::Dropped { reason } => eprintln!("watch dropped: {reason:?}"),
//!     _ => {}
//! }
//! ```

mod feed;
mod types;

pub use feed::ChangeFeed;
pub use types::{ChangeEvent, ChangeKind, DropReason, WatchConfig, WatchHandle, WatchId};

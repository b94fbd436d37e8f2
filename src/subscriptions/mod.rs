//! Subscription system for history change notifications.
//!
//! Hosts that re-render on change subscribe to a store and receive:
//! - Recorded writes
//! - Undo/redo moves
//! - Evictions and resets
//!
//! Subscriptions support filtering by event kind and bounded buffers with
//! slow-subscriber dropping. Events describe positions, not values; read the
//! value from the store.
//!
//! # Example
//!
//! ```ignore
//! let mut store = HistoryStore::new(project);
//! let handle = store.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::writes(),
//!     ..Default::default()
//! });
//!
//! store.update(|p| p.with_room("Lobby"));
//!
//! for event in handle.drain() {
//!     println!("history changed: {:?}", event);
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, HistoryEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};

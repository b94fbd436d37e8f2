//! # History Store
//!
//! A value with linear undo/redo history, built for editor state such as a
//! project being designed in a wizard: every distinct edit becomes an
//! immutable snapshot, undo and redo move a cursor through them.
//!
//! ## Core Concepts
//!
//! - **Snapshots**: Immutable `Arc<T>` values, one per recorded write
//! - **Cursor**: Index of the current snapshot; undo/redo move it
//! - **Redo branch**: Snapshots past the cursor, dropped by the next write
//! - **Deduplication**: Writes equivalent to the current value are skipped
//! - **Subscriptions**: Bounded channels of change events for observers
//!
//! ## Example
//!
//! ```
//! use history_store::HistoryStore;
//! use serde_json::json;
//!
//! let mut store = HistoryStore::new(json!({"count": 0}));
//!
//! store.set(json!({"count": 1}));
//! store.set(json!({"count": 1})); // unchanged, not recorded
//! assert_eq!(store.len(), 2);
//!
//! store.undo();
//! assert_eq!(store.value(), &json!({"count": 0}));
//! assert!(store.can_redo());
//!
//! store.update(|prev| json!({"count": prev["count"].as_i64().unwrap_or(0) + 2}));
//! assert_eq!(store.value(), &json!({"count": 2}));
//! assert!(!store.can_redo());
//! ```

pub mod config;
pub mod equality;
pub mod error;
pub mod history;
pub mod shared;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use config::HistoryConfig;
pub use equality::{Equivalence, FnEq, SerializedEq, StructuralEq};
pub use error::{HistoryError, Result};
pub use history::HistoryStore;
pub use shared::SharedHistory;
pub use subscriptions::{
    DropReason, HistoryEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::{ChangeKind, HistoryStats, Revision, Update};

//! The history-tracked state container.

use crate::config::HistoryConfig;
use crate::equality::{Equivalence, SerializedEq};
use crate::error::Result;
use crate::subscriptions::{
    HistoryEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle, SubscriptionId,
    SubscriptionManager,
};
use crate::types::{HistoryStats, Revision, Update};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A value with linear undo/redo history.
///
/// # Invariants
///
/// 1. `history` is never empty.
/// 2. `cursor < history.len()`.
/// 3. A write after an undo discards every snapshot past the cursor.
/// 4. A write equivalent to the current value (per `E`) changes nothing.
/// 5. With `max_depth = Some(n)`, `history.len() <= n` after any operation.
pub struct HistoryStore<T, E = SerializedEq> {
    /// Retained snapshots, oldest at the front.
    history: VecDeque<Arc<T>>,
    /// Index of the current snapshot.
    cursor: usize,
    revision: Revision,
    equivalence: E,
    config: HistoryConfig,
    stats: Counters,
    subscriptions: SubscriptionManager,
}

#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    recorded: u64,
    deduplicated: u64,
    evicted: u64,
    discarded: u64,
}

impl<T: Serialize> HistoryStore<T, SerializedEq> {
    /// Create an unbounded store seeded with `initial`, deduplicating writes
    /// by serialized equality.
    pub fn new(initial: T) -> Self {
        Self::from_parts(initial, HistoryConfig::default(), SerializedEq)
    }

    /// Create a store with a custom configuration.
    pub fn with_config(initial: T, config: HistoryConfig) -> Result<Self> {
        Self::with_equivalence(initial, config, SerializedEq)
    }
}

impl<T, E: Equivalence<T>> HistoryStore<T, E> {
    /// Create a store with a custom configuration and equality predicate.
    pub fn with_equivalence(initial: T, config: HistoryConfig, equivalence: E) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(initial, config, equivalence))
    }

    fn from_parts(initial: T, config: HistoryConfig, equivalence: E) -> Self {
        let mut history = VecDeque::new();
        history.push_back(Arc::new(initial));
        Self {
            history,
            cursor: 0,
            revision: Revision::default(),
            equivalence,
            config,
            stats: Counters::default(),
            subscriptions: SubscriptionManager::new(),
        }
    }

    // ====================================================================
    // Read
    // ====================================================================

    /// The current value.
    pub fn value(&self) -> &T {
        self.history[self.cursor].as_ref()
    }

    /// Shared handle to the current snapshot. Stays valid, and unchanged,
    /// across later writes.
    pub fn snapshot(&self) -> Arc<T> {
        Arc::clone(&self.history[self.cursor])
    }

    /// Consume the store, returning the current snapshot.
    pub fn into_value(self) -> Arc<T> {
        self.snapshot()
    }

    // ====================================================================
    // Write
    // ====================================================================

    /// Replace the current value.
    ///
    /// Returns `true` if a snapshot was recorded, `false` if `value` was
    /// equivalent to the current value and the write was skipped.
    pub fn set(&mut self, value: T) -> bool {
        if self.equivalence.equivalent(self.value(), &value) {
            self.stats.deduplicated += 1;
            debug!(cursor = self.cursor, "skipping unchanged write");
            return false;
        }

        let discarded = self.history.len() - 1 - self.cursor;
        self.history.truncate(self.cursor + 1);
        self.history.push_back(Arc::new(value));
        self.cursor = self.history.len() - 1;
        self.revision = self.revision.next();
        self.stats.recorded += 1;
        self.stats.discarded += discarded as u64;

        let evicted = self.enforce_depth();

        trace!(
            revision = self.revision.0,
            cursor = self.cursor,
            discarded,
            "recorded write"
        );
        self.subscriptions.broadcast(&HistoryEvent::Recorded {
            revision: self.revision,
            cursor: self.cursor,
            len: self.history.len(),
            discarded,
        });
        if evicted > 0 {
            self.subscriptions.broadcast(&HistoryEvent::Evicted {
                count: evicted,
                len: self.history.len(),
            });
        }
        true
    }

    /// Compute the new value from the current one.
    ///
    /// `f` sees the snapshot at the cursor right now. It must be pure.
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(self.value());
        self.set(next)
    }

    /// Apply either kind of write.
    pub fn apply(&mut self, update: impl Into<Update<T>>) -> bool {
        let next = update.into().resolve(self.value());
        self.set(next)
    }

    /// Discard the whole history and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        let dropped = self.history.len();
        self.history.clear();
        self.history.push_back(Arc::new(initial));
        self.cursor = 0;
        self.revision = self.revision.next();

        debug!(revision = self.revision.0, dropped, "history reset");
        self.subscriptions.broadcast(&HistoryEvent::Reset {
            revision: self.revision,
        });
    }

    // ====================================================================
    // Navigation
    // ====================================================================

    /// Step back one snapshot. No-op at the start of history.
    ///
    /// Returns whether the cursor moved.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.revision = self.revision.next();

        trace!(revision = self.revision.0, cursor = self.cursor, "undo");
        self.subscriptions.broadcast(&HistoryEvent::Undone {
            revision: self.revision,
            cursor: self.cursor,
            len: self.history.len(),
        });
        true
    }

    /// Step forward one snapshot. No-op at the end of history.
    ///
    /// Returns whether the cursor moved.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        self.revision = self.revision.next();

        trace!(revision = self.revision.0, cursor = self.cursor, "redo");
        self.subscriptions.broadcast(&HistoryEvent::Redone {
            revision: self.revision,
            cursor: self.cursor,
            len: self.history.len(),
        });
        true
    }

    /// Whether an earlier snapshot exists.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a later snapshot exists.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    // ====================================================================
    // Query
    // ====================================================================

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of retained snapshots, including the current one.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Always `false`; a store holds at least its current value.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Snapshots available to undo into.
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Snapshots available to redo into.
    pub fn redo_depth(&self) -> usize {
        self.history.len() - 1 - self.cursor
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// All retained snapshots, oldest first.
    pub fn snapshots(&self) -> impl Iterator<Item = &T> + '_ {
        self.history.iter().map(|s| s.as_ref())
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            len: self.history.len(),
            cursor: self.cursor,
            revision: self.revision,
            recorded_writes: self.stats.recorded,
            deduplicated_writes: self.stats.deduplicated,
            evicted: self.stats.evicted,
            discarded: self.stats.discarded,
        }
    }

    // ====================================================================
    // Subscriptions
    // ====================================================================

    /// Subscribe to change events.
    ///
    /// A config without an explicit `buffer_size` is sized from this
    /// store's `event_buffer_size`.
    pub fn subscribe(&self, mut config: SubscriptionConfig) -> SubscriptionHandle {
        config
            .buffer_size
            .get_or_insert(self.config.event_buffer_size);
        self.subscriptions.subscribe(config)
    }

    /// Subscribe with the store's configured buffer size.
    pub fn subscribe_filtered(&self, filter: SubscriptionFilter) -> SubscriptionHandle {
        self.subscribe(SubscriptionConfig::filtered(filter))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        self.subscriptions.unsubscribe(id)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    /// Evict the oldest snapshots past the depth cap. Returns how many.
    fn enforce_depth(&mut self) -> usize {
        let Some(max_depth) = self.config.max_depth else {
            return 0;
        };

        let mut evicted = 0;
        while self.history.len() > max_depth && self.cursor > 0 {
            self.history.pop_front();
            self.cursor -= 1;
            evicted += 1;
        }

        if evicted > 0 {
            self.stats.evicted += evicted as u64;
            debug!(evicted, len = self.history.len(), "evicted oldest snapshots");
        }
        evicted
    }
}

impl<T, E> fmt::Debug for HistoryStore<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("len", &self.history.len())
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .field("config", &self.config)
            .finish()
    }
}

//! A cloneable handle that serializes access to one store.
//!
//! `HistoryStore` assumes a single owner. When several parts of a host hold
//! the same history (an editor pane and a toolbar, say), they share a
//! `SharedHistory`; every call takes the lock for its whole duration.

use crate::config::HistoryConfig;
use crate::equality::{Equivalence, SerializedEq};
use crate::error::Result;
use crate::history::HistoryStore;
use crate::subscriptions::{
    SubscriptionConfig, SubscriptionFilter, SubscriptionHandle, SubscriptionId,
};
use crate::types::{HistoryStats, Revision};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Shared, lock-protected history store.
pub struct SharedHistory<T, E = SerializedEq> {
    inner: Arc<Mutex<HistoryStore<T, E>>>,
}

impl<T: Serialize> SharedHistory<T, SerializedEq> {
    /// Create a shared unbounded store seeded with `initial`.
    pub fn new(initial: T) -> Self {
        Self::from_store(HistoryStore::new(initial))
    }

    /// Create a shared store with a custom configuration.
    pub fn with_config(initial: T, config: HistoryConfig) -> Result<Self> {
        Ok(Self::from_store(HistoryStore::with_config(initial, config)?))
    }
}

impl<T, E: Equivalence<T>> SharedHistory<T, E> {
    /// Wrap an existing store.
    pub fn from_store(store: HistoryStore<T, E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Read the current value under the lock.
    ///
    /// The lock is not reentrant: `f` must not call back into this
    /// `SharedHistory` or any clone of it, or it deadlocks.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(self.inner.lock().value())
    }

    /// Run `f` with exclusive access to the store.
    ///
    /// Work on the `&mut HistoryStore` passed in; calling back into this
    /// `SharedHistory` from `f` deadlocks.
    pub fn with<R>(&self, f: impl FnOnce(&mut HistoryStore<T, E>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn snapshot(&self) -> Arc<T> {
        self.inner.lock().snapshot()
    }

    pub fn set(&self, value: T) -> bool {
        self.inner.lock().set(value)
    }

    /// Functional update. `f` runs under the lock against the current value.
    ///
    /// The lock is not reentrant: `f` must not touch this `SharedHistory`
    /// or any clone of it, or it deadlocks.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        self.inner.lock().update(f)
    }

    pub fn undo(&self) -> bool {
        self.inner.lock().undo()
    }

    pub fn redo(&self) -> bool {
        self.inner.lock().redo()
    }

    pub fn can_undo(&self) -> bool {
        self.inner.lock().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.lock().can_redo()
    }

    pub fn revision(&self) -> Revision {
        self.inner.lock().revision()
    }

    pub fn stats(&self) -> HistoryStats {
        self.inner.lock().stats()
    }

    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.inner.lock().subscribe(config)
    }

    pub fn subscribe_filtered(&self, filter: SubscriptionFilter) -> SubscriptionHandle {
        self.inner.lock().subscribe_filtered(filter)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        self.inner.lock().unsubscribe(id)
    }
}

impl<T, E> Clone for SharedHistory<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for SharedHistory<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(store) => f.debug_tuple("SharedHistory").field(&*store).finish(),
            None => f.write_str("SharedHistory(<locked>)"),
        }
    }
}

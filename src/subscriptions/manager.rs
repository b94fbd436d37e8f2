//! Subscription manager for broadcasting history events.

use crate::config::DEFAULT_EVENT_BUFFER_SIZE;
use crate::error::{HistoryError, Result};
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{
    DropReason, HistoryEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    /// Events the subscriber may have buffered before it is dropped.
    buffer_size: usize,
    /// Channel capacity is `buffer_size + 1`; the spare slot holds the
    /// final `Dropped` notice.
    sender: Sender<HistoryEvent>,
}

/// Why a send did not go through.
#[derive(Debug)]
enum SendFailure {
    /// Buffer full; the subscriber is told why it was dropped.
    Overflow,
    /// Receiver gone; nobody left to tell.
    Disconnected,
}

impl Subscription {
    /// Try to send an event without touching the reserved slot.
    fn try_send(&self, event: HistoryEvent) -> std::result::Result<(), SendFailure> {
        if self.sender.len() >= self.buffer_size {
            return Err(SendFailure::Overflow);
        }
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(crossbeam_channel::TrySendError::Full(_)) => Err(SendFailure::Overflow),
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => {
                Err(SendFailure::Disconnected)
            }
        }
    }
}

/// Manages subscriptions and broadcasts events.
///
/// Sends never block: a subscriber whose buffer is full, or whose receiver
/// is gone, is removed on the next broadcast. An overflowing subscriber
/// receives `Dropped { BufferOverflow }` as its last event.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let buffer_size = config
            .buffer_size
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE)
            .max(1);
        let (sender, receiver) = bounded(buffer_size.saturating_add(1));

        self.subscriptions.write().insert(
            id,
            Subscription {
                config,
                buffer_size,
                sender,
            },
        );

        debug!(subscription = id.0, "subscribed");
        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        let sub = self
            .subscriptions
            .write()
            .remove(&id)
            .ok_or(HistoryError::SubscriptionNotFound(id))?;

        // Best effort, the receiver may already be gone
        let _ = sub.sender.try_send(HistoryEvent::Dropped {
            reason: DropReason::Unsubscribed,
        });
        debug!(subscription = id.0, "unsubscribed");
        Ok(())
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Broadcast an event to matching subscriptions. Drops subscribers that
    /// fail to receive.
    pub fn broadcast(&self, event: &HistoryEvent) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            if subs.is_empty() {
                return;
            }
            for (id, sub) in subs.iter() {
                if sub.config.filter.matches(event) {
                    if let Err(failure) = sub.try_send(event.clone()) {
                        to_remove.push((*id, failure));
                    }
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for (id, failure) in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    debug!(subscription = id.0, ?failure, "dropping subscriber");
                    if let SendFailure::Overflow = failure {
                        // Fits in the reserved slot
                        let _ = sub.sender.try_send(HistoryEvent::Dropped {
                            reason: DropReason::BufferOverflow,
                        });
                    }
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

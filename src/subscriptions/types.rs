//! Subscription types for history change notifications.

use crate::types::{ChangeKind, Revision};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// `None` takes the store's `event_buffer_size` (256 for a bare
    /// `SubscriptionManager`).
    pub buffer_size: Option<usize>,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: None,
            filter: SubscriptionFilter::all(),
        }
    }
}

impl SubscriptionConfig {
    /// Subscription with the default buffer size and the given filter.
    pub fn filtered(filter: SubscriptionFilter) -> Self {
        Self {
            buffer_size: None,
            filter,
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Include recorded writes.
    pub include_writes: bool,

    /// Include undo and redo moves.
    pub include_navigation: bool,

    /// Include evictions and resets.
    pub include_maintenance: bool,
}

impl SubscriptionFilter {
    /// Subscribe to recorded writes only.
    pub fn writes() -> Self {
        Self {
            include_writes: true,
            ..Default::default()
        }
    }

    /// Subscribe to undo/redo moves only.
    pub fn navigation() -> Self {
        Self {
            include_navigation: true,
            ..Default::default()
        }
    }

    /// Subscribe to everything.
    pub fn all() -> Self {
        Self {
            include_writes: true,
            include_navigation: true,
            include_maintenance: true,
        }
    }

    /// Check whether an event passes this filter.
    pub fn matches(&self, event: &HistoryEvent) -> bool {
        match event {
            HistoryEvent::Recorded { .. } => self.include_writes,
            HistoryEvent::Undone { .. } | HistoryEvent::Redone { .. } => self.include_navigation,
            HistoryEvent::Evicted { .. } | HistoryEvent::Reset { .. } => self.include_maintenance,
            HistoryEvent::Dropped { .. } => true,
        }
    }
}

/// Events emitted by subscriptions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    /// A write produced a new snapshot.
    Recorded {
        revision: Revision,
        cursor: usize,
        len: usize,
        /// Redo-branch snapshots discarded by this write.
        discarded: usize,
    },

    /// The cursor moved back one snapshot.
    Undone {
        revision: Revision,
        cursor: usize,
        len: usize,
    },

    /// The cursor moved forward one snapshot.
    Redone {
        revision: Revision,
        cursor: usize,
        len: usize,
    },

    /// Oldest snapshots were evicted by the depth cap.
    Evicted { count: usize, len: usize },

    /// History was discarded and reseeded.
    Reset { revision: Revision },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl HistoryEvent {
    /// The kind of change that moved the current value, if any.
    pub fn change_kind(&self) -> Option<ChangeKind> {
        match self {
            HistoryEvent::Recorded { .. } => Some(ChangeKind::Write),
            HistoryEvent::Undone { .. } => Some(ChangeKind::Undo),
            HistoryEvent::Redone { .. } => Some(ChangeKind::Redo),
            HistoryEvent::Reset { .. } => Some(ChangeKind::Reset),
            HistoryEvent::Evicted { .. } | HistoryEvent::Dropped { .. } => None,
        }
    }

    /// Revision after the change, for value-changing events.
    pub fn revision(&self) -> Option<Revision> {
        match self {
            HistoryEvent::Recorded { revision, .. }
            | HistoryEvent::Undone { revision, .. }
            | HistoryEvent::Redone { revision, .. }
            | HistoryEvent::Reset { revision } => Some(*revision),
            HistoryEvent::Evicted { .. } | HistoryEvent::Dropped { .. } => None,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<HistoryEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<HistoryEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<HistoryEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<HistoryEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Take every event currently buffered.
    pub fn drain(&self) -> Vec<HistoryEvent> {
        self.receiver.try_iter().collect()
    }
}

//! Core types for the history store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counter of value-changing operations on a store.
///
/// Advanced by recorded writes, effective undo/redo and resets. No-op
/// operations leave it untouched, so hosts can compare revisions to decide
/// whether to re-render.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Revision(pub u64);

impl Revision {
    pub fn next(self) -> Self {
        Revision(self.0 + 1)
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rev({})", self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What moved the current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Write,
    Undo,
    Redo,
    Reset,
}

/// A write request: either a literal replacement or a function of the
/// current value.
///
/// The function form is evaluated against the snapshot at the cursor at the
/// time the write is applied, never against a value captured earlier.
pub enum Update<T> {
    /// Replace the current value.
    Replace(T),

    /// Compute the new value from the current one. Must be pure.
    With(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    /// Wrap a functional update.
    pub fn with<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> T + 'static,
    {
        Update::With(Box::new(f))
    }

    /// Resolve the update against `current`.
    pub fn resolve(self, current: &T) -> T {
        match self {
            Update::Replace(value) => value,
            Update::With(f) => f(current),
        }
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Update::Replace(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Update::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            Update::With(_) => f.write_str("With(<fn>)"),
        }
    }
}

/// History statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    /// Snapshots currently retained (including the current one).
    pub len: usize,
    /// Index of the current snapshot.
    pub cursor: usize,
    pub revision: Revision,
    /// Writes that produced a new snapshot.
    pub recorded_writes: u64,
    /// Writes skipped because the value did not change.
    pub deduplicated_writes: u64,
    /// Snapshots discarded by the depth cap.
    pub evicted: u64,
    /// Snapshots discarded from redo branches by new writes.
    pub discarded: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_next() {
        let rev = Revision(5);
        assert_eq!(rev.next(), Revision(6));
        assert_eq!(format!("{:?}", rev), "Rev(5)");
        assert_eq!(rev.to_string(), "5");
    }

    #[test]
    fn test_update_resolve() {
        let replace: Update<i32> = 7.into();
        assert_eq!(replace.resolve(&1), 7);

        let with = Update::with(|prev: &i32| prev + 10);
        assert_eq!(with.resolve(&1), 11);
    }

    #[test]
    fn test_change_kind_serialization() {
        let json = serde_json::to_string(&ChangeKind::Undo).unwrap();
        assert_eq!(json, "\"undo\"");
    }
}

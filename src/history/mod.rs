//! Linear undo/redo history over snapshots of a value.
//!
//! Every recorded write appends an immutable `Arc<T>` snapshot and moves the
//! cursor to it. Undo and redo only move the cursor.
//!
//! ```text
//! set(s1), set(s2), set(s3)
//!   history: [s0, s1, s2, s3]    cursor -> s3
//!
//! undo() x2
//!   history: [s0, s1, s2, s3]    cursor -> s1
//!
//! set(s4), redo branch dropped
//!   history: [s0, s1, s4]        cursor -> s4
//! ```
//!
//! Writes equivalent to the current value are skipped, so idempotent updates
//! from the host never pollute the history. History is unbounded unless a
//! `max_depth` is configured, in which case the oldest snapshots are evicted.

mod store;

pub use store::HistoryStore;

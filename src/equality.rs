//! Equality predicates used to deduplicate writes.
//!
//! A write whose new value is equivalent to the current snapshot is dropped
//! without touching the history. The predicate is pluggable:
//!
//! - [`SerializedEq`] compares the `serde_json` encodings byte for byte.
//!   This is the default and what editor state is usually compared with.
//! - [`StructuralEq`] defers to `PartialEq`.
//! - [`FnEq`] wraps any comparator closure.
//!
//! # Serialized equality constraints
//!
//! Serialized equality depends on the order in which a value serializes its
//! fields and keys. Structs and `BTreeMap` serialize deterministically;
//! `HashMap` does not, so two equal hash maps can compare unequal and produce
//! a redundant snapshot. Values that cannot be serialized at all (for
//! example maps with non-string keys) are reported as unequal, so the write
//! is recorded instead of being lost.

use serde::Serialize;
use tracing::warn;

/// Decides whether two values are the same for history purposes.
pub trait Equivalence<T: ?Sized> {
    fn equivalent(&self, a: &T, b: &T) -> bool;
}

/// Equality by identical `serde_json` encoding.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerializedEq;

impl<T: Serialize + ?Sized> Equivalence<T> for SerializedEq {
    fn equivalent(&self, a: &T, b: &T) -> bool {
        match (serde_json::to_vec(a), serde_json::to_vec(b)) {
            (Ok(a), Ok(b)) => a == b,
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "value is not serializable, treating as changed");
                false
            }
        }
    }
}

/// Equality through `PartialEq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralEq;

impl<T: PartialEq + ?Sized> Equivalence<T> for StructuralEq {
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Equality through a caller-supplied comparator.
#[derive(Clone, Copy)]
pub struct FnEq<F>(pub F);

impl<T: ?Sized, F> Equivalence<T> for FnEq<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

impl<F> std::fmt::Debug for FnEq<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnEq(<fn>)")
    }
}

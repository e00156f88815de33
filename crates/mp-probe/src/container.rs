//! Container shapes the probe knows how to exercise.
//!
//! Every mutating method returns [`OpResult`]. An implementation that
//! forbids an operation returns [`CollectionError::Unsupported`]; any
//! other error means the call was permitted but failed.
//!
//! The `duplicate*` methods build the working copies the probe mutates.
//! A duplicate must hold the same logical elements and honor the same
//! mutability contract as the original, and it must not share storage
//! with it.

use crate::CollectionError;
use std::cmp::Ordering;

/// Result of a single container operation.
pub type OpResult<T = ()> = std::result::Result<T, CollectionError>;

/// An unordered group of elements.
pub trait ProbeCollection<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in iteration order.
    fn elements(&self) -> Vec<T>;

    /// First element in iteration order.
    fn first(&self) -> Option<T> {
        self.elements().into_iter().next()
    }

    /// A working copy with the same elements and contract.
    fn duplicate(&self) -> Box<dyn ProbeCollection<T>>;

    fn add(&mut self, value: T) -> OpResult;

    fn add_all(&mut self, values: Vec<T>) -> OpResult;

    /// Remove one occurrence of `value`, if present.
    fn remove(&mut self, value: &T) -> OpResult;

    fn remove_all(&mut self, values: &[T]) -> OpResult;

    fn retain_all(&mut self, values: &[T]) -> OpResult;

    fn remove_if(&mut self, filter: &mut dyn FnMut(&T) -> bool) -> OpResult;

    fn clear(&mut self) -> OpResult;

    /// A forward cursor positioned before the first element.
    fn cursor(&mut self) -> OpResult<Box<dyn Cursor<T> + '_>>;
}

/// An ordered, index-addressable collection.
pub trait ProbeList<T>: ProbeCollection<T> {
    fn element_at(&self, index: usize) -> Option<T>;

    /// A working copy with the same elements and contract.
    fn duplicate_list(&self) -> Box<dyn ProbeList<T>>;

    /// Replace the element at `index`, returning the previous one.
    fn set(&mut self, index: usize, value: T) -> OpResult<T>;

    fn sort_with(&mut self, compare: &mut dyn FnMut(&T, &T) -> Ordering) -> OpResult;

    fn replace_all(&mut self, operator: &mut dyn FnMut(&T) -> T) -> OpResult;

    /// A bidirectional-style cursor positioned before the first element.
    fn list_cursor(&mut self) -> OpResult<Box<dyn ListCursor<T> + '_>>;
}

/// A collection without duplicate elements.
pub trait ProbeSet<T>: ProbeCollection<T> {
    fn contains(&self, value: &T) -> bool;

    /// A working copy with the same elements and contract.
    fn duplicate_set(&self) -> Box<dyn ProbeSet<T>>;
}

/// A key to value association.
pub trait ProbeMap<K, V> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in iteration order.
    fn entries(&self) -> Vec<(K, V)>;

    fn first_entry(&self) -> Option<(K, V)> {
        self.entries().into_iter().next()
    }

    /// A working copy with the same entries and contract.
    fn duplicate(&self) -> Box<dyn ProbeMap<K, V>>;

    fn put(&mut self, key: K, value: V) -> OpResult<Option<V>>;

    fn put_all(&mut self, entries: Vec<(K, V)>) -> OpResult;

    fn remove(&mut self, key: &K) -> OpResult<Option<V>>;

    fn clear(&mut self) -> OpResult;

    fn retain(&mut self, keep: &mut dyn FnMut(&K, &V) -> bool) -> OpResult;

    fn replace_all(&mut self, function: &mut dyn FnMut(&K, &V) -> V) -> OpResult;
}

/// A forward cursor that may remove the element it last returned.
pub trait Cursor<T> {
    /// Step over the next element and return it.
    fn advance(&mut self) -> Option<T>;

    /// Remove the element last returned by [`Cursor::advance`].
    fn remove(&mut self) -> OpResult;
}

/// A cursor that can also replace and insert at its position.
pub trait ListCursor<T>: Cursor<T> {
    /// Replace the element last returned by [`Cursor::advance`].
    fn set(&mut self, value: T) -> OpResult;

    /// Insert before the element the next advance would return.
    fn add(&mut self, value: T) -> OpResult;
}

/// Hands out fresh forward cursors, each equivalently positioned.
///
/// Callers must back each cursor with a copy of the owning collection,
/// never with the live collection under assertion.
pub trait CursorSource<T> {
    fn open(&self) -> Box<dyn Cursor<T> + '_>;
}

/// Hands out fresh list cursors, each equivalently positioned.
///
/// Same copy obligation as [`CursorSource`].
pub trait ListCursorSource<T> {
    fn open_list(&self) -> Box<dyn ListCursor<T> + '_>;
}

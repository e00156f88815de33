//! Concrete cursors.
//!
//! - [`IndexedCursor`] walks any index-addressable store and supports the
//!   full remove/set/add triad.
//! - [`ElementCursor`] walks a snapshot of an unordered collection and
//!   removes through the owning collection.
//! - [`ReadOnlyCursor`] walks owned elements and refuses every mutation.
//! - [`SnapshotCursors`] is the collaborator handed to the probe for
//!   iterator-shaped probing: each cursor it opens runs over its own copy.

use crate::capability::Probeable;
use crate::container::{
    Cursor, CursorSource, ListCursor, ListCursorSource, OpResult, ProbeCollection,
};
use crate::CollectionError;
use std::collections::{LinkedList, VecDeque};
use std::marker::PhantomData;

/// Index-addressable storage.
pub trait Slots<T> {
    fn slot_count(&self) -> usize;
    fn slot(&self, index: usize) -> Option<&T>;
    fn slot_mut(&mut self, index: usize) -> Option<&mut T>;
    /// Insert at `index`; `index == slot_count()` appends.
    fn insert_slot(&mut self, index: usize, value: T);
    fn remove_slot(&mut self, index: usize) -> Option<T>;
}

impl<T> Slots<T> for Vec<T> {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn slot(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }

    fn insert_slot(&mut self, index: usize, value: T) {
        self.insert(index.min(self.len()), value);
    }

    fn remove_slot(&mut self, index: usize) -> Option<T> {
        if index < self.len() {
            Some(Vec::remove(self, index))
        } else {
            None
        }
    }
}

impl<T> Slots<T> for VecDeque<T> {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn slot(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }

    fn insert_slot(&mut self, index: usize, value: T) {
        self.insert(index.min(self.len()), value);
    }

    fn remove_slot(&mut self, index: usize) -> Option<T> {
        VecDeque::remove(self, index)
    }
}

impl<T> Slots<T> for LinkedList<T> {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn slot(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.iter_mut().nth(index)
    }

    fn insert_slot(&mut self, index: usize, value: T) {
        let mut tail = self.split_off(index.min(self.len()));
        self.push_back(value);
        self.append(&mut tail);
    }

    fn remove_slot(&mut self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        let mut tail = self.split_off(index);
        let removed = tail.pop_front();
        self.append(&mut tail);
        removed
    }
}

impl<T, S: Slots<T> + ?Sized> Slots<T> for &mut S {
    fn slot_count(&self) -> usize {
        (**self).slot_count()
    }

    fn slot(&self, index: usize) -> Option<&T> {
        (**self).slot(index)
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        (**self).slot_mut(index)
    }

    fn insert_slot(&mut self, index: usize, value: T) {
        (**self).insert_slot(index, value)
    }

    fn remove_slot(&mut self, index: usize) -> Option<T> {
        (**self).remove_slot(index)
    }
}

/// A list cursor over index-addressable storage.
///
/// `next` is the index the following advance returns; `last` is the
/// index of the element last returned, cleared by `remove` and `add`.
pub struct IndexedCursor<T, S> {
    store: S,
    next: usize,
    last: Option<usize>,
    _element: PhantomData<fn() -> T>,
}

impl<T, S: Slots<T>> IndexedCursor<T, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            next: 0,
            last: None,
            _element: PhantomData,
        }
    }
}

impl<T: Clone, S: Slots<T>> Cursor<T> for IndexedCursor<T, S> {
    fn advance(&mut self) -> Option<T> {
        let value = self.store.slot(self.next)?.clone();
        self.last = Some(self.next);
        self.next += 1;
        Some(value)
    }

    fn remove(&mut self) -> OpResult {
        let index = self.last.take().ok_or_else(|| {
            CollectionError::IllegalState("remove without a returned element".to_string())
        })?;
        self.store.remove_slot(index);
        if index < self.next {
            self.next -= 1;
        }
        Ok(())
    }
}

impl<T: Clone, S: Slots<T>> ListCursor<T> for IndexedCursor<T, S> {
    fn set(&mut self, value: T) -> OpResult {
        let index = self.last.ok_or_else(|| {
            CollectionError::IllegalState("set without a returned element".to_string())
        })?;
        let len = self.store.slot_count();
        let slot = self
            .store
            .slot_mut(index)
            .ok_or(CollectionError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    fn add(&mut self, value: T) -> OpResult {
        self.store.insert_slot(self.next, value);
        self.next += 1;
        self.last = None;
        Ok(())
    }
}

/// A forward cursor over a snapshot of an unordered collection.
pub struct ElementCursor<'a, T> {
    owner: &'a mut dyn ProbeCollection<T>,
    pending: VecDeque<T>,
    last: Option<T>,
}

impl<'a, T> ElementCursor<'a, T> {
    pub fn new(owner: &'a mut dyn ProbeCollection<T>) -> Self {
        let pending = owner.elements().into();
        Self {
            owner,
            pending,
            last: None,
        }
    }
}

impl<T: Clone> Cursor<T> for ElementCursor<'_, T> {
    fn advance(&mut self) -> Option<T> {
        let value = self.pending.pop_front()?;
        self.last = Some(value.clone());
        Some(value)
    }

    fn remove(&mut self) -> OpResult {
        let value = self.last.take().ok_or_else(|| {
            CollectionError::IllegalState("remove without a returned element".to_string())
        })?;
        self.owner.remove(&value)
    }
}

/// A cursor over owned elements that refuses every mutation.
pub struct ReadOnlyCursor<T> {
    items: std::vec::IntoIter<T>,
}

impl<T> ReadOnlyCursor<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl<T> Cursor<T> for ReadOnlyCursor<T> {
    fn advance(&mut self) -> Option<T> {
        self.items.next()
    }

    fn remove(&mut self) -> OpResult {
        Err(CollectionError::Unsupported)
    }
}

impl<T> ListCursor<T> for ReadOnlyCursor<T> {
    fn set(&mut self, _value: T) -> OpResult {
        Err(CollectionError::Unsupported)
    }

    fn add(&mut self, _value: T) -> OpResult {
        Err(CollectionError::Unsupported)
    }
}

/// Opens cursors over private copies of a list's elements.
///
/// This is how a caller satisfies the iterator-probing precondition: the
/// snapshot is taken once, and every cursor mutates its own clone of it.
#[derive(Debug, Clone)]
pub struct SnapshotCursors<T> {
    items: Vec<T>,
    read_only: bool,
}

impl<T: Clone> SnapshotCursors<T> {
    /// Cursors that permit mutation of their private copy.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            read_only: false,
        }
    }

    /// Cursors over a copy of `owner`, inheriting nothing from its
    /// contract.
    pub fn of(owner: &dyn ProbeCollection<T>) -> Self {
        Self::new(owner.elements())
    }

    /// Cursors that refuse every mutation.
    pub fn read_only(items: Vec<T>) -> Self {
        Self {
            items,
            read_only: true,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone + 'static> ListCursorSource<T> for SnapshotCursors<T> {
    fn open_list(&self) -> Box<dyn ListCursor<T> + '_> {
        if self.read_only {
            Box::new(ReadOnlyCursor::new(self.items.clone()))
        } else {
            Box::new(IndexedCursor::<T, _>::new(self.items.clone()))
        }
    }
}

impl<T: Clone + 'static> CursorSource<T> for SnapshotCursors<T> {
    fn open(&self) -> Box<dyn Cursor<T> + '_> {
        if self.read_only {
            Box::new(ReadOnlyCursor::new(self.items.clone()))
        } else {
            Box::new(IndexedCursor::<T, _>::new(self.items.clone()))
        }
    }
}

impl<T: Clone + 'static> Probeable<T> for SnapshotCursors<T> {
    fn as_list_cursor_source(&self) -> Option<&dyn ListCursorSource<T>> {
        Some(self)
    }

    fn as_cursor_source(&self) -> Option<&dyn CursorSource<T>> {
        Some(self)
    }
}

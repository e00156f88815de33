//! Container shapes for the standard library families.
//!
//! Sequences (`Vec`, `VecDeque`, `LinkedList`) are lists, the two std sets
//! are sets, the two std maps are maps. [`SynchronizedList`] is a growable
//! array behind a mutex, safe to share between threads.

use crate::capability::Probeable;
use crate::container::{Cursor, ListCursor, OpResult, ProbeCollection, ProbeList, ProbeMap, ProbeSet};
use crate::cursor::{ElementCursor, IndexedCursor, Slots};
use crate::CollectionError;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Rebuild `seq` from the elements `keep` accepts.
fn keep_where<T, S>(seq: &mut S, mut keep: impl FnMut(&T) -> bool)
where
    S: Default + IntoIterator<Item = T> + FromIterator<T>,
{
    let kept: S = std::mem::take(seq).into_iter().filter(|v| keep(v)).collect();
    *seq = kept;
}

macro_rules! sequence_impls {
    ($seq:ident) => {
        impl<T: Clone + PartialEq + 'static> ProbeCollection<T> for $seq<T> {
            fn len(&self) -> usize {
                $seq::len(self)
            }

            fn elements(&self) -> Vec<T> {
                self.iter().cloned().collect()
            }

            fn first(&self) -> Option<T> {
                self.iter().next().cloned()
            }

            fn duplicate(&self) -> Box<dyn ProbeCollection<T>> {
                Box::new(self.clone())
            }

            fn add(&mut self, value: T) -> OpResult {
                let end = $seq::len(self);
                Slots::insert_slot(self, end, value);
                Ok(())
            }

            fn add_all(&mut self, values: Vec<T>) -> OpResult {
                self.extend(values);
                Ok(())
            }

            fn remove(&mut self, value: &T) -> OpResult {
                if let Some(index) = self.iter().position(|v| v == value) {
                    Slots::remove_slot(self, index);
                }
                Ok(())
            }

            fn remove_all(&mut self, values: &[T]) -> OpResult {
                keep_where(self, |v| !values.contains(v));
                Ok(())
            }

            fn retain_all(&mut self, values: &[T]) -> OpResult {
                keep_where(self, |v| values.contains(v));
                Ok(())
            }

            fn remove_if(&mut self, filter: &mut dyn FnMut(&T) -> bool) -> OpResult {
                keep_where(self, |v| !filter(v));
                Ok(())
            }

            fn clear(&mut self) -> OpResult {
                $seq::clear(self);
                Ok(())
            }

            fn cursor(&mut self) -> OpResult<Box<dyn Cursor<T> + '_>> {
                Ok(Box::new(IndexedCursor::<T, _>::new(self)))
            }
        }

        impl<T: Clone + PartialEq + 'static> ProbeList<T> for $seq<T> {
            fn element_at(&self, index: usize) -> Option<T> {
                Slots::slot(self, index).cloned()
            }

            fn duplicate_list(&self) -> Box<dyn ProbeList<T>> {
                Box::new(self.clone())
            }

            fn set(&mut self, index: usize, value: T) -> OpResult<T> {
                let len = $seq::len(self);
                match Slots::slot_mut(self, index) {
                    Some(slot) => Ok(std::mem::replace(slot, value)),
                    None => Err(CollectionError::IndexOutOfBounds { index, len }),
                }
            }

            fn sort_with(&mut self, compare: &mut dyn FnMut(&T, &T) -> Ordering) -> OpResult {
                let mut items: Vec<T> = std::mem::take(self).into_iter().collect();
                items.sort_by(|a, b| compare(a, b));
                *self = items.into_iter().collect();
                Ok(())
            }

            fn replace_all(&mut self, operator: &mut dyn FnMut(&T) -> T) -> OpResult {
                for value in self.iter_mut() {
                    *value = operator(&*value);
                }
                Ok(())
            }

            fn list_cursor(&mut self) -> OpResult<Box<dyn ListCursor<T> + '_>> {
                Ok(Box::new(IndexedCursor::<T, _>::new(self)))
            }
        }

        impl<T: Clone + PartialEq + 'static> Probeable<T> for $seq<T> {
            fn as_list(&self) -> Option<&dyn ProbeList<T>> {
                Some(self)
            }

            fn as_collection(&self) -> Option<&dyn ProbeCollection<T>> {
                Some(self)
            }
        }
    };
}

sequence_impls!(Vec);
sequence_impls!(VecDeque);
sequence_impls!(LinkedList);

macro_rules! set_impls {
    ($set:ident, $($bound:tt)+) => {
        impl<T: $($bound)+ + Clone + 'static> ProbeCollection<T> for $set<T> {
            fn len(&self) -> usize {
                $set::len(self)
            }

            fn elements(&self) -> Vec<T> {
                self.iter().cloned().collect()
            }

            fn first(&self) -> Option<T> {
                self.iter().next().cloned()
            }

            fn duplicate(&self) -> Box<dyn ProbeCollection<T>> {
                Box::new(self.clone())
            }

            fn add(&mut self, value: T) -> OpResult {
                $set::insert(self, value);
                Ok(())
            }

            fn add_all(&mut self, values: Vec<T>) -> OpResult {
                self.extend(values);
                Ok(())
            }

            fn remove(&mut self, value: &T) -> OpResult {
                $set::remove(self, value);
                Ok(())
            }

            fn remove_all(&mut self, values: &[T]) -> OpResult {
                $set::retain(self, |v| !values.contains(v));
                Ok(())
            }

            fn retain_all(&mut self, values: &[T]) -> OpResult {
                $set::retain(self, |v| values.contains(v));
                Ok(())
            }

            fn remove_if(&mut self, filter: &mut dyn FnMut(&T) -> bool) -> OpResult {
                $set::retain(self, |v| !filter(v));
                Ok(())
            }

            fn clear(&mut self) -> OpResult {
                $set::clear(self);
                Ok(())
            }

            fn cursor(&mut self) -> OpResult<Box<dyn Cursor<T> + '_>> {
                Ok(Box::new(ElementCursor::<T>::new(self)))
            }
        }

        impl<T: $($bound)+ + Clone + 'static> ProbeSet<T> for $set<T> {
            fn contains(&self, value: &T) -> bool {
                $set::contains(self, value)
            }

            fn duplicate_set(&self) -> Box<dyn ProbeSet<T>> {
                Box::new(self.clone())
            }
        }

        impl<T: $($bound)+ + Clone + 'static> Probeable<T> for $set<T> {
            fn as_set(&self) -> Option<&dyn ProbeSet<T>> {
                Some(self)
            }

            fn as_collection(&self) -> Option<&dyn ProbeCollection<T>> {
                Some(self)
            }
        }
    };
}

set_impls!(HashSet, Eq + Hash);
set_impls!(BTreeSet, Ord);

macro_rules! map_impls {
    ($map:ident, $($bound:tt)+) => {
        impl<K, V> ProbeMap<K, V> for $map<K, V>
        where
            K: $($bound)+ + Clone + 'static,
            V: Clone + 'static,
        {
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn entries(&self) -> Vec<(K, V)> {
                self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }

            fn duplicate(&self) -> Box<dyn ProbeMap<K, V>> {
                Box::new(self.clone())
            }

            fn put(&mut self, key: K, value: V) -> OpResult<Option<V>> {
                Ok($map::insert(self, key, value))
            }

            fn put_all(&mut self, entries: Vec<(K, V)>) -> OpResult {
                self.extend(entries);
                Ok(())
            }

            fn remove(&mut self, key: &K) -> OpResult<Option<V>> {
                Ok($map::remove(self, key))
            }

            fn clear(&mut self) -> OpResult {
                $map::clear(self);
                Ok(())
            }

            fn retain(&mut self, keep: &mut dyn FnMut(&K, &V) -> bool) -> OpResult {
                $map::retain(self, |k, v| keep(k, &*v));
                Ok(())
            }

            fn replace_all(&mut self, function: &mut dyn FnMut(&K, &V) -> V) -> OpResult {
                for (key, value) in self.iter_mut() {
                    *value = function(key, &*value);
                }
                Ok(())
            }
        }
    };
}

map_impls!(HashMap, Eq + Hash);
map_impls!(BTreeMap, Ord);

/// A growable array guarded by a mutex.
///
/// Shared access goes through [`SynchronizedList::push`] and
/// [`SynchronizedList::snapshot`]; the probe only ever reads it and
/// mutates duplicates.
#[derive(Debug, Default)]
pub struct SynchronizedList<T> {
    inner: Mutex<Vec<T>>,
}

impl<T: Clone> SynchronizedList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: Mutex::new(items),
        }
    }

    /// Append through a shared reference.
    pub fn push(&self, value: T) -> OpResult {
        self.inner
            .lock()
            .map_err(|_| CollectionError::Poisoned)?
            .push(value);
        Ok(())
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.read().clone()
    }

    // Readers tolerate poisoning; writers report it.
    fn read(&self) -> MutexGuard<'_, Vec<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn storage(&mut self) -> OpResult<&mut Vec<T>> {
        self.inner.get_mut().map_err(|_| CollectionError::Poisoned)
    }
}

impl<T: Clone> Clone for SynchronizedList<T> {
    fn clone(&self) -> Self {
        Self::new(self.snapshot())
    }
}

impl<T: Clone + PartialEq + 'static> ProbeCollection<T> for SynchronizedList<T> {
    fn len(&self) -> usize {
        self.read().len()
    }

    fn elements(&self) -> Vec<T> {
        self.snapshot()
    }

    fn duplicate(&self) -> Box<dyn ProbeCollection<T>> {
        Box::new(self.clone())
    }

    fn add(&mut self, value: T) -> OpResult {
        ProbeCollection::add(self.storage()?, value)
    }

    fn add_all(&mut self, values: Vec<T>) -> OpResult {
        ProbeCollection::add_all(self.storage()?, values)
    }

    fn remove(&mut self, value: &T) -> OpResult {
        ProbeCollection::remove(self.storage()?, value)
    }

    fn remove_all(&mut self, values: &[T]) -> OpResult {
        ProbeCollection::remove_all(self.storage()?, values)
    }

    fn retain_all(&mut self, values: &[T]) -> OpResult {
        ProbeCollection::retain_all(self.storage()?, values)
    }

    fn remove_if(&mut self, filter: &mut dyn FnMut(&T) -> bool) -> OpResult {
        ProbeCollection::remove_if(self.storage()?, filter)
    }

    fn clear(&mut self) -> OpResult {
        self.storage()?.clear();
        Ok(())
    }

    fn cursor(&mut self) -> OpResult<Box<dyn Cursor<T> + '_>> {
        Ok(Box::new(IndexedCursor::<T, _>::new(self.storage()?)))
    }
}

impl<T: Clone + PartialEq + 'static> ProbeList<T> for SynchronizedList<T> {
    fn element_at(&self, index: usize) -> Option<T> {
        self.read().get(index).cloned()
    }

    fn duplicate_list(&self) -> Box<dyn ProbeList<T>> {
        Box::new(self.clone())
    }

    fn set(&mut self, index: usize, value: T) -> OpResult<T> {
        ProbeList::set(self.storage()?, index, value)
    }

    fn sort_with(&mut self, compare: &mut dyn FnMut(&T, &T) -> Ordering) -> OpResult {
        ProbeList::sort_with(self.storage()?, compare)
    }

    fn replace_all(&mut self, operator: &mut dyn FnMut(&T) -> T) -> OpResult {
        ProbeList::replace_all(self.storage()?, operator)
    }

    fn list_cursor(&mut self) -> OpResult<Box<dyn ListCursor<T> + '_>> {
        Ok(Box::new(IndexedCursor::<T, _>::new(self.storage()?)))
    }
}

impl<T: Clone + PartialEq + 'static> Probeable<T> for SynchronizedList<T> {
    fn as_list(&self) -> Option<&dyn ProbeList<T>> {
        Some(self)
    }

    fn as_collection(&self) -> Option<&dyn ProbeCollection<T>> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vec_collection_ops() {
        let mut v = strings(&["a", "b", "a"]);
        ProbeCollection::remove(&mut v, &"a".to_string()).unwrap();
        assert_eq!(v, strings(&["b", "a"]));
        ProbeCollection::add(&mut v, "c".to_string()).unwrap();
        ProbeCollection::remove_all(&mut v, &strings(&["a"])).unwrap();
        assert_eq!(v, strings(&["b", "c"]));
        ProbeCollection::retain_all(&mut v, &strings(&["c"])).unwrap();
        assert_eq!(v, strings(&["c"]));
    }

    #[test]
    fn test_vec_list_ops() {
        let mut v = vec![3, 1, 2];
        assert_eq!(ProbeList::set(&mut v, 0, 5).unwrap(), 3);
        ProbeList::sort_with(&mut v, &mut |a: &i32, b: &i32| a.cmp(b)).unwrap();
        assert_eq!(v, vec![1, 2, 5]);
        ProbeList::replace_all(&mut v, &mut |x: &i32| x * 10).unwrap();
        assert_eq!(v, vec![10, 20, 50]);
        assert_eq!(
            ProbeList::set(&mut v, 9, 0),
            Err(CollectionError::IndexOutOfBounds { index: 9, len: 3 })
        );
    }

    #[test]
    fn test_linked_list_ops() {
        let mut list: LinkedList<i32> = [1, 2, 3].into_iter().collect();
        ProbeCollection::remove_if(&mut list, &mut |x: &i32| *x == 2).unwrap();
        assert_eq!(ProbeCollection::elements(&list), vec![1, 3]);
        assert_eq!(ProbeList::element_at(&list, 1), Some(3));
        ProbeList::set(&mut list, 1, 7).unwrap();
        assert_eq!(ProbeCollection::elements(&list), vec![1, 7]);
    }

    #[test]
    fn test_duplicate_is_detached() {
        let original: VecDeque<i32> = [1, 2].into_iter().collect();
        let mut copy = ProbeList::duplicate_list(&original);
        copy.clear().unwrap();
        assert!(copy.is_empty());
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn test_set_cursor_remove() {
        let mut set: HashSet<i32> = [4].into_iter().collect();
        {
            let mut cursor = ProbeCollection::cursor(&mut set).unwrap();
            assert_eq!(cursor.advance(), Some(4));
            cursor.remove().unwrap();
        }
        assert!(set.is_empty());
    }

    #[test]
    fn test_map_ops() {
        let mut map: BTreeMap<String, i32> = BTreeMap::new();
        ProbeMap::put(&mut map, "a".to_string(), 1).unwrap();
        ProbeMap::put_all(&mut map, vec![("b".to_string(), 2)]).unwrap();
        ProbeMap::replace_all(&mut map, &mut |_k: &String, v: &i32| v + 1).unwrap();
        assert_eq!(ProbeMap::first_entry(&map), Some(("a".to_string(), 2)));
        ProbeMap::retain(&mut map, &mut |k: &String, _v: &i32| k == "b").unwrap();
        assert_eq!(ProbeMap::len(&map), 1);
    }

    #[test]
    fn test_synchronized_list_shared_push() {
        let list = SynchronizedList::new(vec![1]);
        list.push(2).unwrap();
        assert_eq!(list.snapshot(), vec![1, 2]);
        let copy = ProbeList::duplicate_list(&list);
        assert_eq!(copy.elements(), vec![1, 2]);
    }
}

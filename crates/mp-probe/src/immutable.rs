//! Read-only container families.
//!
//! Every mutating call returns [`CollectionError::Unsupported`]. Cursors
//! handed out by these types refuse mutation as well.

use crate::capability::Probeable;
use crate::container::{
    Cursor, ListCursor, OpResult, ProbeCollection, ProbeList, ProbeMap, ProbeSet,
};
use crate::cursor::ReadOnlyCursor;
use crate::CollectionError;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

fn refuse<R>() -> OpResult<R> {
    Err(CollectionError::Unsupported)
}

/// An immutable list sharing its storage between copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmutableList<T> {
    items: Arc<[T]>,
}

impl<T> ImmutableList<T> {
    pub fn empty() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }

    pub fn of(value: T) -> Self {
        Self {
            items: Arc::from(vec![value]),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> FromIterator<T> for ImmutableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Clone + 'static> ProbeCollection<T> for ImmutableList<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn elements(&self) -> Vec<T> {
        self.items.to_vec()
    }

    fn duplicate(&self) -> Box<dyn ProbeCollection<T>> {
        Box::new(self.clone())
    }

    fn add(&mut self, _value: T) -> OpResult {
        refuse()
    }

    fn add_all(&mut self, _values: Vec<T>) -> OpResult {
        refuse()
    }

    fn remove(&mut self, _value: &T) -> OpResult {
        refuse()
    }

    fn remove_all(&mut self, _values: &[T]) -> OpResult {
        refuse()
    }

    fn retain_all(&mut self, _values: &[T]) -> OpResult {
        refuse()
    }

    fn remove_if(&mut self, _filter: &mut dyn FnMut(&T) -> bool) -> OpResult {
        refuse()
    }

    fn clear(&mut self) -> OpResult {
        refuse()
    }

    fn cursor(&mut self) -> OpResult<Box<dyn Cursor<T> + '_>> {
        Ok(Box::new(ReadOnlyCursor::new(self.items.to_vec())))
    }
}

impl<T: Clone + 'static> ProbeList<T> for ImmutableList<T> {
    fn element_at(&self, index: usize) -> Option<T> {
        self.items.get(index).cloned()
    }

    fn duplicate_list(&self) -> Box<dyn ProbeList<T>> {
        Box::new(self.clone())
    }

    fn set(&mut self, _index: usize, _value: T) -> OpResult<T> {
        refuse()
    }

    fn sort_with(&mut self, _compare: &mut dyn FnMut(&T, &T) -> Ordering) -> OpResult {
        refuse()
    }

    fn replace_all(&mut self, _operator: &mut dyn FnMut(&T) -> T) -> OpResult {
        refuse()
    }

    fn list_cursor(&mut self) -> OpResult<Box<dyn ListCursor<T> + '_>> {
        Ok(Box::new(ReadOnlyCursor::new(self.items.to_vec())))
    }
}

impl<T: Clone + 'static> Probeable<T> for ImmutableList<T> {
    fn as_list(&self) -> Option<&dyn ProbeList<T>> {
        Some(self)
    }

    fn as_collection(&self) -> Option<&dyn ProbeCollection<T>> {
        Some(self)
    }
}

/// A read-only view over an otherwise mutable container.
///
/// Reads go to the wrapped container; writes are refused. Duplicates wrap
/// a clone of the inner container, so they stay read-only too.
///
/// Structural queries are answered for list inners only. A wrapped set
/// still works with `visit_set`; use [`UnmodifiableSet`] to have it
/// classified as a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmodifiable<C> {
    inner: C,
}

impl<C> Unmodifiable<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<T, C> ProbeCollection<T> for Unmodifiable<C>
where
    T: 'static,
    C: ProbeCollection<T> + Clone + 'static,
{
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn elements(&self) -> Vec<T> {
        self.inner.elements()
    }

    fn duplicate(&self) -> Box<dyn ProbeCollection<T>> {
        Box::new(self.clone())
    }

    fn add(&mut self, _value: T) -> OpResult {
        refuse()
    }

    fn add_all(&mut self, _values: Vec<T>) -> OpResult {
        refuse()
    }

    fn remove(&mut self, _value: &T) -> OpResult {
        refuse()
    }

    fn remove_all(&mut self, _values: &[T]) -> OpResult {
        refuse()
    }

    fn retain_all(&mut self, _values: &[T]) -> OpResult {
        refuse()
    }

    fn remove_if(&mut self, _filter: &mut dyn FnMut(&T) -> bool) -> OpResult {
        refuse()
    }

    fn clear(&mut self) -> OpResult {
        refuse()
    }

    fn cursor(&mut self) -> OpResult<Box<dyn Cursor<T> + '_>> {
        Ok(Box::new(ReadOnlyCursor::new(self.inner.elements())))
    }
}

impl<T, C> ProbeList<T> for Unmodifiable<C>
where
    T: 'static,
    C: ProbeList<T> + Clone + 'static,
{
    fn element_at(&self, index: usize) -> Option<T> {
        self.inner.element_at(index)
    }

    fn duplicate_list(&self) -> Box<dyn ProbeList<T>> {
        Box::new(self.clone())
    }

    fn set(&mut self, _index: usize, _value: T) -> OpResult<T> {
        refuse()
    }

    fn sort_with(&mut self, _compare: &mut dyn FnMut(&T, &T) -> Ordering) -> OpResult {
        refuse()
    }

    fn replace_all(&mut self, _operator: &mut dyn FnMut(&T) -> T) -> OpResult {
        refuse()
    }

    fn list_cursor(&mut self) -> OpResult<Box<dyn ListCursor<T> + '_>> {
        Ok(Box::new(ReadOnlyCursor::new(self.inner.elements())))
    }
}

impl<T, C> ProbeSet<T> for Unmodifiable<C>
where
    T: 'static,
    C: ProbeSet<T> + Clone + 'static,
{
    fn contains(&self, value: &T) -> bool {
        self.inner.contains(value)
    }

    fn duplicate_set(&self) -> Box<dyn ProbeSet<T>> {
        Box::new(self.clone())
    }
}

impl<T, C> Probeable<T> for Unmodifiable<C>
where
    T: 'static,
    C: ProbeList<T> + Clone + 'static,
{
    fn as_list(&self) -> Option<&dyn ProbeList<T>> {
        Some(self)
    }

    fn as_collection(&self) -> Option<&dyn ProbeCollection<T>> {
        Some(self)
    }
}

/// A read-only view over a set that answers the set structural query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmodifiableSet<C> {
    view: Unmodifiable<C>,
}

impl<C> UnmodifiableSet<C> {
    pub fn new(inner: C) -> Self {
        Self {
            view: Unmodifiable::new(inner),
        }
    }

    pub fn get_ref(&self) -> &C {
        self.view.get_ref()
    }
}

impl<T, C> Probeable<T> for UnmodifiableSet<C>
where
    T: 'static,
    C: ProbeSet<T> + Clone + 'static,
{
    fn as_set(&self) -> Option<&dyn ProbeSet<T>> {
        Some(&self.view)
    }

    fn as_collection(&self) -> Option<&dyn ProbeCollection<T>> {
        Some(&self.view)
    }
}

/// An immutable ordered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmutableSet<T> {
    items: Arc<BTreeSet<T>>,
}

impl<T: Ord> FromIterator<T> for ImmutableSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<T: Ord + Clone + 'static> ProbeCollection<T> for ImmutableSet<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn elements(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    fn duplicate(&self) -> Box<dyn ProbeCollection<T>> {
        Box::new(self.clone())
    }

    fn add(&mut self, _value: T) -> OpResult {
        refuse()
    }

    fn add_all(&mut self, _values: Vec<T>) -> OpResult {
        refuse()
    }

    fn remove(&mut self, _value: &T) -> OpResult {
        refuse()
    }

    fn remove_all(&mut self, _values: &[T]) -> OpResult {
        refuse()
    }

    fn retain_all(&mut self, _values: &[T]) -> OpResult {
        refuse()
    }

    fn remove_if(&mut self, _filter: &mut dyn FnMut(&T) -> bool) -> OpResult {
        refuse()
    }

    fn clear(&mut self) -> OpResult {
        refuse()
    }

    fn cursor(&mut self) -> OpResult<Box<dyn Cursor<T> + '_>> {
        Ok(Box::new(ReadOnlyCursor::new(self.elements())))
    }
}

impl<T: Ord + Clone + 'static> ProbeSet<T> for ImmutableSet<T> {
    fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    fn duplicate_set(&self) -> Box<dyn ProbeSet<T>> {
        Box::new(self.clone())
    }
}

impl<T: Ord + Clone + 'static> Probeable<T> for ImmutableSet<T> {
    fn as_set(&self) -> Option<&dyn ProbeSet<T>> {
        Some(self)
    }

    fn as_collection(&self) -> Option<&dyn ProbeCollection<T>> {
        Some(self)
    }
}

/// An immutable ordered map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmutableMap<K, V> {
    entries: Arc<BTreeMap<K, V>>,
}

impl<K: Ord, V> FromIterator<(K, V)> for ImmutableMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<K, V> ProbeMap<K, V> for ImmutableMap<K, V>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
{
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn duplicate(&self) -> Box<dyn ProbeMap<K, V>> {
        Box::new(self.clone())
    }

    fn put(&mut self, _key: K, _value: V) -> OpResult<Option<V>> {
        refuse()
    }

    fn put_all(&mut self, _entries: Vec<(K, V)>) -> OpResult {
        refuse()
    }

    fn remove(&mut self, _key: &K) -> OpResult<Option<V>> {
        refuse()
    }

    fn clear(&mut self) -> OpResult {
        refuse()
    }

    fn retain(&mut self, _keep: &mut dyn FnMut(&K, &V) -> bool) -> OpResult {
        refuse()
    }

    fn replace_all(&mut self, _function: &mut dyn FnMut(&K, &V) -> V) -> OpResult {
        refuse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immutable_list_refuses_everything() {
        let mut list = ImmutableList::of("e".to_string());
        assert_eq!(list.add("x".to_string()), Err(CollectionError::Unsupported));
        assert_eq!(list.clear(), Err(CollectionError::Unsupported));
        assert_eq!(list.set(0, "x".to_string()), Err(CollectionError::Unsupported));
        assert_eq!(list.as_slice(), &["e".to_string()]);
    }

    #[test]
    fn test_unmodifiable_reads_through() {
        let wrapped = Unmodifiable::new(vec![1, 2, 3]);
        assert_eq!(ProbeCollection::<i32>::len(&wrapped), 3);
        assert_eq!(ProbeList::element_at(&wrapped, 2), Some(3));
        let mut copy = ProbeList::<i32>::duplicate_list(&wrapped);
        assert_eq!(copy.add(4), Err(CollectionError::Unsupported));
        assert_eq!(wrapped.get_ref(), &vec![1, 2, 3]);
    }

    #[test]
    fn test_unmodifiable_set_answers_set_query() {
        let wrapped = UnmodifiableSet::new([1, 2].into_iter().collect::<BTreeSet<i32>>());
        assert!(Probeable::<i32>::as_set(&wrapped).is_some());
        assert!(Probeable::<i32>::as_list(&wrapped).is_none());
        let mut copy = Probeable::<i32>::as_set(&wrapped)
            .map(|set| set.duplicate_set())
            .unwrap();
        assert_eq!(copy.remove(&1), Err(CollectionError::Unsupported));
        assert_eq!(wrapped.get_ref().len(), 2);
    }

    #[test]
    fn test_immutable_cursor_refuses() {
        let mut list: ImmutableList<i32> = [1, 2].into_iter().collect();
        let mut cursor = ProbeList::list_cursor(&mut list).unwrap();
        assert_eq!(cursor.advance(), Some(1));
        assert_eq!(cursor.remove(), Err(CollectionError::Unsupported));
    }

    #[test]
    fn test_immutable_map_refuses() {
        let mut map: ImmutableMap<String, i32> = [("a".to_string(), 1)].into_iter().collect();
        assert_eq!(
            ProbeMap::put(&mut map, "b".to_string(), 2),
            Err(CollectionError::Unsupported)
        );
        assert_eq!(ProbeMap::len(&map), 1);
    }
}

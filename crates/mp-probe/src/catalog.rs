//! Operation catalogs.
//!
//! One ordered table per capability. A descriptor names the operation,
//! states what it needs from the working copy, how success is judged and
//! how to invoke it with synthetic arguments. The tables are generic over
//! the shape they run against, so the list catalog reuses the collection
//! descriptors unchanged.

use crate::container::{Cursor, ListCursor, OpResult, ProbeCollection, ProbeList, ProbeMap};
use crate::Capability;
use std::cmp::Ordering;

/// How an attempt that returned normally is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    /// The working copy's observable contents must differ afterwards.
    Changed,
    /// Returning normally is enough. Used by the cursor capabilities,
    /// whose cursors expose no contents to compare.
    Returned,
}

/// What an attempt needs from the working copy before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requires {
    Nothing,
    /// An element already in the copy.
    Element,
    /// An element already in the copy and a value that differs from it.
    Distinct,
}

/// Synthetic arguments for one attempt.
#[derive(Debug, Clone)]
pub struct Args<T> {
    /// A fresh value to insert.
    pub fresh: T,
    /// An element already in the working copy, or the element the cursor
    /// just stepped over.
    pub existing: Option<T>,
    /// A value unequal to `existing`. For maps this is an entry with
    /// the existing key and a different value.
    pub distinct: Option<T>,
}

impl<T> Args<T> {
    /// Whether these arguments satisfy `requires`.
    pub fn satisfy(&self, requires: Requires) -> bool {
        match requires {
            Requires::Nothing => true,
            Requires::Element => self.existing.is_some(),
            Requires::Distinct => self.existing.is_some() && self.distinct.is_some(),
        }
    }
}

/// One canonical mutating operation.
pub struct Operation<S: ?Sized, T> {
    pub name: &'static str,
    pub arity: u8,
    /// Not attempted when the arguments cannot satisfy it.
    pub requires: Requires,
    /// Goes through a cursor obtained from the working copy.
    pub via_cursor: bool,
    pub judgement: Judgement,
    invoke: fn(&mut S, &Args<T>) -> OpResult,
}

impl<S: ?Sized, T> Operation<S, T> {
    fn new(name: &'static str, arity: u8, invoke: fn(&mut S, &Args<T>) -> OpResult) -> Self {
        Self {
            name,
            arity,
            requires: Requires::Nothing,
            via_cursor: false,
            judgement: Judgement::Changed,
            invoke,
        }
    }

    fn needs_element(mut self) -> Self {
        self.requires = Requires::Element;
        self
    }

    fn needs_distinct(mut self) -> Self {
        self.requires = Requires::Distinct;
        self
    }

    fn returned(mut self) -> Self {
        self.judgement = Judgement::Returned;
        self
    }

    fn via_cursor(mut self) -> Self {
        self.via_cursor = true;
        self
    }

    /// Run the operation against a working copy.
    pub fn invoke(&self, target: &mut S, args: &Args<T>) -> OpResult {
        (self.invoke)(target, args)
    }
}

impl<S: ?Sized, T> std::fmt::Debug for Operation<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("requires", &self.requires)
            .field("via_cursor", &self.via_cursor)
            .field("judgement", &self.judgement)
            .finish()
    }
}

pub const COLLECTION_OPERATIONS: &[&str] = &[
    "add",
    "addAll",
    "remove",
    "removeAll",
    "retainAll",
    "clear",
    "removeIf",
    "iterator().remove",
];

pub const LIST_OPERATIONS: &[&str] = &[
    "add",
    "addAll",
    "remove",
    "removeAll",
    "retainAll",
    "clear",
    "removeIf",
    "iterator().remove",
    "set",
    "sort",
    "replaceAll",
    "listIterator().set",
    "listIterator().add",
    "listIterator().remove",
];

pub const MAP_OPERATIONS: &[&str] = &["put", "putAll", "remove", "clear", "retain", "replaceAll"];

pub const ITERATOR_OPERATIONS: &[&str] = &["remove"];

pub const LIST_ITERATOR_OPERATIONS: &[&str] = &["remove", "set", "add"];

/// Operation names for a capability, in catalog order.
pub fn operation_names(capability: Capability) -> &'static [&'static str] {
    match capability {
        Capability::Collection | Capability::Set => COLLECTION_OPERATIONS,
        Capability::List => LIST_OPERATIONS,
        Capability::Map => MAP_OPERATIONS,
        Capability::Iterator => ITERATOR_OPERATIONS,
        Capability::ListIterator => LIST_ITERATOR_OPERATIONS,
    }
}

/// Catalog for unordered collections and sets.
pub fn collection<T, C>() -> Vec<Operation<C, T>>
where
    T: Clone,
    C: ProbeCollection<T> + ?Sized,
{
    vec![
        Operation::new("add", 1, |c: &mut C, a: &Args<T>| c.add(a.fresh.clone())),
        Operation::new("addAll", 1, |c: &mut C, a: &Args<T>| {
            c.add_all(vec![a.fresh.clone()])
        }),
        Operation::new("remove", 1, |c: &mut C, a: &Args<T>| match &a.existing {
            Some(existing) => c.remove(existing),
            None => Ok(()),
        })
        .needs_element(),
        Operation::new("removeAll", 1, |c: &mut C, a: &Args<T>| {
            let values: Vec<T> = a.existing.iter().cloned().collect();
            c.remove_all(&values)
        })
        .needs_element(),
        Operation::new("retainAll", 1, |c: &mut C, _: &Args<T>| c.retain_all(&[]))
            .needs_element(),
        Operation::new("clear", 0, |c: &mut C, _: &Args<T>| c.clear()).needs_element(),
        Operation::new("removeIf", 1, |c: &mut C, _: &Args<T>| {
            c.remove_if(&mut |_: &T| true)
        })
        .needs_element(),
        Operation::new("iterator().remove", 0, |c: &mut C, _: &Args<T>| {
            let mut cursor = c.cursor()?;
            match cursor.advance() {
                Some(_) => cursor.remove(),
                None => Ok(()),
            }
        })
        .needs_element()
        .via_cursor(),
    ]
}

/// Catalog for lists: the collection catalog followed by the ordered,
/// index-addressable operations.
///
/// `set`, `sort` and `replaceAll` are built so that a permitting list
/// always ends up with different contents: `set` and `replaceAll` write
/// the distinct value, and `sort` moves every element equal to the
/// first one behind the rest.
pub fn list<T, L>() -> Vec<Operation<L, T>>
where
    T: Clone + PartialEq,
    L: ProbeList<T> + ?Sized,
{
    let mut operations = collection::<T, L>();
    operations.extend([
        Operation::new("set", 2, |l: &mut L, a: &Args<T>| match &a.distinct {
            Some(distinct) => l.set(0, distinct.clone()).map(|_| ()),
            None => Ok(()),
        })
        .needs_distinct(),
        Operation::new("sort", 1, |l: &mut L, a: &Args<T>| match &a.existing {
            Some(first) => l.sort_with(&mut |x: &T, y: &T| match (x == first, y == first) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => Ordering::Equal,
            }),
            None => Ok(()),
        })
        .needs_distinct(),
        Operation::new("replaceAll", 1, |l: &mut L, a: &Args<T>| match &a.distinct {
            Some(distinct) => l.replace_all(&mut |_: &T| distinct.clone()),
            None => Ok(()),
        })
        .needs_distinct(),
        Operation::new("listIterator().set", 1, |l: &mut L, a: &Args<T>| {
            let mut cursor = l.list_cursor()?;
            match (cursor.advance(), &a.distinct) {
                (Some(_), Some(distinct)) => cursor.set(distinct.clone()),
                _ => Ok(()),
            }
        })
        .needs_distinct()
        .via_cursor(),
        Operation::new("listIterator().add", 1, |l: &mut L, a: &Args<T>| {
            let mut cursor = l.list_cursor()?;
            cursor.advance();
            cursor.add(a.fresh.clone())
        })
        .via_cursor(),
        Operation::new("listIterator().remove", 0, |l: &mut L, _: &Args<T>| {
            let mut cursor = l.list_cursor()?;
            match cursor.advance() {
                Some(_) => cursor.remove(),
                None => Ok(()),
            }
        })
        .needs_element()
        .via_cursor(),
    ]);
    operations
}

/// Catalog for maps. Arguments are entries: `fresh` is a default entry,
/// `existing` the first entry of the working copy and `distinct` that
/// entry's key paired with a different value.
///
/// `put` and `putAll` write the distinct entry when there is one and the
/// fresh entry otherwise.
pub fn map<K, V, M>() -> Vec<Operation<M, (K, V)>>
where
    K: Clone,
    V: Clone,
    M: ProbeMap<K, V> + ?Sized,
{
    vec![
        Operation::new("put", 2, |m: &mut M, a: &Args<(K, V)>| {
            let (key, value) = a.distinct.clone().unwrap_or_else(|| a.fresh.clone());
            m.put(key, value).map(|_| ())
        }),
        Operation::new("putAll", 1, |m: &mut M, a: &Args<(K, V)>| {
            let entry = a.distinct.clone().unwrap_or_else(|| a.fresh.clone());
            m.put_all(vec![entry])
        }),
        Operation::new("remove", 1, |m: &mut M, a: &Args<(K, V)>| match &a.existing {
            Some((key, _)) => m.remove(key).map(|_| ()),
            None => Ok(()),
        })
        .needs_element(),
        Operation::new("clear", 0, |m: &mut M, _: &Args<(K, V)>| m.clear()).needs_element(),
        Operation::new("retain", 1, |m: &mut M, _: &Args<(K, V)>| {
            m.retain(&mut |_: &K, _: &V| false)
        })
        .needs_element(),
        Operation::new("replaceAll", 1, |m: &mut M, a: &Args<(K, V)>| match &a.distinct {
            Some((_, value)) => m.replace_all(&mut |_: &K, _: &V| value.clone()),
            None => Ok(()),
        })
        .needs_distinct(),
    ]
}

/// Catalog for a forward cursor that has already been advanced once.
pub fn iterator<T, C>() -> Vec<Operation<C, T>>
where
    C: Cursor<T> + ?Sized,
{
    vec![Operation::new("remove", 0, |c: &mut C, _: &Args<T>| c.remove())
        .needs_element()
        .returned()]
}

/// Catalog for a list cursor that has already been advanced once.
///
/// Each entry runs against its own fresh cursor; none of them depends on
/// what another did.
pub fn list_iterator<T, C>() -> Vec<Operation<C, T>>
where
    T: Clone,
    C: ListCursor<T> + ?Sized,
{
    vec![
        Operation::new("remove", 0, |c: &mut C, _: &Args<T>| c.remove())
            .needs_element()
            .returned(),
        Operation::new("set", 1, |c: &mut C, a: &Args<T>| match &a.existing {
            Some(existing) => c.set(existing.clone()),
            None => Ok(()),
        })
        .needs_element()
        .returned(),
        Operation::new("add", 1, |c: &mut C, a: &Args<T>| c.add(a.fresh.clone())).returned(),
    ]
}

//! Capability tags and structural classification.
//!
//! A value offered to the probe is queried through [`Probeable`] for each
//! shape it can present. Classification picks the richest shape so that
//! a list is probed with its index-based operations and not just the
//! unordered collection ones.

use crate::container::{
    CursorSource, ListCursorSource, ProbeCollection, ProbeList, ProbeSet,
};
use serde::{Deserialize, Serialize};

/// The single most specific structural classification of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Collection,
    List,
    Set,
    Map,
    Iterator,
    ListIterator,
}

impl Capability {
    /// All capability tags, in classification-rule order for collections
    /// followed by maps.
    pub const ALL: [Capability; 6] = [
        Capability::ListIterator,
        Capability::Iterator,
        Capability::List,
        Capability::Set,
        Capability::Collection,
        Capability::Map,
    ];

    /// Parse from string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "collection" => Some(Capability::Collection),
            "list" => Some(Capability::List),
            "set" => Some(Capability::Set),
            "map" => Some(Capability::Map),
            "iterator" => Some(Capability::Iterator),
            "list_iterator" | "listiterator" => Some(Capability::ListIterator),
            _ => None,
        }
    }

    /// Whether the capability is probed through cursors rather than copies.
    pub fn is_cursor(&self) -> bool {
        matches!(self, Capability::Iterator | Capability::ListIterator)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Capability::Collection => "collection",
            Capability::List => "list",
            Capability::Set => "set",
            Capability::Map => "map",
            Capability::Iterator => "iterator",
            Capability::ListIterator => "list_iterator",
        };
        write!(f, "{}", s)
    }
}

/// Structural queries a container answers about itself.
///
/// Every method defaults to `None`; an implementation overrides the ones
/// matching the shapes it actually satisfies. A list should answer both
/// [`Probeable::as_list`] and [`Probeable::as_collection`].
pub trait Probeable<T> {
    fn as_list_cursor_source(&self) -> Option<&dyn ListCursorSource<T>> {
        None
    }

    fn as_cursor_source(&self) -> Option<&dyn CursorSource<T>> {
        None
    }

    fn as_list(&self) -> Option<&dyn ProbeList<T>> {
        None
    }

    fn as_set(&self) -> Option<&dyn ProbeSet<T>> {
        None
    }

    fn as_collection(&self) -> Option<&dyn ProbeCollection<T>> {
        None
    }
}

/// A container viewed through the shape chosen by [`classify`].
pub enum Shape<'a, T> {
    ListIterator(&'a dyn ListCursorSource<T>),
    Iterator(&'a dyn CursorSource<T>),
    List(&'a dyn ProbeList<T>),
    Set(&'a dyn ProbeSet<T>),
    Collection(&'a dyn ProbeCollection<T>),
    /// Answers none of the structural queries.
    Opaque,
}

impl<T> Shape<'_, T> {
    /// The capability tag for this shape.
    ///
    /// A value answering no query falls through to the generic
    /// collection rule.
    pub fn capability(&self) -> Capability {
        match self {
            Shape::ListIterator(_) => Capability::ListIterator,
            Shape::Iterator(_) => Capability::Iterator,
            Shape::List(_) => Capability::List,
            Shape::Set(_) => Capability::Set,
            Shape::Collection(_) | Shape::Opaque => Capability::Collection,
        }
    }
}

/// Classify a value by its richest matching shape.
///
/// Order: list-iterator, iterator, list, set, collection.
pub fn classify<T>(target: &dyn Probeable<T>) -> Shape<'_, T> {
    if let Some(source) = target.as_list_cursor_source() {
        return Shape::ListIterator(source);
    }
    if let Some(source) = target.as_cursor_source() {
        return Shape::Iterator(source);
    }
    if let Some(list) = target.as_list() {
        return Shape::List(list);
    }
    if let Some(set) = target.as_set() {
        return Shape::Set(set);
    }
    match target.as_collection() {
        Some(collection) => Shape::Collection(collection),
        None => Shape::Opaque,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::SnapshotCursors;
    use crate::immutable::ImmutableList;
    use std::collections::{BTreeSet, HashSet};

    struct Nothing;

    impl Probeable<String> for Nothing {}

    #[test]
    fn test_vec_is_list() {
        let v = vec!["a".to_string()];
        assert_eq!(classify::<String>(&v).capability(), Capability::List);
    }

    #[test]
    fn test_immutable_list_is_list() {
        let list = ImmutableList::of("a".to_string());
        assert_eq!(classify::<String>(&list).capability(), Capability::List);
    }

    #[test]
    fn test_sets_are_sets() {
        let hashed: HashSet<i32> = [1, 2].into_iter().collect();
        let ordered: BTreeSet<i32> = [1, 2].into_iter().collect();
        assert_eq!(classify::<i32>(&hashed).capability(), Capability::Set);
        assert_eq!(classify::<i32>(&ordered).capability(), Capability::Set);
    }

    #[test]
    fn test_cursor_source_wins_over_list() {
        let cursors = SnapshotCursors::new(vec![1, 2, 3]);
        assert_eq!(
            classify::<i32>(&cursors).capability(),
            Capability::ListIterator
        );
    }

    #[test]
    fn test_opaque_falls_through_to_collection() {
        let shape = classify::<String>(&Nothing);
        assert!(matches!(shape, Shape::Opaque));
        assert_eq!(shape.capability(), Capability::Collection);
    }

    #[test]
    fn test_capability_parse_and_display() {
        for cap in Capability::ALL {
            assert_eq!(Capability::parse_str(&cap.to_string()), Some(cap));
        }
        assert_eq!(Capability::parse_str("ListIterator"), Some(Capability::ListIterator));
        assert_eq!(Capability::parse_str("queue"), None);
        assert!(Capability::Iterator.is_cursor());
        assert!(!Capability::Map.is_cursor());
    }
}

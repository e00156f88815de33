//! The mutation probe.
//!
//! [`MutationProbe::detect`] classifies a container, then runs the
//! catalog for its capability. Every attempt gets its own working copy
//! (or its own freshly opened cursor), so one operation's effect never
//! changes whether the next one is observed to succeed. The caller's
//! container is only ever borrowed shared.

use crate::capability::{classify, Shape};
use crate::catalog::{self, Args, Operation};
use crate::container::{
    Cursor, CursorSource, ListCursor, ListCursorSource, ProbeCollection, ProbeList, ProbeMap,
    ProbeSet,
};
use crate::outcome::{MutatingOperations, Outcome};
use crate::policy::ProbePolicy;
use crate::{Capability, ProbeError, Probeable, Result};
use std::ops::DerefMut;
use tracing::{debug, trace};

/// Detects which mutating operations a container actually executes.
#[derive(Debug, Clone, Default)]
pub struct MutationProbe {
    policy: ProbePolicy,
}

impl MutationProbe {
    /// A probe that attempts every catalog operation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ProbePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ProbePolicy {
        &self.policy
    }

    /// Classify `target` and report the operations it permits.
    ///
    /// A value answering none of the structural queries is treated as a
    /// collection with nothing to exercise, and yields an empty result.
    pub fn detect<T>(&self, target: Option<&dyn Probeable<T>>) -> Result<MutatingOperations>
    where
        T: Clone + Default + PartialEq + 'static,
    {
        let target = target.ok_or_else(ProbeError::null_target)?;
        let shape = classify(target);
        debug!(capability = %shape.capability(), "classified probe target");
        match shape {
            Shape::ListIterator(source) => self.visit_list_iterator(Some(source)),
            Shape::Iterator(source) => self.visit_iterator(Some(source)),
            Shape::List(list) => self.visit_list(Some(list)),
            Shape::Set(set) => self.visit_set(Some(set)),
            Shape::Collection(collection) => self.visit_collection(Some(collection)),
            Shape::Opaque => Ok(MutatingOperations::new(Capability::Collection)),
        }
    }

    pub fn visit_collection<T>(
        &self,
        target: Option<&dyn ProbeCollection<T>>,
    ) -> Result<MutatingOperations>
    where
        T: Clone + Default + PartialEq + 'static,
    {
        let target = target.ok_or_else(ProbeError::null_target)?;
        self.attempt_all(
            Capability::Collection,
            catalog::collection::<T, dyn ProbeCollection<T>>(),
            || {
                let copy = target.duplicate();
                let args = element_args(&copy.elements());
                (copy, args)
            },
            |copy| Bag(copy.elements()),
        )
    }

    pub fn visit_list<T>(&self, target: Option<&dyn ProbeList<T>>) -> Result<MutatingOperations>
    where
        T: Clone + Default + PartialEq + 'static,
    {
        let target = target.ok_or_else(ProbeError::null_target)?;
        self.attempt_all(
            Capability::List,
            catalog::list::<T, dyn ProbeList<T>>(),
            || {
                let copy = target.duplicate_list();
                let args = element_args(&copy.elements());
                (copy, args)
            },
            |copy| copy.elements(),
        )
    }

    pub fn visit_set<T>(&self, target: Option<&dyn ProbeSet<T>>) -> Result<MutatingOperations>
    where
        T: Clone + Default + PartialEq + 'static,
    {
        let target = target.ok_or_else(ProbeError::null_target)?;
        self.attempt_all(
            Capability::Set,
            catalog::collection::<T, dyn ProbeSet<T>>(),
            || {
                let copy = target.duplicate_set();
                let args = element_args(&copy.elements());
                (copy, args)
            },
            |copy| Bag(copy.elements()),
        )
    }

    pub fn visit_map<K, V>(
        &self,
        target: Option<&dyn ProbeMap<K, V>>,
    ) -> Result<MutatingOperations>
    where
        K: Clone + Default + PartialEq + 'static,
        V: Clone + Default + PartialEq + 'static,
    {
        let target = target.ok_or_else(ProbeError::null_target)?;
        self.attempt_all(
            Capability::Map,
            catalog::map::<K, V, dyn ProbeMap<K, V>>(),
            || {
                let copy = target.duplicate();
                let args = entry_args(&copy.entries());
                (copy, args)
            },
            |copy| Bag(copy.entries()),
        )
    }

    /// Probe cursors handed out by `source`.
    ///
    /// Each attempt opens a new cursor and advances it once. The source
    /// must back its cursors with copies of the owning collection.
    pub fn visit_iterator<'a, T>(
        &self,
        source: Option<&'a dyn CursorSource<T>>,
    ) -> Result<MutatingOperations>
    where
        T: Clone + Default + 'static,
    {
        let source = source.ok_or_else(ProbeError::null_target)?;
        self.attempt_all(
            Capability::Iterator,
            catalog::iterator::<T, dyn Cursor<T> + 'a>(),
            || {
                let mut cursor = source.open();
                let current = cursor.advance();
                (cursor, cursor_args(current))
            },
            |_| (),
        )
    }

    /// Probe list cursors handed out by `source`, one per attempt.
    pub fn visit_list_iterator<'a, T>(
        &self,
        source: Option<&'a dyn ListCursorSource<T>>,
    ) -> Result<MutatingOperations>
    where
        T: Clone + Default + 'static,
    {
        let source = source.ok_or_else(ProbeError::null_target)?;
        self.attempt_all(
            Capability::ListIterator,
            catalog::list_iterator::<T, dyn ListCursor<T> + 'a>(),
            || {
                let mut cursor = source.open_list();
                let current = cursor.advance();
                (cursor, cursor_args(current))
            },
            |_| (),
        )
    }

    fn attempt_all<T, S, B, O>(
        &self,
        capability: Capability,
        catalog: Vec<Operation<S, T>>,
        mut fresh_copy: impl FnMut() -> (B, Args<T>),
        observe: impl Fn(&S) -> O,
    ) -> Result<MutatingOperations>
    where
        S: ?Sized,
        B: DerefMut<Target = S>,
        O: PartialEq,
    {
        let mut found = MutatingOperations::new(capability);

        for operation in catalog {
            if !self
                .policy
                .allows(capability, operation.name, operation.via_cursor)
            {
                trace!(%capability, operation = operation.name, "excluded by policy");
                continue;
            }

            let (mut copy, args) = fresh_copy();
            if !args.satisfy(operation.requires) {
                trace!(
                    %capability,
                    operation = operation.name,
                    requires = ?operation.requires,
                    "skipped: arguments unavailable"
                );
                continue;
            }

            let before = observe(&*copy);
            let result = operation.invoke(&mut *copy, &args);
            let changed = observe(&*copy) != before;
            let outcome = Outcome::classify(result, operation.judgement, changed);
            trace!(%capability, operation = operation.name, %outcome, "attempted");

            match outcome {
                Outcome::Succeeded => found.record(operation.name),
                Outcome::NoEffect | Outcome::RejectedUnsupported => {}
                Outcome::RejectedOtherError(source) => {
                    return Err(ProbeError::Execution {
                        capability,
                        operation: operation.name,
                        source,
                    });
                }
            }
        }

        debug!(
            %capability,
            found = found.len(),
            operations = ?found.operations,
            "probe finished"
        );
        Ok(found)
    }
}

/// Contents compared as a multiset, for shapes without a defined order.
struct Bag<X>(Vec<X>);

impl<X: PartialEq> PartialEq for Bag<X> {
    fn eq(&self, other: &Self) -> bool {
        let count = |items: &[X], x: &X| items.iter().filter(|y| *y == x).count();
        self.0.len() == other.0.len()
            && self.0.iter().all(|x| count(&self.0, x) == count(&other.0, x))
    }
}

/// Arguments seeded from a copy's elements. The distinct value is
/// another element when one differs from the first, else the default.
fn element_args<T: Clone + Default + PartialEq>(elements: &[T]) -> Args<T> {
    let fresh = T::default();
    let existing = elements.first().cloned();
    let distinct = existing.as_ref().and_then(|first| {
        elements
            .iter()
            .find(|e| *e != first)
            .cloned()
            .or_else(|| (fresh != *first).then(|| fresh.clone()))
    });
    Args {
        fresh,
        existing,
        distinct,
    }
}

/// Arguments seeded from a map's entries. The distinct entry keeps the
/// first key and takes a value that differs from the first value.
fn entry_args<K, V>(entries: &[(K, V)]) -> Args<(K, V)>
where
    K: Clone + Default,
    V: Clone + Default + PartialEq,
{
    let existing = entries.first().cloned();
    let distinct = existing.as_ref().and_then(|(key, value)| {
        entries
            .iter()
            .map(|(_, v)| v)
            .find(|v| *v != value)
            .cloned()
            .or_else(|| Some(V::default()).filter(|v| v != value))
            .map(|v| (key.clone(), v))
    });
    Args {
        fresh: (K::default(), V::default()),
        existing,
        distinct,
    }
}

fn cursor_args<T: Default>(current: Option<T>) -> Args<T> {
    Args {
        fresh: T::default(),
        existing: current,
        distinct: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::SnapshotCursors;
    use crate::immutable::{ImmutableList, ImmutableMap, ImmutableSet, Unmodifiable};
    use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

    fn probe() -> MutationProbe {
        MutationProbe::new()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vec_reports_list_operations() {
        let v = strings(&["a", "b"]);
        let found = probe().detect::<String>(Some(&v)).unwrap();
        assert_eq!(found.capability, Capability::List);
        for name in ["add", "remove", "set", "sort", "replaceAll", "addAll"] {
            assert!(found.contains(name), "missing {name}");
        }
        assert_eq!(v, strings(&["a", "b"]));
    }

    #[test]
    fn test_results_follow_catalog_order() {
        let v = vec![1, 2, 3];
        let found = probe().detect::<i32>(Some(&v)).unwrap();
        let names: Vec<&str> = found.iter().collect();
        assert_eq!(names, catalog::LIST_OPERATIONS);
    }

    #[test]
    fn test_empty_vec_reports_non_element_operations() {
        let v: Vec<i32> = Vec::new();
        let found = probe().detect::<i32>(Some(&v)).unwrap();
        assert!(found.contains("add"));
        assert!(found.contains("addAll"));
        assert!(found.contains("listIterator().add"));
        assert!(!found.contains("remove"));
        assert!(!found.contains("set"));
        assert!(!found.contains("sort"));
        assert!(!found.contains("replaceAll"));
    }

    #[test]
    fn test_reordering_needs_two_distinct_elements() {
        let single = vec![7];
        let found = probe().detect::<i32>(Some(&single)).unwrap();
        assert!(found.contains("set"));
        assert!(found.contains("replaceAll"));
        assert!(!found.contains("sort"));

        let defaults = vec![0, 0];
        let found = probe().detect::<i32>(Some(&defaults)).unwrap();
        assert!(!found.contains("set"));
        assert!(!found.contains("sort"));
        assert!(found.contains("remove"));

        let mixed = vec![3, 3, 4];
        let found = probe().detect::<i32>(Some(&mixed)).unwrap();
        assert!(found.contains("sort"));
        assert_eq!(mixed, vec![3, 3, 4]);
    }

    #[test]
    fn test_element_args() {
        let args = element_args(&[5, 5, 9]);
        assert_eq!(args.existing, Some(5));
        assert_eq!(args.distinct, Some(9));

        let args = element_args(&[5]);
        assert_eq!(args.distinct, Some(0));

        let args = element_args(&[0]);
        assert_eq!(args.distinct, None);

        let args = element_args::<i32>(&[]);
        assert_eq!(args.existing, None);
        assert_eq!(args.distinct, None);
    }

    #[test]
    fn test_entry_args() {
        let args = entry_args(&[("a".to_string(), 1), ("b".to_string(), 2)]);
        assert_eq!(args.distinct, Some(("a".to_string(), 2)));

        let args = entry_args(&[("a".to_string(), 0)]);
        assert_eq!(args.distinct, None);
        assert_eq!(args.fresh, (String::new(), 0));
    }

    #[test]
    fn test_bag_ignores_order() {
        assert!(Bag(vec![1, 2, 2]) == Bag(vec![2, 1, 2]));
        assert!(Bag(vec![1, 2, 2]) != Bag(vec![1, 1, 2]));
        assert!(Bag(vec![1]) != Bag(vec![1, 1]));
    }

    #[test]
    fn test_immutable_families_are_empty() {
        let empty: ImmutableList<i32> = ImmutableList::empty();
        let single = ImmutableList::of(7);
        let wrapped = Unmodifiable::new(vec![7]);
        assert!(probe().detect::<i32>(Some(&empty)).unwrap().is_empty());
        assert!(probe().detect::<i32>(Some(&single)).unwrap().is_empty());
        assert!(probe().detect::<i32>(Some(&wrapped)).unwrap().is_empty());
    }

    #[test]
    fn test_sets() {
        let hashed: HashSet<i32> = [1, 2].into_iter().collect();
        let found = probe().detect::<i32>(Some(&hashed)).unwrap();
        assert_eq!(found.capability, Capability::Set);
        assert!(found.contains("remove"));
        assert!(found.contains("clear"));

        let frozen: ImmutableSet<i32> = [1, 2].into_iter().collect();
        assert!(probe().detect::<i32>(Some(&frozen)).unwrap().is_empty());
    }

    #[test]
    fn test_set_add_of_present_default_is_no_effect() {
        let ordered: BTreeSet<i32> = [0, 5].into_iter().collect();
        let found = probe().visit_set::<i32>(Some(&ordered)).unwrap();
        assert!(!found.contains("add"));
        assert!(found.contains("remove"));
    }

    #[test]
    fn test_deque_collection_entry_point() {
        let deque: VecDeque<i32> = [1, 2].into_iter().collect();
        let found = probe().visit_collection::<i32>(Some(&deque)).unwrap();
        assert_eq!(found.capability, Capability::Collection);
        assert!(found.contains("iterator().remove"));
        assert!(!found.contains("set"));
    }

    #[test]
    fn test_maps() {
        let mut mutable = HashMap::new();
        mutable.insert("k".to_string(), 1);
        let found = probe().visit_map::<String, i32>(Some(&mutable)).unwrap();
        assert_eq!(found.operations, strings(catalog::MAP_OPERATIONS));
        assert_eq!(mutable.len(), 1);

        let frozen: ImmutableMap<String, i32> = [("k".to_string(), 1)].into_iter().collect();
        assert!(probe()
            .visit_map::<String, i32>(Some(&frozen))
            .unwrap()
            .is_empty());

        let empty: BTreeMap<String, i32> = BTreeMap::new();
        let found = probe().visit_map::<String, i32>(Some(&empty)).unwrap();
        assert!(found.contains("put"));
        assert!(!found.contains("remove"));
        assert!(!found.contains("replaceAll"));

        let mut defaults = BTreeMap::new();
        defaults.insert(String::new(), 0);
        let found = probe().visit_map::<String, i32>(Some(&defaults)).unwrap();
        assert!(!found.contains("put"));
        assert!(!found.contains("replaceAll"));
        assert!(found.contains("remove"));
    }

    #[test]
    fn test_snapshot_cursors() {
        let cursors = SnapshotCursors::new(vec![1, 2]);
        let found = probe().detect::<i32>(Some(&cursors)).unwrap();
        assert_eq!(found.capability, Capability::ListIterator);
        assert_eq!(found.iter().collect::<Vec<_>>(), vec!["remove", "set", "add"]);

        let found = probe().visit_iterator::<i32>(Some(&cursors)).unwrap();
        assert_eq!(found.iter().collect::<Vec<_>>(), vec!["remove"]);

        let frozen = SnapshotCursors::read_only(vec![1, 2]);
        assert!(probe().detect::<i32>(Some(&frozen)).unwrap().is_empty());
    }

    #[test]
    fn test_null_rejected_everywhere() {
        let p = probe();
        let errors = [
            p.detect::<i32>(None).unwrap_err(),
            p.visit_collection::<i32>(None).unwrap_err(),
            p.visit_list::<i32>(None).unwrap_err(),
            p.visit_set::<i32>(None).unwrap_err(),
            p.visit_map::<i32, i32>(None).unwrap_err(),
            p.visit_iterator::<i32>(None).unwrap_err(),
            p.visit_list_iterator::<i32>(None).unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(
                err,
                ProbeError::InvalidArgument {
                    parameter: "target"
                }
            ));
        }
    }

    #[test]
    fn test_policy_exclusions() {
        let mut policy = ProbePolicy::default();
        policy.exclude(Capability::List, "sort");
        policy.probe_cursors = false;
        let v = vec![1, 2];
        let found = MutationProbe::with_policy(policy)
            .detect::<i32>(Some(&v))
            .unwrap();
        assert!(!found.contains("sort"));
        assert!(!found.contains("iterator().remove"));
        assert!(!found.contains("listIterator().add"));
        assert!(found.contains("set"));
    }

    #[test]
    fn test_probe_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MutationProbe>();
    }
}

//! Property-based tests for the mutation probe.
//!
//! Uses proptest to check that detection never changes the probed value
//! and that results are stable across random contents.

use mp_probe::catalog::{COLLECTION_OPERATIONS, LIST_OPERATIONS};
use mp_probe::{
    Capability, ImmutableList, MutationProbe, SnapshotCursors, SynchronizedList, Unmodifiable,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};

fn contents() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-50i32..50, 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Sequences come back exactly as they went in.
    #[test]
    fn sequences_unchanged(items in contents()) {
        let probe = MutationProbe::new();

        let vec = items.clone();
        probe.detect::<i32>(Some(&vec)).unwrap();
        prop_assert_eq!(&vec, &items);

        let deque: VecDeque<i32> = items.iter().copied().collect();
        probe.detect::<i32>(Some(&deque)).unwrap();
        prop_assert!(deque.iter().eq(items.iter()));

        let linked: LinkedList<i32> = items.iter().copied().collect();
        probe.detect::<i32>(Some(&linked)).unwrap();
        prop_assert!(linked.iter().eq(items.iter()));

        let synced = SynchronizedList::new(items.clone());
        probe.detect::<i32>(Some(&synced)).unwrap();
        prop_assert_eq!(synced.snapshot(), items);
    }

    /// Sets and maps come back exactly as they went in.
    #[test]
    fn sets_and_maps_unchanged(items in contents()) {
        let probe = MutationProbe::new();

        let hashed: HashSet<i32> = items.iter().copied().collect();
        let hashed_before = hashed.clone();
        probe.detect::<i32>(Some(&hashed)).unwrap();
        prop_assert_eq!(hashed, hashed_before);

        let ordered: BTreeSet<i32> = items.iter().copied().collect();
        let ordered_before = ordered.clone();
        probe.detect::<i32>(Some(&ordered)).unwrap();
        prop_assert_eq!(ordered, ordered_before);

        let map: HashMap<i32, usize> = items.iter().enumerate().map(|(i, v)| (*v, i)).collect();
        let map_before = map.clone();
        probe.visit_map::<i32, usize>(Some(&map)).unwrap();
        prop_assert_eq!(map, map_before);

        let tree: BTreeMap<i32, usize> = items.iter().enumerate().map(|(i, v)| (*v, i)).collect();
        let tree_before = tree.clone();
        probe.visit_map::<i32, usize>(Some(&tree)).unwrap();
        prop_assert_eq!(tree, tree_before);
    }

    /// Mutable lists holding two distinct values permit the whole list
    /// catalog; with fewer, reordering has nothing to observe.
    #[test]
    fn varied_lists_permit_everything(items in prop::collection::vec(any::<i32>(), 2..12)) {
        prop_assume!(items.iter().any(|v| *v != items[0]));
        let found = MutationProbe::new().detect::<i32>(Some(&items)).unwrap();
        prop_assert_eq!(found.capability, Capability::List);
        prop_assert_eq!(found.iter().collect::<Vec<_>>(), LIST_OPERATIONS.to_vec());
    }

    /// Read-only families never report anything, whatever they hold.
    #[test]
    fn read_only_families_always_empty(items in contents()) {
        let probe = MutationProbe::new();

        let frozen: ImmutableList<i32> = items.iter().copied().collect();
        prop_assert!(probe.detect::<i32>(Some(&frozen)).unwrap().is_empty());

        let wrapped = Unmodifiable::new(items.clone());
        prop_assert!(probe.detect::<i32>(Some(&wrapped)).unwrap().is_empty());

        let cursors = SnapshotCursors::read_only(items.clone());
        prop_assert!(probe.detect::<i32>(Some(&cursors)).unwrap().is_empty());
    }

    /// Results only ever name operations from the capability's catalog.
    #[test]
    fn results_stay_within_catalog(items in contents()) {
        let set: BTreeSet<i32> = items.into_iter().collect();
        let found = MutationProbe::new().detect::<i32>(Some(&set)).unwrap();
        for name in found.iter() {
            prop_assert!(COLLECTION_OPERATIONS.contains(&name), "unknown {}", name);
        }
    }
}

//! Fuzz target for detection over arbitrary list contents.
//!
//! Detection must not fail on a plain vector and must leave it unchanged.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mp_probe::{MutationProbe, ProbePolicy, SnapshotCursors};

#[derive(Debug, Arbitrary)]
struct Input {
    items: Vec<u16>,
    probe_cursors: bool,
    read_only_cursors: bool,
}

fuzz_target!(|input: Input| {
    let policy = ProbePolicy {
        probe_cursors: input.probe_cursors,
        ..ProbePolicy::default()
    };
    let probe = MutationProbe::with_policy(policy);

    let before = input.items.clone();
    let found = probe
        .detect::<u16>(Some(&input.items))
        .expect("plain vectors honor every contract");
    assert!(!found.is_empty());
    assert_eq!(input.items, before);

    let cursors = if input.read_only_cursors {
        SnapshotCursors::read_only(input.items.clone())
    } else {
        SnapshotCursors::new(input.items.clone())
    };
    let found = probe
        .detect::<u16>(Some(&cursors))
        .expect("snapshot cursors honor every contract");
    assert_eq!(found.is_empty(), input.read_only_cursors);
});

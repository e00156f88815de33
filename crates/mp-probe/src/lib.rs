//! Mutation-capability probe for assertion subjects.
//!
//! Given a container, the probe reports which mutating operations the
//! container actually executes, so an assertion framework can warn when
//! a value under test is still mutable after the assertion.
//!
//! # Key Features
//!
//! - **Structural classification**: a value is probed with the catalog of
//!   its richest shape (list iterator, iterator, list, set, collection;
//!   maps have their own entry point).
//! - **Working copies**: every operation runs against a fresh duplicate or
//!   a freshly opened cursor. The probed value is only ever borrowed
//!   shared and is never changed.
//! - **Fail loudly**: an operation that fails with anything but
//!   [`CollectionError::Unsupported`] aborts detection with
//!   [`ProbeError::Execution`].
//! - **Configurable catalogs**: [`ProbePolicy`] excludes operations per
//!   capability.
//!
//! # Example
//!
//! ```
//! use mp_probe::{ImmutableList, MutationProbe};
//!
//! let probe = MutationProbe::new();
//!
//! let names = vec!["a".to_string(), "b".to_string()];
//! let found = probe.detect::<String>(Some(&names)).unwrap();
//! assert!(found.contains("add"));
//! assert!(found.contains("set"));
//!
//! let frozen = ImmutableList::of("a".to_string());
//! assert!(probe.detect::<String>(Some(&frozen)).unwrap().is_empty());
//! ```

pub mod capability;
pub mod catalog;
pub mod container;
pub mod cursor;
pub mod error;
pub mod immutable;
pub mod logging;
pub mod outcome;
pub mod policy;
pub mod probe;
pub mod report;
pub mod std_impls;

pub use capability::{classify, Capability, Probeable, Shape};
pub use catalog::{Args, Judgement, Operation, Requires};
pub use container::{
    Cursor, CursorSource, ListCursor, ListCursorSource, OpResult, ProbeCollection, ProbeList,
    ProbeMap, ProbeSet,
};
pub use cursor::{ElementCursor, IndexedCursor, ReadOnlyCursor, SnapshotCursors};
pub use error::{CollectionError, ProbeError, Result};
pub use immutable::{ImmutableList, ImmutableMap, ImmutableSet, Unmodifiable, UnmodifiableSet};
pub use outcome::{MutatingOperations, Outcome};
pub use policy::{ProbePolicy, POLICY_ENV_VAR, POLICY_SCHEMA_VERSION};
pub use probe::MutationProbe;
pub use report::{MutationReport, MutationWarning, REPORT_SCHEMA_VERSION};
pub use std_impls::SynchronizedList;

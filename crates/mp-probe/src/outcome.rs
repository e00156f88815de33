//! Attempt outcomes and the detection result.

use crate::catalog::Judgement;
use crate::container::OpResult;
use crate::{Capability, CollectionError};
use serde::{Deserialize, Serialize};

/// What one attempted operation did to its working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran and its effect was observed.
    Succeeded,
    /// The operation returned normally but left no observable change.
    NoEffect,
    /// The implementation signalled that the operation is not permitted.
    RejectedUnsupported,
    /// Any other failure.
    RejectedOtherError(CollectionError),
}

impl Outcome {
    /// Classify a finished attempt.
    ///
    /// `changed` is whether the working copy's contents differ from before
    /// the attempt; it only matters under [`Judgement::Changed`].
    pub fn classify(result: OpResult, judgement: Judgement, changed: bool) -> Self {
        match result {
            Ok(()) => match judgement {
                Judgement::Returned => Outcome::Succeeded,
                Judgement::Changed if changed => Outcome::Succeeded,
                Judgement::Changed => Outcome::NoEffect,
            },
            Err(err) if err.is_unsupported() => Outcome::RejectedUnsupported,
            Err(err) => Outcome::RejectedOtherError(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Succeeded => write!(f, "succeeded"),
            Outcome::NoEffect => write!(f, "no_effect"),
            Outcome::RejectedUnsupported => write!(f, "unsupported"),
            Outcome::RejectedOtherError(err) => write!(f, "error: {}", err),
        }
    }
}

/// Operations a container was found to execute, in catalog order.
///
/// Empty means the container is judged immutable under its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutatingOperations {
    pub capability: Capability,
    pub operations: Vec<String>,
}

impl MutatingOperations {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            operations: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, name: &str) {
        if !self.contains(name) {
            self.operations.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.iter().any(|op| op == name)
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Alias for [`MutatingOperations::is_empty`].
    pub fn is_immutable(&self) -> bool {
        self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a MutatingOperations {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

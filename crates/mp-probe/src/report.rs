//! Serializable probe reports and mutability warnings.
//!
//! An assertion framework uses these to tell the user that a value they
//! assert on can still be changed after the assertion ran.

use crate::outcome::MutatingOperations;
use crate::{Capability, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version for serialized reports.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Probe result for one subject, stamped with when it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    pub schema_version: String,
    /// Caller-chosen label for the probed value.
    pub subject: String,
    pub capability: Capability,
    pub operations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl MutationReport {
    pub fn new(subject: impl Into<String>, found: &MutatingOperations) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            subject: subject.into(),
            capability: found.capability,
            operations: found.operations.clone(),
            generated_at: Utc::now(),
        }
    }

    pub fn is_immutable(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A subject was found to permit mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationWarning {
    pub subject: String,
    pub capability: Capability,
    pub operations: Vec<String>,
}

impl MutationWarning {
    /// A warning when `found` is non-empty, `None` otherwise.
    pub fn check(subject: impl Into<String>, found: &MutatingOperations) -> Option<Self> {
        if found.is_empty() {
            return None;
        }
        Some(Self {
            subject: subject.into(),
            capability: found.capability,
            operations: found.operations.clone(),
        })
    }

    /// Log the warning at `warn` level.
    pub fn emit(&self) {
        tracing::warn!(
            subject = %self.subject,
            capability = %self.capability,
            operations = ?self.operations,
            "{}",
            self
        );
    }
}

impl std::fmt::Display for MutationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is a mutable {}: it permits {}",
            self.subject,
            self.capability,
            self.operations.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(capability: Capability, names: &[&str]) -> MutatingOperations {
        let mut ops = MutatingOperations::new(capability);
        for name in names {
            ops.record(name);
        }
        ops
    }

    #[test]
    fn test_report_json_shape() {
        let report = MutationReport::new("actual", &found(Capability::List, &["add", "set"]));
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["schema_version"], REPORT_SCHEMA_VERSION);
        assert_eq!(value["subject"], "actual");
        assert_eq!(value["capability"], "list");
        assert_eq!(value["operations"][1], "set");
        assert!(value["generated_at"].is_string());
        assert!(!report.is_immutable());
    }

    #[test]
    fn test_report_round_trip() {
        let report = MutationReport::new("s", &found(Capability::Set, &[]));
        let parsed: MutationReport = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(parsed, report);
        assert!(parsed.is_immutable());
    }

    #[test]
    fn test_warning_only_for_mutable() {
        assert!(MutationWarning::check("s", &found(Capability::Set, &[])).is_none());

        let warning =
            MutationWarning::check("names", &found(Capability::List, &["add", "remove"])).unwrap();
        assert_eq!(
            warning.to_string(),
            "names is a mutable list: it permits add, remove"
        );
        warning.emit();
    }
}

//! Probe policy configuration.
//!
//! Catalog membership is a configuration surface: a policy can exclude
//! individual operations per capability, or drop every cursor sub-probe
//! from the collection-shaped catalogs.

use crate::catalog;
use crate::{Capability, ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Schema version for the policy file.
pub const POLICY_SCHEMA_VERSION: &str = "1.0.0";

/// Environment variable naming a policy file.
pub const POLICY_ENV_VAR: &str = "MP_PROBE_POLICY";

/// Probe policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbePolicy {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Operations not to attempt, per capability.
    #[serde(default)]
    pub excluded_operations: BTreeMap<Capability, Vec<String>>,

    /// Whether collection, set and list catalogs include their cursor
    /// sub-probes (`iterator().remove`, `listIterator().*`).
    #[serde(default = "default_true")]
    pub probe_cursors: bool,
}

fn default_schema_version() -> String {
    POLICY_SCHEMA_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            schema_version: POLICY_SCHEMA_VERSION.to_string(),
            excluded_operations: BTreeMap::new(),
            probe_cursors: true,
        }
    }
}

impl ProbePolicy {
    /// Create a policy that attempts every catalog operation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a policy from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let policy: ProbePolicy = serde_json::from_str(content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load policy from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save policy to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the file named by `MP_PROBE_POLICY`, or the default policy
    /// when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(POLICY_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::debug!(path = %path, "loading probe policy");
                Self::load(path.trim())
            }
            _ => Ok(Self::default()),
        }
    }

    /// Check schema version and operation names.
    pub fn validate(&self) -> Result<()> {
        let major = self.schema_version.split('.').next().unwrap_or_default();
        let expected = POLICY_SCHEMA_VERSION.split('.').next().unwrap_or_default();
        if major != expected {
            return Err(ProbeError::Policy(format!(
                "unsupported schema version {} (expected {}.x)",
                self.schema_version, expected
            )));
        }

        for (capability, names) in &self.excluded_operations {
            let known = catalog::operation_names(*capability);
            if let Some(unknown) = names.iter().find(|name| !known.contains(&name.as_str())) {
                return Err(ProbeError::Policy(format!(
                    "unknown {} operation: {}",
                    capability, unknown
                )));
            }
        }
        Ok(())
    }

    /// Exclude an operation for a capability.
    pub fn exclude(&mut self, capability: Capability, name: &str) {
        let names = self.excluded_operations.entry(capability).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    /// Whether an operation should be attempted.
    pub fn allows(&self, capability: Capability, name: &str, via_cursor: bool) -> bool {
        if via_cursor && !capability.is_cursor() && !self.probe_cursors {
            return false;
        }
        !self
            .excluded_operations
            .get(&capability)
            .is_some_and(|names| names.iter().any(|n| n == name))
    }
}

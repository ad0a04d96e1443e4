//! Bundle installation event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Feature toggles active in the target environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentFlags(BTreeMap<String, bool>);

impl EnvironmentFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, enabled: bool) -> Self {
        self.0.insert(name.to_string(), enabled);
        self
    }

    /// Absent flags read as disabled.
    pub fn get(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

/// Event passed to the before/after install hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallationEvent {
    /// Version of the bundle being installed (informational).
    pub version: u64,
    /// Optional bundle identifier (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    #[serde(default)]
    pub environment_flags: EnvironmentFlags,
}

impl InstallationEvent {
    pub fn new(version: u64, environment_flags: EnvironmentFlags) -> Self {
        Self {
            version,
            bundle_id: None,
            environment_flags,
        }
    }
}

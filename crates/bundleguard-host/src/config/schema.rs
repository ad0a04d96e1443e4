use std::collections::BTreeMap;

use serde::Deserialize;
use bundleguard_core::error::{GuardError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    pub version: u32,

    #[serde(default)]
    pub install: InstallSection,

    #[serde(default)]
    pub field_limit: FieldLimitSection,

    #[serde(default)]
    pub records: RecordsSection,
}

impl GuardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GuardError::UnsupportedVersion);
        }

        self.install.validate()?;
        self.field_limit.validate()?;
        self.records.validate()?;

        Ok(())
    }
}

/// Install Guard deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallSection {
    #[serde(default = "default_install_script_id")]
    pub script_id: String,

    #[serde(default = "default_required_feature")]
    pub required_feature: String,

    #[serde(default = "default_sample_record_type")]
    pub sample_record_type: String,

    #[serde(default = "default_sample_field")]
    pub sample_field: String,

    #[serde(default = "default_sample_text")]
    pub sample_text: String,
}

impl Default for InstallSection {
    fn default() -> Self {
        Self {
            script_id: default_install_script_id(),
            required_feature: default_required_feature(),
            sample_record_type: default_sample_record_type(),
            sample_field: default_sample_field(),
            sample_text: default_sample_text(),
        }
    }
}

impl InstallSection {
    pub fn validate(&self) -> Result<()> {
        non_empty("install.script_id", &self.script_id)?;
        non_empty("install.required_feature", &self.required_feature)?;
        non_empty("install.sample_record_type", &self.sample_record_type)?;
        non_empty("install.sample_field", &self.sample_field)?;
        Ok(())
    }
}

/// Field Limit Guard deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldLimitSection {
    #[serde(default = "default_limit_script_id")]
    pub script_id: String,

    #[serde(default = "default_limit_record_type")]
    pub record_type: String,

    #[serde(default = "default_limit_field")]
    pub field: String,

    #[serde(default = "default_limit")]
    pub limit: f64,
}

impl Default for FieldLimitSection {
    fn default() -> Self {
        Self {
            script_id: default_limit_script_id(),
            record_type: default_limit_record_type(),
            field: default_limit_field(),
            limit: default_limit(),
        }
    }
}

impl FieldLimitSection {
    pub fn validate(&self) -> Result<()> {
        non_empty("field_limit.script_id", &self.script_id)?;
        non_empty("field_limit.record_type", &self.record_type)?;
        non_empty("field_limit.field", &self.field)?;
        if !self.limit.is_finite() {
            return Err(GuardError::BadRequest(
                "field_limit.limit must be a finite number".into(),
            ));
        }
        Ok(())
    }
}

/// In-memory host behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordsSection {
    /// record type -> feature flag that must be enabled for the type to exist.
    #[serde(default = "default_gated_types")]
    pub gated_types: BTreeMap<String, String>,
}

impl Default for RecordsSection {
    fn default() -> Self {
        Self {
            gated_types: default_gated_types(),
        }
    }
}

impl RecordsSection {
    pub fn validate(&self) -> Result<()> {
        for (ty, feature) in &self.gated_types {
            non_empty("records.gated_types key", ty)?;
            non_empty(&format!("records.gated_types.{ty}"), feature)?;
        }
        Ok(())
    }
}

fn non_empty(field: &str, v: &str) -> Result<()> {
    if v.trim().is_empty() {
        return Err(GuardError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

fn default_install_script_id() -> String {
    "bundle_automation".into()
}
fn default_required_feature() -> String {
    "ISSUEDB".into()
}
fn default_sample_record_type() -> String {
    "issue".into()
}
fn default_sample_field() -> String {
    "issueabstract".into()
}
fn default_sample_text() -> String {
    "Sample issue to test bundle".into()
}

fn default_limit_script_id() -> String {
    "opportunity_total_limit".into()
}
fn default_limit_record_type() -> String {
    "opportunity".into()
}
fn default_limit_field() -> String {
    "projectedtotal".into()
}
fn default_limit() -> f64 {
    500.0
}

fn default_gated_types() -> BTreeMap<String, String> {
    BTreeMap::from([("issue".to_string(), "ISSUEDB".to_string())])
}

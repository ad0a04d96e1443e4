//! Record state as seen by hooks (field id -> JSON value).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of a host record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordState {
    /// Host record type (e.g. "opportunity", "issue").
    pub record_type: String,
    /// Assigned once the record is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl RecordState {
    pub fn new(record_type: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            id: None,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field set.
    pub fn with_field(mut self, field_id: &str, value: impl Into<Value>) -> Self {
        self.set(field_id, value);
        self
    }

    pub fn set(&mut self, field_id: &str, value: impl Into<Value>) {
        self.fields.insert(field_id.to_string(), value.into());
    }

    pub fn get(&self, field_id: &str) -> Option<&Value> {
        self.fields.get(field_id)
    }

    /// Numeric view of a field.
    ///
    /// JSON numbers are taken as-is and numeric strings are parsed. Missing,
    /// null, boolean, and non-numeric values have no numeric reading.
    pub fn number(&self, field_id: &str) -> Option<f64> {
        match self.fields.get(field_id)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

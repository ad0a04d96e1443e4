//! Record submission event (before-submit lane).

use serde::{Deserialize, Serialize};

use super::record::RecordState;

/// Why the host is submitting the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Create,
    Edit,
    /// Inline edit.
    Xedit,
    Delete,
    Copy,
    Cancel,
    Approve,
    Reject,
    /// Any other host-defined trigger.
    #[serde(other)]
    Other,
}

impl TriggerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerKind::Create => "create",
            TriggerKind::Edit => "edit",
            TriggerKind::Xedit => "xedit",
            TriggerKind::Delete => "delete",
            TriggerKind::Copy => "copy",
            TriggerKind::Cancel => "cancel",
            TriggerKind::Approve => "approve",
            TriggerKind::Reject => "reject",
            TriggerKind::Other => "other",
        }
    }
}

/// Event passed to before-submit hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmissionEvent {
    pub trigger: TriggerKind,
    /// Proposed record state.
    pub new_value: RecordState,
    /// Prior state; absent on create.
    #[serde(default)]
    pub old_value: Option<RecordState>,
}

impl SubmissionEvent {
    pub fn new(trigger: TriggerKind, new_value: RecordState) -> Self {
        Self {
            trigger,
            new_value,
            old_value: None,
        }
    }

    pub fn with_old_value(mut self, old: RecordState) -> Self {
        self.old_value = Some(old);
        self
    }

    /// Record type of the proposed state.
    pub fn record_type(&self) -> &str {
        &self.new_value.record_type
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn unknown_trigger_maps_to_other() {
        let t: TriggerKind = serde_json::from_str("\"markcomplete\"").unwrap();
        assert_eq!(t, TriggerKind::Other);
        let t: TriggerKind = serde_json::from_str("\"xedit\"").unwrap();
        assert_eq!(t.as_str(), "xedit");
    }
}

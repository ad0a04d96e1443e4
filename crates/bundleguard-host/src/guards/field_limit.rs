use bundleguard_core::error::{GuardError, Result};
use bundleguard_core::event::SubmissionEvent;

use crate::config::FieldLimitSection;
use crate::dispatch::UserEventScript;
use crate::host::HostContext;

pub const LIMIT_EXCEEDED_MSG: &str = "Total is greater than the allowable limit";

/// Vetoes a submit when the numeric field exceeds the limit.
pub struct FieldLimitGuard {
    script_id: String,
    record_type: String,
    field: String,
    limit: f64,
}

impl FieldLimitGuard {
    pub fn new(cfg: &FieldLimitSection) -> Self {
        Self {
            script_id: cfg.script_id.clone(),
            record_type: cfg.record_type.clone(),
            field: cfg.field.clone(),
            limit: cfg.limit,
        }
    }

    /// Strict greater-than: a value equal to the limit passes. A missing or
    /// non-numeric value passes.
    pub fn check_before_submit(&self, event: &SubmissionEvent) -> Result<()> {
        let value = event.new_value.number(&self.field);
        tracing::debug!(
            field = %self.field,
            ?value,
            limit = self.limit,
            trigger = event.trigger.as_str(),
            "field limit evaluated"
        );

        match value {
            Some(v) if v > self.limit => Err(GuardError::ValidationFailed(LIMIT_EXCEEDED_MSG.into())),
            _ => Ok(()),
        }
    }
}

impl UserEventScript for FieldLimitGuard {
    fn script_id(&self) -> &str {
        &self.script_id
    }

    fn record_type(&self) -> &str {
        &self.record_type
    }

    fn before_submit(&self, _ctx: &HostContext, event: &SubmissionEvent) -> Result<()> {
        self.check_before_submit(event)
    }
}

#[cfg(test)]
mod tests {
    use bundleguard_core::event::{RecordState, TriggerKind};
    use serde_json::Value;

    use super::*;

    fn guard() -> FieldLimitGuard {
        FieldLimitGuard::new(&FieldLimitSection::default())
    }

    fn with_total(v: impl Into<Value>) -> SubmissionEvent {
        SubmissionEvent::new(
            TriggerKind::Create,
            RecordState::new("opportunity").with_field("projectedtotal", v),
        )
    }

    #[test]
    fn boundary_is_inclusive() {
        assert!(guard().check_before_submit(&with_total(500)).is_ok());
        assert!(guard().check_before_submit(&with_total(500.0)).is_ok());
        assert!(guard().check_before_submit(&with_total(499.99)).is_ok());

        let err = guard().check_before_submit(&with_total(500.000001)).unwrap_err();
        assert_eq!(err.to_string(), LIMIT_EXCEEDED_MSG);
        assert_eq!(err.kind().as_str(), "VALIDATION_FAILED");
    }

    #[test]
    fn approves_iff_value_within_limit() {
        for (v, ok) in [(-1.0, true), (0.0, true), (250.5, true), (500.0, true), (501.0, false), (1e9, false)] {
            let res = guard().check_before_submit(&with_total(v));
            assert_eq!(res.is_ok(), ok, "value={v}");
        }
    }

    #[test]
    fn numeric_string_is_compared() {
        assert!(guard().check_before_submit(&with_total("501")).is_err());
        assert!(guard().check_before_submit(&with_total("500")).is_ok());
    }

    #[test]
    fn missing_or_non_numeric_value_approves() {
        let empty = SubmissionEvent::new(TriggerKind::Edit, RecordState::new("opportunity"));
        assert!(guard().check_before_submit(&empty).is_ok());
        assert!(guard().check_before_submit(&with_total("lots")).is_ok());
        assert!(guard().check_before_submit(&with_total(Value::Null)).is_ok());
    }

    #[test]
    fn old_value_is_ignored() {
        let ev = with_total(10).with_old_value(
            RecordState::new("opportunity").with_field("projectedtotal", 9000),
        );
        assert!(guard().check_before_submit(&ev).is_ok());
    }

    #[test]
    fn every_trigger_is_checked() {
        for trigger in [TriggerKind::Create, TriggerKind::Edit, TriggerKind::Xedit, TriggerKind::Delete] {
            let ev = SubmissionEvent::new(
                trigger,
                RecordState::new("opportunity").with_field("projectedtotal", 501),
            );
            assert!(guard().check_before_submit(&ev).is_err(), "trigger={}", trigger.as_str());
        }
    }

    #[test]
    fn guard_never_mutates_the_event() {
        let ev = with_total(900);
        let before = ev.clone();
        let _ = guard().check_before_submit(&ev);
        assert_eq!(ev, before);
    }
}

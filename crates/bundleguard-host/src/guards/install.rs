use serde_json::Value;

use bundleguard_core::error::{GuardError, Result};
use bundleguard_core::event::InstallationEvent;

use crate::config::InstallSection;
use crate::dispatch::BundleInstallationScript;
use crate::host::{FeatureFlags, HostContext};

/// Error name recorded against a blocked installation.
pub const BEFORE_INSTALL_ERROR: &str = "BEFOREINSTALLERROR";
pub const FEATURE_REQUIRED_MSG: &str = "Issue management feature must be enabled";

/// Error-level audit title when the post-install sample record fails.
pub const SAMPLE_NOT_CREATED: &str = "ISSUENOTCREATED";
const SAMPLE_NOT_CREATED_DETAILS: &str =
    "Issue could not be created, likely because feature was not enabled";

/// Blocks installation into environments without issue management, then
/// proves the environment is writable with a best-effort sample record.
pub struct InstallGuard {
    script_id: String,
    required_feature: String,
    sample_record_type: String,
    sample_field: String,
    sample_text: String,
}

impl InstallGuard {
    pub fn new(cfg: &InstallSection) -> Self {
        Self {
            script_id: cfg.script_id.clone(),
            required_feature: cfg.required_feature.clone(),
            sample_record_type: cfg.sample_record_type.clone(),
            sample_field: cfg.sample_field.clone(),
            sample_text: cfg.sample_text.clone(),
        }
    }

    pub fn check_before_install(&self, ctx: &HostContext, event: &InstallationEvent) -> Result<()> {
        let audit = ctx.audit();
        audit.info(
            "Version of bundle about to be installed",
            Some(&event.version.to_string()),
        );

        let enabled = event.environment_flags.is_enabled(&self.required_feature);
        audit.info("Issue Management Enabled?", Some(if enabled { "true" } else { "false" }));

        if enabled {
            return Ok(());
        }

        audit.error("Issue Management NOT Enabled", None);
        Err(GuardError::PreconditionNotMet {
            name: BEFORE_INSTALL_ERROR.to_string(),
            message: FEATURE_REQUIRED_MSG.to_string(),
            notify_off: true,
        })
    }

    /// Never fails: sample creation errors are logged and swallowed here.
    pub fn run_after_install(&self, ctx: &HostContext, event: &InstallationEvent) -> Result<()> {
        let audit = ctx.audit();
        audit.info("Version of bundle about installed", Some(&event.version.to_string()));

        match self.create_sample(ctx) {
            Ok(id) => audit.info("Issue ID", Some(&id.to_string())),
            Err(e) => {
                tracing::warn!(
                    operation = ctx.operation(),
                    error = %e,
                    code = e.kind().as_str(),
                    "sample record not created"
                );
                audit.error(SAMPLE_NOT_CREATED, Some(SAMPLE_NOT_CREATED_DETAILS));
            }
        }
        Ok(())
    }

    fn create_sample(&self, ctx: &HostContext) -> Result<u64> {
        let mut rec = ctx.records().create(&self.sample_record_type)?;
        rec.set_field(&self.sample_field, Value::String(self.sample_text.clone()))?;
        rec.persist()
    }
}

impl BundleInstallationScript for InstallGuard {
    fn script_id(&self) -> &str {
        &self.script_id
    }

    fn before_install(&self, ctx: &HostContext, event: &InstallationEvent) -> Result<()> {
        self.check_before_install(ctx, event)
    }

    fn after_install(&self, ctx: &HostContext, event: &InstallationEvent) -> Result<()> {
        self.run_after_install(ctx, event)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use bundleguard_core::event::EnvironmentFlags;

    use super::*;
    use crate::host::{AuditLevel, MemoryAuditLog, MemoryRecords, RecordHandle, Records};

    fn guard() -> InstallGuard {
        InstallGuard::new(&InstallSection::default())
    }

    fn gates() -> BTreeMap<String, String> {
        BTreeMap::from([("issue".to_string(), "ISSUEDB".to_string())])
    }

    fn run_before(flags: EnvironmentFlags) -> (Result<()>, Arc<MemoryAuditLog>) {
        let audit = Arc::new(MemoryAuditLog::new());
        let ctx = HostContext::new(
            "op-1",
            Arc::new(MemoryRecords::new(gates(), flags.clone())),
            audit.clone(),
        );
        let res = guard().check_before_install(&ctx, &InstallationEvent::new(4, flags));
        (res, audit)
    }

    #[test]
    fn enabled_flag_approves_with_two_audit_entries() {
        let (res, audit) = run_before(EnvironmentFlags::new().with("ISSUEDB", true));
        assert!(res.is_ok());

        let entries = audit.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.level == AuditLevel::Audit));
        assert_eq!(entries[0].details.as_deref(), Some("4"));
        assert_eq!(entries[1].details.as_deref(), Some("true"));
    }

    #[test]
    fn disabled_or_missing_flag_rejects() {
        for flags in [
            EnvironmentFlags::new().with("ISSUEDB", false),
            EnvironmentFlags::new(),
            EnvironmentFlags::new().with("CRM", true),
        ] {
            let (res, audit) = run_before(flags);
            let err = res.unwrap_err();
            assert_eq!(err.message(), FEATURE_REQUIRED_MSG);

            let rejection = err.rejection().unwrap();
            assert_eq!(rejection.name.as_deref(), Some(BEFORE_INSTALL_ERROR));
            assert!(rejection.suppress_user_notification);

            assert_eq!(audit.count(AuditLevel::Audit), 2);
            assert_eq!(audit.entries()[1].details.as_deref(), Some("false"));
        }
    }

    #[test]
    fn after_install_persists_sample_record() {
        let flags = EnvironmentFlags::new().with("ISSUEDB", true);
        let records = Arc::new(MemoryRecords::new(gates(), flags.clone()));
        let audit = Arc::new(MemoryAuditLog::new());
        let ctx = HostContext::new("op-2", records.clone(), audit.clone());

        guard().run_after_install(&ctx, &InstallationEvent::new(4, flags)).unwrap();

        let stored = records.get(1).unwrap();
        assert_eq!(stored.record_type, "issue");
        assert_eq!(
            stored.get("issueabstract"),
            Some(&Value::from("Sample issue to test bundle"))
        );
        let last = audit.entries().pop().unwrap();
        assert_eq!(last.title, "Issue ID");
        assert_eq!(last.details.as_deref(), Some("1"));
        assert_eq!(audit.count(AuditLevel::Error), 0);
    }

    #[test]
    fn after_install_swallows_unavailable_record_type() {
        let flags = EnvironmentFlags::new().with("ISSUEDB", false);
        let records = Arc::new(MemoryRecords::new(gates(), flags.clone()));
        let audit = Arc::new(MemoryAuditLog::new());
        let ctx = HostContext::new("op-3", records.clone(), audit.clone());

        assert!(guard().run_after_install(&ctx, &InstallationEvent::new(4, flags)).is_ok());
        assert!(records.persisted_ids().is_empty());
        assert_eq!(audit.count(AuditLevel::Error), 1);
        assert_eq!(audit.entries()[1].title, SAMPLE_NOT_CREATED);
    }

    struct RejectingFields;

    struct RejectingHandle;

    impl RecordHandle for RejectingHandle {
        fn set_field(&mut self, field_id: &str, _value: Value) -> Result<()> {
            Err(GuardError::host("INVALID_FLD", format!("no field {field_id}")))
        }
        fn persist(self: Box<Self>) -> Result<u64> {
            Ok(99)
        }
    }

    impl Records for RejectingFields {
        fn create<'a>(&'a self, _record_type: &str) -> Result<Box<dyn RecordHandle + 'a>> {
            Ok(Box::new(RejectingHandle))
        }
    }

    #[test]
    fn after_install_swallows_set_field_failure() {
        let audit = Arc::new(MemoryAuditLog::new());
        let ctx = HostContext::new("op-4", Arc::new(RejectingFields), audit.clone());
        let ev = InstallationEvent::new(4, EnvironmentFlags::new().with("ISSUEDB", true));

        assert!(guard().run_after_install(&ctx, &ev).is_ok());
        assert_eq!(audit.count(AuditLevel::Error), 1);
        assert!(audit.entries().iter().all(|e| e.title != "Issue ID"));
    }
}

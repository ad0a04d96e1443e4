use std::sync::Arc;

use dashmap::DashMap;

use bundleguard_core::error::{GuardError, Result};
use bundleguard_core::event::{InstallationEvent, SubmissionEvent};

use crate::host::HostContext;

/// Install lifecycle points a bundle script can hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPoint {
    BeforeInstall,
    AfterInstall,
}

/// Bundle installation scripts (install lane). Unimplemented points approve.
pub trait BundleInstallationScript: Send + Sync {
    fn script_id(&self) -> &str;

    fn before_install(&self, _ctx: &HostContext, _event: &InstallationEvent) -> Result<()> {
        Ok(())
    }

    fn after_install(&self, _ctx: &HostContext, _event: &InstallationEvent) -> Result<()> {
        Ok(())
    }
}

/// Record scripts (record lane), deployed on one record type.
pub trait UserEventScript: Send + Sync {
    fn script_id(&self) -> &str;
    fn record_type(&self) -> &str;
    fn before_submit(&self, ctx: &HostContext, event: &SubmissionEvent) -> Result<()>;
}

/// Registry and dispatcher for bundle scripts (by script id) and record
/// scripts (by record type, in deployment order).
#[derive(Default)]
pub struct Dispatcher {
    bundle: DashMap<String, Arc<dyn BundleInstallationScript>>,
    user_event: DashMap<String, Vec<Arc<dyn UserEventScript>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            bundle: DashMap::new(),
            user_event: DashMap::new(),
        }
    }

    pub fn register_bundle(&self, script: Arc<dyn BundleInstallationScript>) {
        self.bundle.insert(script.script_id().to_string(), script);
    }

    pub fn register_user_event(&self, script: Arc<dyn UserEventScript>) {
        self.user_event
            .entry(script.record_type().to_string())
            .or_default()
            .push(script);
    }

    pub fn registered_bundle_scripts(&self) -> Vec<String> {
        self.bundle.iter().map(|e| e.key().clone()).collect()
    }

    pub fn registered_record_types(&self) -> Vec<String> {
        self.user_event.iter().map(|e| e.key().clone()).collect()
    }

    pub fn dispatch_install(
        &self,
        script_id: &str,
        point: InstallPoint,
        ctx: &HostContext,
        event: &InstallationEvent,
    ) -> Result<()> {
        let handler = self
            .bundle
            .get(script_id)
            .ok_or_else(|| GuardError::BadRequest(format!("unknown bundle script: {script_id}")))?
            .value()
            .clone();
        match point {
            InstallPoint::BeforeInstall => handler.before_install(ctx, event),
            InstallPoint::AfterInstall => handler.after_install(ctx, event),
        }
    }

    /// Runs every script deployed on the record type; the first rejection
    /// aborts the submit. A type without deployments approves.
    pub fn dispatch_submit(&self, ctx: &HostContext, event: &SubmissionEvent) -> Result<()> {
        let scripts = match self.user_event.get(event.record_type()) {
            Some(e) => e.value().clone(),
            None => return Ok(()),
        };
        for script in scripts {
            tracing::debug!(script = script.script_id(), "before_submit");
            script.before_submit(ctx, event)?;
        }
        Ok(())
    }
}

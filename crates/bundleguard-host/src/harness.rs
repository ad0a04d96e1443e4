//! Host harness: stands in for the platform runtime.
//!
//! Builds the dispatcher from config, registers the built-in guards, and runs
//! one hook invocation at a time against fresh in-memory capabilities. The
//! outcome is recorded as an `OperationStatus`, the way the platform records
//! a script result against the install or save that triggered it.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use bundleguard_core::error::{GuardError, Rejection, Result};
use bundleguard_core::event::{EnvironmentFlags, InstallationEvent, SubmissionEvent};

use crate::config::GuardConfig;
use crate::dispatch::{Dispatcher, InstallPoint};
use crate::guards::{FieldLimitGuard, InstallGuard};
use crate::host::{AuditEntry, HostContext, MemoryAuditLog, MemoryRecords};

/// Lifecycle points the harness can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePoint {
    BeforeInstall,
    AfterInstall,
    BeforeSubmit,
}

impl LifecyclePoint {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecyclePoint::BeforeInstall => "before_install",
            LifecyclePoint::AfterInstall => "after_install",
            LifecyclePoint::BeforeSubmit => "before_submit",
        }
    }
}

impl fmt::Display for LifecyclePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecyclePoint {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "before_install" => Ok(LifecyclePoint::BeforeInstall),
            "after_install" => Ok(LifecyclePoint::AfterInstall),
            "before_submit" => Ok(LifecyclePoint::BeforeSubmit),
            other => Err(GuardError::BadRequest(format!("unknown lifecycle point: {other}"))),
        }
    }
}

/// One hook invocation with its typed event.
#[derive(Debug, Clone)]
pub enum Invocation {
    BeforeInstall(InstallationEvent),
    AfterInstall(InstallationEvent),
    BeforeSubmit(SubmissionEvent),
}

impl Invocation {
    pub fn point(&self) -> LifecyclePoint {
        match self {
            Invocation::BeforeInstall(_) => LifecyclePoint::BeforeInstall,
            Invocation::AfterInstall(_) => LifecyclePoint::AfterInstall,
            Invocation::BeforeSubmit(_) => LifecyclePoint::BeforeSubmit,
        }
    }

    /// Parse the event JSON expected at `point`.
    pub fn from_json(point: LifecyclePoint, raw: &str) -> Result<Self> {
        let bad = |e: serde_json::Error| GuardError::BadRequest(format!("{point} invalid event: {e}"));
        Ok(match point {
            LifecyclePoint::BeforeInstall => Invocation::BeforeInstall(serde_json::from_str(raw).map_err(bad)?),
            LifecyclePoint::AfterInstall => Invocation::AfterInstall(serde_json::from_str(raw).map_err(bad)?),
            LifecyclePoint::BeforeSubmit => Invocation::BeforeSubmit(serde_json::from_str(raw).map_err(bad)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "rejection", rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Rejected(Rejection),
}

/// Result of one invocation, as the host would record it.
#[derive(Debug, Clone, Serialize)]
pub struct OperationStatus {
    pub operation: String,
    pub point: LifecyclePoint,
    pub outcome: Outcome,
    pub audit: Vec<AuditEntry>,
    /// Records persisted by the operation; empty when it was rejected.
    pub created_records: Vec<u64>,
}

impl OperationStatus {
    pub fn is_completed(&self) -> bool {
        self.outcome == Outcome::Completed
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.outcome {
            Outcome::Rejected(r) => Some(r),
            Outcome::Completed => None,
        }
    }
}

#[derive(Clone)]
pub struct Harness {
    inner: Arc<HarnessInner>,
    dispatcher: Arc<Dispatcher>,
}

struct HarnessInner {
    cfg: GuardConfig,
    next_op: AtomicU64,
}

impl Harness {
    /// Build the harness and register the built-in guards.
    pub fn new(cfg: GuardConfig) -> Result<Self> {
        cfg.validate()?;

        let dispatcher = Dispatcher::new();
        dispatcher.register_bundle(Arc::new(InstallGuard::new(&cfg.install)));
        dispatcher.register_user_event(Arc::new(FieldLimitGuard::new(&cfg.field_limit)));

        // sample record type <-> required feature sanity check
        match cfg.records.gated_types.get(&cfg.install.sample_record_type) {
            Some(feature) if *feature != cfg.install.required_feature => {
                tracing::warn!(
                    record_type = %cfg.install.sample_record_type,
                    gate = %feature,
                    required = %cfg.install.required_feature,
                    "sample record type is gated by a feature the install guard does not require"
                );
            }
            None => {
                tracing::warn!(
                    record_type = %cfg.install.sample_record_type,
                    "sample record type is not gated; after_install cannot observe a missing feature"
                );
            }
            _ => {}
        }

        tracing::info!(
            bundle_scripts = ?dispatcher.registered_bundle_scripts(),
            record_types = ?dispatcher.registered_record_types(),
            "harness ready"
        );

        Ok(Self {
            inner: Arc::new(HarnessInner {
                cfg,
                next_op: AtomicU64::new(0),
            }),
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn cfg(&self) -> &GuardConfig {
        &self.inner.cfg
    }

    /// Run one invocation to completion.
    ///
    /// Deliberate rejections become `Outcome::Rejected`; any other error is a
    /// harness failure and is returned as `Err`.
    pub fn run(&self, invocation: &Invocation) -> Result<OperationStatus> {
        let n = self.inner.next_op.fetch_add(1, Ordering::Relaxed) + 1;
        let operation = format!("op-{n}");
        let point = invocation.point();

        let span = tracing::info_span!("hook", operation = %operation, point = %point);
        let _enter = span.enter();

        let flags = match invocation {
            Invocation::BeforeInstall(ev) | Invocation::AfterInstall(ev) => ev.environment_flags.clone(),
            Invocation::BeforeSubmit(_) => EnvironmentFlags::new(),
        };
        let records = Arc::new(MemoryRecords::new(self.cfg().records.gated_types.clone(), flags));
        let audit = Arc::new(MemoryAuditLog::new());
        let ctx = HostContext::new(operation.clone(), records.clone(), audit.clone());

        let script_id = self.cfg().install.script_id.as_str();
        let result = match invocation {
            Invocation::BeforeInstall(ev) => {
                tracing::info!(version = ev.version, "bundle install requested");
                self.dispatcher
                    .dispatch_install(script_id, InstallPoint::BeforeInstall, &ctx, ev)
            }
            Invocation::AfterInstall(ev) => {
                self.dispatcher
                    .dispatch_install(script_id, InstallPoint::AfterInstall, &ctx, ev)
            }
            Invocation::BeforeSubmit(ev) => {
                tracing::info!(record_type = ev.record_type(), trigger = ev.trigger.as_str(), "record submit requested");
                self.dispatcher.dispatch_submit(&ctx, ev)
            }
        };

        let outcome = match result {
            Ok(()) => Outcome::Completed,
            Err(e) => match e.rejection() {
                Some(r) => {
                    tracing::info!(code = r.kind.as_str(), message = %r.message, "operation rejected");
                    if !r.suppress_user_notification {
                        tracing::warn!(message = %r.message, "rejection is shown to the submitting user");
                    }
                    Outcome::Rejected(r)
                }
                None => {
                    tracing::error!(error = %e, code = e.kind().as_str(), "hook failed");
                    return Err(e);
                }
            },
        };

        let created_records = match &outcome {
            Outcome::Completed => records.persisted_ids(),
            Outcome::Rejected(_) => Vec::new(),
        };

        Ok(OperationStatus {
            operation,
            point,
            outcome,
            audit: audit.entries(),
            created_records,
        })
    }
}

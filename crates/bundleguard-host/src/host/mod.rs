//! Host capabilities consumed by the guards.
//!
//! The guards never reach the host directly; they see only these narrow
//! traits through a `HostContext`. The in-memory implementations in
//! [`memory`] back the harness binary and the tests.

pub mod memory;

use std::sync::Arc;

use serde_json::Value;

use bundleguard_core::error::Result;
use bundleguard_core::event::EnvironmentFlags;

pub use memory::{AuditEntry, AuditLevel, MemoryAuditLog, MemoryRecords};

/// Feature-flag lookup.
pub trait FeatureFlags {
    fn is_enabled(&self, name: &str) -> bool;
}

impl FeatureFlags for EnvironmentFlags {
    fn is_enabled(&self, name: &str) -> bool {
        self.get(name)
    }
}

/// A record under construction. Dropping it without `persist` discards it.
pub trait RecordHandle {
    fn set_field(&mut self, field_id: &str, value: Value) -> Result<()>;
    /// Persist and return the assigned identifier.
    fn persist(self: Box<Self>) -> Result<u64>;
}

/// Record factory.
pub trait Records: Send + Sync {
    fn create<'a>(&'a self, record_type: &str) -> Result<Box<dyn RecordHandle + 'a>>;
}

/// Audit trail of the current operation.
pub trait AuditLog: Send + Sync {
    fn info(&self, title: &str, details: Option<&str>);
    fn error(&self, title: &str, details: Option<&str>);
}

/// Capabilities handed to a script for one invocation.
#[derive(Clone)]
pub struct HostContext {
    operation: String,
    records: Arc<dyn Records>,
    audit: Arc<dyn AuditLog>,
}

impl HostContext {
    pub fn new(operation: impl Into<String>, records: Arc<dyn Records>, audit: Arc<dyn AuditLog>) -> Self {
        Self {
            operation: operation.into(),
            records,
            audit,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
    pub fn records(&self) -> &dyn Records {
        self.records.as_ref()
    }
    pub fn audit(&self) -> &dyn AuditLog {
        self.audit.as_ref()
    }
}

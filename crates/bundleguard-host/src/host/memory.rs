//! In-process host capabilities.
//!
//! `MemoryRecords` stores persisted records in a `DashMap` and models the
//! host rule that some record types only exist while a feature is enabled.
//! `MemoryAuditLog` keeps the operation's audit trail and mirrors every entry
//! to `tracing`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use bundleguard_core::error::{GuardError, Result};
use bundleguard_core::event::{EnvironmentFlags, RecordState};

use super::{AuditLog, FeatureFlags, RecordHandle, Records};

/// Host code for a record type that is not available in the environment.
pub const INVALID_RECORD_TYPE: &str = "INVALID_RCRD_TYPE";

pub struct MemoryRecords {
    gates: BTreeMap<String, String>,
    flags: EnvironmentFlags,
    store: DashMap<u64, RecordState>,
    next_id: AtomicU64,
    fail_persist: bool,
}

impl MemoryRecords {
    /// `gates` maps a record type to the feature it requires.
    pub fn new(gates: BTreeMap<String, String>, flags: EnvironmentFlags) -> Self {
        Self {
            gates,
            flags,
            store: DashMap::new(),
            next_id: AtomicU64::new(0),
            fail_persist: false,
        }
    }

    /// Every `persist` fails (simulates a host-side save error).
    pub fn failing_persist(mut self) -> Self {
        self.fail_persist = true;
        self
    }

    pub fn get(&self, id: u64) -> Option<RecordState> {
        self.store.get(&id).map(|r| r.value().clone())
    }

    /// Persisted identifiers in ascending order.
    pub fn persisted_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.store.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }

    fn is_available(&self, record_type: &str) -> bool {
        match self.gates.get(record_type) {
            Some(feature) => self.flags.is_enabled(feature),
            None => true,
        }
    }
}

impl Records for MemoryRecords {
    fn create<'a>(&'a self, record_type: &str) -> Result<Box<dyn RecordHandle + 'a>> {
        if !self.is_available(record_type) {
            return Err(GuardError::host(
                INVALID_RECORD_TYPE,
                format!("record type {record_type} is not available in this environment"),
            ));
        }
        Ok(Box::new(MemoryRecordHandle {
            owner: self,
            state: RecordState::new(record_type),
        }))
    }
}

struct MemoryRecordHandle<'a> {
    owner: &'a MemoryRecords,
    state: RecordState,
}

impl RecordHandle for MemoryRecordHandle<'_> {
    fn set_field(&mut self, field_id: &str, value: Value) -> Result<()> {
        if field_id.is_empty() {
            return Err(GuardError::host("INVALID_FLD", "field id must not be empty"));
        }
        self.state.set(field_id, value);
        Ok(())
    }

    fn persist(self: Box<Self>) -> Result<u64> {
        let MemoryRecordHandle { owner, mut state } = *self;
        if owner.fail_persist {
            return Err(GuardError::host(
                "UNEXPECTED_ERROR",
                format!("save of {} record failed", state.record_type),
            ));
        }
        let id = owner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        state.id = Some(id);
        owner.store.insert(id, state);
        Ok(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Audit,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub level: AuditLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, level: AuditLevel) -> usize {
        self.entries().iter().filter(|e| e.level == level).count()
    }

    fn push(&self, level: AuditLevel, title: &str, details: Option<&str>) {
        // A panic while holding the lock cannot leave a half-written entry.
        let mut g = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        g.push(AuditEntry {
            level,
            title: title.to_string(),
            details: details.map(str::to_string),
        });
    }
}

impl AuditLog for MemoryAuditLog {
    fn info(&self, title: &str, details: Option<&str>) {
        tracing::info!(title, details = details.unwrap_or(""), "audit");
        self.push(AuditLevel::Audit, title, details);
    }

    fn error(&self, title: &str, details: Option<&str>) {
        tracing::error!(title, details = details.unwrap_or(""), "audit");
        self.push(AuditLevel::Error, title, details);
    }
}

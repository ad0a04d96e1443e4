//! Guard deployment config.
//!
//! YAML is parsed with `deny_unknown_fields` everywhere and validated before a
//! `Harness` ever sees it, so a misspelled field id or limit fails at load time
//! rather than silently approving every submit.

pub mod schema;

use std::fs;
use std::path::Path;

use bundleguard_core::error::{GuardError, Result};

pub use schema::{FieldLimitSection, GuardConfig, InstallSection, RecordsSection};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<GuardConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| GuardError::Internal(format!("read config {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GuardConfig> {
    let cfg: GuardConfig = serde_yaml::from_str(s)
        .map_err(|e| GuardError::BadRequest(format!("invalid guard config: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

//! Built-in guards.

pub mod field_limit;
pub mod install;

pub use field_limit::FieldLimitGuard;
pub use install::InstallGuard;

//! Script registry.
//!
//! Bundle scripts are looked up by script id and run at one install point;
//! record scripts are grouped by the record type they are deployed on.

pub mod dispatcher;

pub use dispatcher::{BundleInstallationScript, Dispatcher, InstallPoint, UserEventScript};

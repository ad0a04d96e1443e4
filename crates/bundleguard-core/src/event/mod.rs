//! Hook event types (install lane + record lane).
//!
//! The host builds one event per invocation and hands it to the guards by
//! shared reference:
//! - Install lane: `InstallationEvent` with the bundle version and the
//!   environment's feature toggles.
//! - Record lane: `SubmissionEvent` with the proposed and prior record state.
//!
//! All events deserialize strictly (`deny_unknown_fields`) so a typo in a
//! hand-written event fails loudly instead of silently approving.

pub mod install;
pub mod record;
pub mod submit;

pub use install::{EnvironmentFlags, InstallationEvent};
pub use record::RecordState;
pub use submit::{SubmissionEvent, TriggerKind};

//! bundleguard core: host-agnostic event types, error surface, and rejection codes.
//!
//! This crate defines the contracts shared by the guards, the host harness, and
//! any tooling that produces or inspects hook events. It carries no host or
//! logging dependencies so it can be reused wherever events are built.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed events surface as `GuardError`/`Result` instead of crashing the
//! process that hosts the guards.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod event;

/// Shared result type.
pub use error::{ErrorKind, GuardError, Rejection, Result};

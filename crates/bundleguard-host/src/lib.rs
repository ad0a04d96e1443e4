//! bundleguard host library entry.
//!
//! This crate wires the host capabilities, the built-in guards, the script
//! dispatcher, and the harness config into a stand-in for the platform
//! runtime. It is consumed by the binary (`main.rs`) and by integration tests.

pub mod config;
pub mod dispatch;
pub mod guards;
pub mod harness;
pub mod host;

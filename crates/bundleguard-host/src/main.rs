//! bundleguard-host
//!
//! Runs one hook invocation against the in-memory host:
//! `bundleguard-host <before_install|after_install|before_submit> <event.json> [config.yaml]`
//!
//! Prints the operation status as JSON on stdout; logs go to stderr.
//! Exit code 0 = completed, 1 = rejected, 2 = harness error.

use std::fs;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use bundleguard_core::error::{GuardError, Result};
use bundleguard_host::config;
use bundleguard_host::harness::{Harness, Invocation, LifecyclePoint, OperationStatus};

const DEFAULT_CONFIG: &str = "bundleguard.yaml";

fn main() -> ExitCode {
    // stdout carries the status document only.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(status) if status.is_completed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, code = e.kind().as_str(), "bundleguard-host failed");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<OperationStatus> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (point, event_path) = match args.as_slice() {
        [point, event, ..] => (point.parse::<LifecyclePoint>()?, event.as_str()),
        _ => {
            return Err(GuardError::BadRequest(
                "usage: bundleguard-host <point> <event.json> [config.yaml]".into(),
            ))
        }
    };
    let config_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG);

    let cfg = config::load_from_file(config_path)?;
    let harness = Harness::new(cfg)?;

    let raw = fs::read_to_string(event_path)
        .map_err(|e| GuardError::Internal(format!("read event failed: {e}")))?;
    let invocation = Invocation::from_json(point, &raw)?;

    let status = harness.run(&invocation)?;
    let out = serde_json::to_string_pretty(&status)
        .map_err(|e| GuardError::Internal(format!("encode status failed: {e}")))?;
    println!("{out}");

    Ok(status)
}

//! Shared error type across bundleguard crates.

use serde::Serialize;
use thiserror::Error;

/// Stable error codes recorded against an operation's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The target environment is not configured to run the operation.
    PreconditionNotMet,
    /// A record mutation violates a business rule.
    ValidationFailed,
    /// Malformed config, event, or invocation.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// A host capability call failed.
    HostError,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in status output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::PreconditionNotMet => "PRECONDITION_NOT_MET",
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::HostError => "HOST_ERROR",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Unified error type used by core, guards, and the host harness.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Raised to halt an operation the environment cannot support.
    #[error("{message}")]
    PreconditionNotMet {
        name: String,
        message: String,
        notify_off: bool,
    },
    /// Raised to veto a single record mutation.
    #[error("{0}")]
    ValidationFailed(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("host error ({code}): {message}")]
    Host { code: String, message: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl GuardError {
    /// Map the error to its stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GuardError::PreconditionNotMet { .. } => ErrorKind::PreconditionNotMet,
            GuardError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            GuardError::BadRequest(_) => ErrorKind::BadRequest,
            GuardError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            GuardError::Host { .. } => ErrorKind::HostError,
            GuardError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            GuardError::PreconditionNotMet { message, .. } => message.clone(),
            GuardError::ValidationFailed(msg) => msg.clone(),
            GuardError::Host { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Host-level error helper.
    pub fn host(code: &str, message: impl Into<String>) -> Self {
        GuardError::Host {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Deliberate rejections abort the host operation; everything else is a
    /// harness failure and yields `None`.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            GuardError::PreconditionNotMet {
                name,
                message,
                notify_off,
            } => Some(Rejection {
                kind: ErrorKind::PreconditionNotMet,
                name: Some(name.clone()),
                message: message.clone(),
                suppress_user_notification: *notify_off,
            }),
            GuardError::ValidationFailed(msg) => Some(Rejection {
                kind: ErrorKind::ValidationFailed,
                name: None,
                message: msg.clone(),
                suppress_user_notification: false,
            }),
            _ => None,
        }
    }
}

/// Tagged rejection recorded against the aborted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message: String,
    pub suppress_user_notification: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn precondition_maps_to_suppressed_rejection() {
        let err = GuardError::PreconditionNotMet {
            name: "BEFOREINSTALLERROR".into(),
            message: "feature off".into(),
            notify_off: true,
        };
        assert_eq!(err.to_string(), "feature off");

        let r = err.rejection().expect("deliberate rejection");
        assert_eq!(r.kind, ErrorKind::PreconditionNotMet);
        assert_eq!(r.name.as_deref(), Some("BEFOREINSTALLERROR"));
        assert!(r.suppress_user_notification);
    }

    #[test]
    fn validation_failure_keeps_literal_message() {
        let err = GuardError::ValidationFailed("too big".into());
        assert_eq!(err.kind().as_str(), "VALIDATION_FAILED");
        assert_eq!(err.message(), "too big");
        assert!(!err.rejection().unwrap().suppress_user_notification);
    }

    #[test]
    fn harness_errors_are_not_rejections() {
        assert!(GuardError::BadRequest("x".into()).rejection().is_none());
        assert!(GuardError::host("INVALID_RCRD_TYPE", "nope").rejection().is_none());
        assert!(GuardError::UnsupportedVersion.rejection().is_none());
    }

    #[test]
    fn kind_serializes_as_stable_code() {
        let json = serde_json::to_string(&ErrorKind::HostError).unwrap();
        assert_eq!(json, "\"HOST_ERROR\"");
    }
}

//! Caller-facing error taxonomy for gateway operations.
//!
//! Every failure surface of a tool call (absent state, disallowed host,
//! connection failure, timeout, non-2xx status, malformed upstream data)
//! collapses into exactly one [`GatewayError`] variant. The `Display` output
//! of each variant is the stable string handed back to the calling agent.

use std::time::Duration;

use thiserror::Error;

/// Maximum number of characters of an upstream error body kept in
/// [`GatewayError::UpstreamStatus`].
pub const BODY_EXCERPT_LIMIT: usize = 500;

/// Normalized failure outcome of a gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No valid, live, identity-confirmed server (or no usable model).
    ///
    /// Carries the backend-specific hint shown to the caller.
    #[error("{hint}")]
    NotRunning { hint: String },

    /// The state descriptor names a host outside the loopback allow-set.
    #[error("Error: Host '{0}' not allowed. Only loopback addresses permitted.")]
    HostRejected(String),

    /// The TCP/HTTP connection could not be established or broke mid-flight.
    #[error("Error: Could not connect to {server} at {url}: {detail}")]
    Unreachable {
        server: String,
        url: String,
        detail: String,
    },

    /// The request exceeded its fixed time budget.
    #[error("Error: Request timed out after {budget:?}. Model may be overloaded.")]
    Timeout { budget: Duration },

    /// The backend answered with a non-success status.
    #[error("Error: HTTP {status} - {excerpt}")]
    UpstreamStatus { status: u16, excerpt: String },

    /// The backend answered 2xx but the body was not the expected shape.
    #[error("Error: Invalid response from {server}: {detail}")]
    MalformedResponse { server: String, detail: String },
}

/// Coarse classification of a call outcome, stable across repeated calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    NotRunning,
    HostRejected,
    Unreachable,
    Timeout,
    UpstreamStatus,
    MalformedResponse,
}

impl GatewayError {
    /// Build an upstream status error, keeping at most
    /// [`BODY_EXCERPT_LIMIT`] characters of the body.
    pub fn upstream_status(status: u16, body: &str) -> Self {
        Self::UpstreamStatus {
            status,
            excerpt: body.chars().take(BODY_EXCERPT_LIMIT).collect(),
        }
    }

    /// Classify this error.
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::NotRunning { .. } => OutcomeKind::NotRunning,
            Self::HostRejected(_) => OutcomeKind::HostRejected,
            Self::Unreachable { .. } => OutcomeKind::Unreachable,
            Self::Timeout { .. } => OutcomeKind::Timeout,
            Self::UpstreamStatus { .. } => OutcomeKind::UpstreamStatus,
            Self::MalformedResponse { .. } => OutcomeKind::MalformedResponse,
        }
    }
}

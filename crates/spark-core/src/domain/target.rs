//! Connection target resolution for the llama.cpp path.
//!
//! The state descriptor is writable by any local actor with the caller's
//! privileges, so the host it names is only trusted when it belongs to a
//! fixed loopback allow-set.

use tracing::warn;

use super::ServerState;
use crate::error::GatewayError;

/// Host used when the state descriptor does not name one.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port used when the state descriptor does not name one.
pub const DEFAULT_PORT: u16 = 30000;

/// Hosts considered safe for outbound calls.
pub const LOOPBACK_HOSTS: [&str; 4] = ["127.0.0.1", "localhost", "0.0.0.0", "::1"];

/// Whether `host` is a member of the loopback allow-set (exact match).
pub fn is_loopback_host(host: &str) -> bool {
    LOOPBACK_HOSTS.contains(&host)
}

/// A resolved `(scheme, host, port)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub scheme: &'static str,
    pub host: String,
    pub port: u16,
}

impl ConnectionTarget {
    /// Derive a target from validated state, rejecting non-loopback hosts.
    ///
    /// Pure: no I/O.
    pub fn resolve(state: &ServerState) -> Result<Self, GatewayError> {
        let host = state.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = state.port.unwrap_or(DEFAULT_PORT);

        if !is_loopback_host(host) {
            warn!(host, "Rejecting non-loopback host from state descriptor");
            return Err(GatewayError::HostRejected(host.to_string()));
        }

        Ok(Self {
            scheme: "http",
            host: host.to_string(),
            port,
        })
    }

    /// Base URL without trailing slash. IPv6 literals are bracketed.
    pub fn base_url(&self) -> String {
        if self.host.contains(':') {
            format!("{}://[{}]:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }

    /// Full URL for an endpoint path such as `/health`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

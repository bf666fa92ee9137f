//! HTTP forwarding with bounded timeouts and error normalization.
//!
//! Every call builds its own client with the call's fixed budget; nothing is
//! pooled across invocations. Redirects are never followed, so a 3xx is
//! reported like any other non-success status. Dropping the returned future aborts the
//! in-flight request. All transport, status and decoding failures leave this
//! module as a [`GatewayError`].

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use spark_core::{Backend, GatewayError};
use tracing::{debug, warn};

/// Where a request is going, for error messages.
#[derive(Debug, Clone, Copy)]
pub struct Upstream<'a> {
    pub backend: Backend,
    /// Base URL shown to the caller on connection failures.
    pub base_url: &'a str,
    pub timeout: Duration,
}

impl<'a> Upstream<'a> {
    pub const fn new(backend: Backend, base_url: &'a str, timeout: Duration) -> Self {
        Self {
            backend,
            base_url,
            timeout,
        }
    }

    /// Map a transport error to the caller-facing taxonomy.
    pub fn normalize(&self, err: &reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                budget: self.timeout,
            }
        } else if err.is_decode() {
            self.malformed(err)
        } else {
            GatewayError::Unreachable {
                server: self.backend.display_name().to_string(),
                url: self.base_url.to_string(),
                detail: err.to_string(),
            }
        }
    }

    pub fn malformed(&self, detail: impl std::fmt::Display) -> GatewayError {
        GatewayError::MalformedResponse {
            server: self.backend.display_name().to_string(),
            detail: detail.to_string(),
        }
    }

    fn client(&self) -> Result<Client, GatewayError> {
        Client::builder()
            .timeout(self.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| self.normalize(&e))
    }
}

/// POST `body` as JSON to `url` and decode a JSON response.
pub async fn post_json<B, R>(upstream: &Upstream<'_>, url: &str, body: &B) -> Result<R, GatewayError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    debug!(url, backend = %upstream.backend, "Forwarding request");
    let request = upstream
        .client()?
        .post(url)
        .header("content-type", "application/json")
        .json(body);
    execute(upstream, request).await
}

/// GET `url` and decode a JSON response.
pub async fn get_json<R>(upstream: &Upstream<'_>, url: &str) -> Result<R, GatewayError>
where
    R: DeserializeOwned,
{
    let request = upstream.client()?.get(url);
    execute(upstream, request).await
}

async fn execute<R>(upstream: &Upstream<'_>, request: RequestBuilder) -> Result<R, GatewayError>
where
    R: DeserializeOwned,
{
    let response = request.send().await.map_err(|e| upstream.normalize(&e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), backend = %upstream.backend, "Upstream returned error status");
        return Err(GatewayError::upstream_status(status.as_u16(), &body));
    }

    let bytes = response.bytes().await.map_err(|e| upstream.normalize(&e))?;

    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(backend = %upstream.backend, "Malformed upstream response: {e}");
        upstream.malformed(e)
    })
}

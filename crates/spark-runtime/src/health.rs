//! Health check utilities for llama-server processes.
//!
//! A single bounded-timeout request to the server's `/health` endpoint. No
//! retries and no polling: the gateway re-probes on every status call.
//! Redirects are not followed.

use std::time::Duration;

use reqwest::Client;
use reqwest::redirect::Policy;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

/// Outcome of a single health probe.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthProbe {
    /// 200 OK. Carries the parsed JSON body, `"ok"` for non-JSON bodies, or
    /// `"ok (parse error)"` when a JSON content type failed to parse.
    Healthy(Value),
    /// The server answered with a non-success status.
    Unhealthy(u16),
    /// The request failed at the transport level (refused, timed out, ...).
    Unreachable(String),
}

/// Probe `url` (the full `/health` endpoint) once.
pub async fn probe_health(url: &str, timeout: Duration) -> HealthProbe {
    let client = match Client::builder()
        .timeout(timeout)
        .redirect(Policy::none())
        .build()
    {
        Ok(client) => client,
        Err(e) => return HealthProbe::Unreachable(e.to_string()),
    };

    debug!(url, "Probing server health");

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return HealthProbe::Unreachable(e.to_string()),
    };

    let status = response.status();
    if status.as_u16() != 200 {
        debug!(url, status = status.as_u16(), "Health check returned non-200");
        return HealthProbe::Unhealthy(status.as_u16());
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if !is_json {
        return HealthProbe::Healthy(Value::String("ok".to_string()));
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return HealthProbe::Unreachable(e.to_string()),
    };

    match serde_json::from_slice(&body) {
        Ok(value) => HealthProbe::Healthy(value),
        Err(e) => {
            debug!("Health body is not valid JSON: {e}");
            HealthProbe::Healthy(Value::String("ok (parse error)".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{StatusCode, header},
        response::{IntoResponse, Redirect},
        routing::get,
    };
    use tokio::net::TcpListener;

    async fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/health")
    }

    #[tokio::test]
    async fn json_health_body_is_returned() {
        let url = spawn(Router::new().route(
            "/health",
            get(|| async { Json(serde_json::json!({"status": "ok", "slots_idle": 1})) }),
        ))
        .await;

        let probe = probe_health(&url, Duration::from_secs(5)).await;
        assert_eq!(
            probe,
            HealthProbe::Healthy(serde_json::json!({"status": "ok", "slots_idle": 1}))
        );
    }

    #[tokio::test]
    async fn plain_text_health_is_ok() {
        let url = spawn(Router::new().route("/health", get(|| async { "fine" }))).await;
        let probe = probe_health(&url, Duration::from_secs(5)).await;
        assert_eq!(probe, HealthProbe::Healthy(serde_json::json!("ok")));
    }

    #[tokio::test]
    async fn broken_json_health_is_flagged() {
        let url = spawn(Router::new().route(
            "/health",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{oops").into_response() }),
        ))
        .await;
        let probe = probe_health(&url, Duration::from_secs(5)).await;
        assert_eq!(probe, HealthProbe::Healthy(serde_json::json!("ok (parse error)")));
    }

    #[tokio::test]
    async fn loading_model_is_unhealthy() {
        let url = spawn(Router::new().route(
            "/health",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        ))
        .await;
        let probe = probe_health(&url, Duration::from_secs(5)).await;
        assert_eq!(probe, HealthProbe::Unhealthy(503));
    }

    #[tokio::test]
    async fn redirect_is_not_followed() {
        let url = spawn(Router::new().route(
            "/health",
            get(|| async { Redirect::temporary("http://127.0.0.1:9/health") }),
        ))
        .await;
        let probe = probe_health(&url, Duration::from_secs(5)).await;
        assert_eq!(probe, HealthProbe::Unhealthy(307));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = probe_health(&format!("http://{addr}/health"), Duration::from_secs(5)).await;
        assert!(matches!(probe, HealthProbe::Unreachable(_)));
    }
}

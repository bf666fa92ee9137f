//! End-to-end tests of the llama-server gateway against an in-process backend.

mod common;

use std::time::{Duration, Instant};

use serde_json::{Value, json};
use spark_core::{ChatMessage, OutcomeKind};
use spark_gateway::{
    ChatParams, CompleteParams, InferenceTools, LLAMA_HEALTH_FAILED, LLAMA_NOT_RUNNING,
    StatusReport,
};

use common::backend::{MockBackend, Reply, closed_port};
use common::state::{SERVER_PID, StateDir, live_server, untouched};

fn chat_reply(content: &str) -> Reply {
    Reply::json(&json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

fn hello() -> ChatParams {
    ChatParams::new(vec![ChatMessage::user("hello")])
}

#[tokio::test]
async fn chat_without_state_reports_not_running() {
    let state = StateDir::empty();
    let gateway = state.gateway(untouched());

    let text = gateway.chat(hello()).await;
    assert_eq!(text, format!("Error: {LLAMA_NOT_RUNNING}"));
}

#[tokio::test]
async fn status_without_state_is_plain_diagnostic() {
    let state = StateDir::empty();
    let gateway = state.gateway(untouched());

    let report = gateway.status_report().await;
    assert_eq!(report.kind(), OutcomeKind::NotRunning);
    assert_eq!(report.render(), LLAMA_NOT_RUNNING);
}

#[tokio::test]
async fn recycled_pid_reads_as_not_running() {
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", chat_reply("unused"))
        .spawn()
        .await;
    let state = StateDir::with_descriptor(&json!({
        "pid": SERVER_PID + 1,
        "host": "127.0.0.1",
        "port": backend.port()
    }));
    let gateway = state.gateway(live_server());

    let text = gateway.chat(hello()).await;
    assert_eq!(text, format!("Error: {LLAMA_NOT_RUNNING}"));
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn non_loopback_host_is_rejected_before_any_request() {
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", chat_reply("unused"))
        .spawn()
        .await;
    let state = StateDir::serving("192.168.1.50", backend.port());
    let gateway = state.gateway(live_server());

    let text = gateway.chat(hello()).await;
    assert_eq!(
        text,
        "Error: Host '192.168.1.50' not allowed. Only loopback addresses permitted."
    );

    let status = gateway.status_report().await;
    assert_eq!(status.kind(), OutcomeKind::HostRejected);
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn chat_prepends_system_prompt_and_returns_content() {
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", chat_reply("Hi there"))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let params = hello().with_system_prompt("Be terse.").with_model("ignored");
    let text = gateway.chat(params).await;
    assert_eq!(text, "Hi there");

    let body = backend.last_body("/v1/chat/completions");
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "Be terse."},
            {"role": "user", "content": "hello"}
        ])
    );
    assert_eq!(body["max_tokens"], 2048);
    assert_eq!(body["stream"], false);
    assert!(body.get("model").is_none());
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-9);
}

#[tokio::test]
async fn existing_system_message_wins_over_system_prompt() {
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", chat_reply("ok"))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let params = ChatParams::new(vec![
        ChatMessage::system("old"),
        ChatMessage::user("hello"),
    ])
    .with_system_prompt("new");
    gateway.chat(params).await;

    let body = backend.last_body("/v1/chat/completions");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], json!({"role": "system", "content": "old"}));
}

#[tokio::test]
async fn empty_choices_is_a_successful_no_response() {
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", Reply::json(&json!({"choices": []})))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    assert_eq!(
        gateway.try_chat(hello()).await.unwrap(),
        "Error: No response from model"
    );
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", Reply::json(&json!({"id": "x"})))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let err = gateway.try_chat(hello()).await.unwrap_err();
    assert_eq!(err.kind(), OutcomeKind::MalformedResponse);
    assert!(err.to_string().starts_with("Error: Invalid response from llama-server: "));
}

#[tokio::test]
async fn unparsable_body_is_malformed() {
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", Reply::raw_json("{not json"))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let err = gateway.try_chat(hello()).await.unwrap_err();
    assert_eq!(err.kind(), OutcomeKind::MalformedResponse);
}

#[tokio::test]
async fn error_status_truncates_body() {
    let long_body = "x".repeat(800);
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", Reply::status(500, &long_body))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let text = gateway.chat(hello()).await;
    assert_eq!(text, format!("Error: HTTP 500 - {}", "x".repeat(500)));
}

#[tokio::test]
async fn redirect_to_another_host_is_not_followed() {
    let foreign = MockBackend::builder()
        .post("/v1/chat/completions", chat_reply("from elsewhere"))
        .spawn()
        .await;
    let location = format!("{}/v1/chat/completions", foreign.url());
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", Reply::redirect(&location))
        .get("/health", Reply::redirect(&format!("{}/health", foreign.url())))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let text = gateway.chat(hello()).await;
    assert!(text.starts_with("Error: HTTP 307"), "got {text}");
    assert_eq!(gateway.status().await, LLAMA_HEALTH_FAILED);
    assert_eq!(foreign.hits(), 0);
}

#[tokio::test]
async fn slow_backend_times_out_within_budget() {
    let backend = MockBackend::builder()
        .post(
            "/v1/chat/completions",
            chat_reply("late").delayed(Duration::from_secs(10)),
        )
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway_with_timeout(live_server(), Duration::from_millis(300));

    let started = Instant::now();
    let text = gateway.chat(hello()).await;
    let elapsed = started.elapsed();

    assert_eq!(
        text,
        "Error: Request timed out after 300ms. Model may be overloaded."
    );
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    let port = closed_port().await;
    let state = StateDir::serving("127.0.0.1", port);
    let gateway = state.gateway(live_server());

    let err = gateway.try_chat(hello()).await.unwrap_err();
    assert_eq!(err.kind(), OutcomeKind::Unreachable);
    assert!(
        err.to_string()
            .starts_with(&format!("Error: Could not connect to llama-server at http://127.0.0.1:{port}"))
    );
}

#[tokio::test]
async fn complete_uses_native_endpoint_and_n_predict() {
    let backend = MockBackend::builder()
        .post("/completion", Reply::json(&json!({"content": " world"})))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let params = CompleteParams::new("hello").with_stop(vec!["\n".to_string()]);
    assert_eq!(gateway.complete(params).await, " world");

    let body = backend.last_body("/completion");
    assert_eq!(body["prompt"], "hello");
    assert_eq!(body["n_predict"], 2048);
    assert_eq!(body["stop"], json!(["\n"]));
    assert!(body.get("max_tokens").is_none());
    assert_eq!(backend.hits_on("/v1/completions"), 0);
}

#[tokio::test]
async fn complete_without_content_is_empty_text() {
    let backend = MockBackend::builder()
        .post("/completion", Reply::json(&json!({"stop": true})))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let params = CompleteParams::new("hello").with_stop(Vec::new());
    assert_eq!(gateway.complete(params).await, "");
    assert!(backend.last_body("/completion").get("stop").is_none());
}

#[tokio::test]
async fn status_reports_health_and_is_idempotent() {
    let backend = MockBackend::builder()
        .get("/health", Reply::json(&json!({"status": "ok"})))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    let first = gateway.status().await;
    let second = gateway.status().await;
    assert_eq!(first, second);

    let json: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(json["status"], "running");
    assert_eq!(json["model"], "qwen2.5-7b");
    assert_eq!(json["port"], backend.port());
    assert_eq!(json["started_at"], "2026-10-16T09:00:00Z");
    assert_eq!(json["health"], json!({"status": "ok"}));
    assert_eq!(backend.hits_on("/health"), 2);
}

#[tokio::test]
async fn status_defaults_missing_model_and_plain_health() {
    let backend = MockBackend::builder()
        .get("/health", Reply::text("OK"))
        .spawn()
        .await;
    let state = StateDir::with_descriptor(&json!({
        "pid": SERVER_PID,
        "port": backend.port()
    }));
    let gateway = state.gateway(live_server());

    let StatusReport::Llama(report) = gateway.status_report().await else {
        panic!("expected a running report");
    };
    assert_eq!(report.model, "unknown");
    assert_eq!(report.health, json!("ok"));
    assert!(report.started_at.is_none());
}

#[tokio::test]
async fn failing_health_check_is_reported() {
    let backend = MockBackend::builder()
        .get("/health", Reply::status(503, "loading"))
        .spawn()
        .await;
    let state = StateDir::serving("127.0.0.1", backend.port());
    let gateway = state.gateway(live_server());

    assert_eq!(gateway.status().await, LLAMA_HEALTH_FAILED);
}

#[tokio::test]
async fn unreachable_server_status_names_state() {
    let port = closed_port().await;
    let state = StateDir::serving("127.0.0.1", port);
    let gateway = state.gateway(live_server());

    let text = gateway.status().await;
    assert!(text.starts_with("llama-server state exists but not responding: "));
}

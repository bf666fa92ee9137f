//! End-to-end tests of the vLLM gateway against an in-process backend.

mod common;

use serde_json::{Value, json};
use spark_core::{ChatMessage, OutcomeKind};
use spark_gateway::{ChatParams, CompleteParams, GatewayConfig, InferenceTools, VllmGateway};

use common::backend::{MockBackend, Reply, closed_port};

fn models(ids: &[&str]) -> Reply {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "object": "model", "owned_by": "vllm"}))
        .collect();
    Reply::json(&json!({"object": "list", "data": data}))
}

fn gateway_for(url: &str) -> VllmGateway {
    VllmGateway::new(&GatewayConfig::new("/nonexistent/state.json", url))
}

fn hello() -> ChatParams {
    ChatParams::new(vec![ChatMessage::user("hello")])
}

#[tokio::test]
async fn chat_resolves_first_model_on_every_call() {
    let backend = MockBackend::builder()
        .get("/v1/models", models(&["m1", "m2"]))
        .post(
            "/v1/chat/completions",
            Reply::json(&json!({"choices": [{"message": {"content": "pong"}}]})),
        )
        .spawn()
        .await;
    let gateway = gateway_for(&backend.url());

    assert_eq!(gateway.chat(hello()).await, "pong");
    assert_eq!(gateway.chat(hello()).await, "pong");

    assert_eq!(backend.hits_on("/v1/models"), 2);
    assert_eq!(backend.last_body("/v1/chat/completions")["model"], "m1");
    assert_eq!(gateway.catalog().last_snapshot().unwrap().ids(), ["m1", "m2"]);
}

#[tokio::test]
async fn explicit_model_skips_catalog() {
    let backend = MockBackend::builder()
        .post(
            "/v1/chat/completions",
            Reply::json(&json!({"choices": [{"message": {"content": "ok"}}]})),
        )
        .spawn()
        .await;
    let gateway = gateway_for(&backend.url());

    let text = gateway.chat(hello().with_model("m2")).await;
    assert_eq!(text, "ok");
    assert_eq!(backend.hits_on("/v1/models"), 0);
    assert_eq!(backend.last_body("/v1/chat/completions")["model"], "m2");
}

#[tokio::test]
async fn complete_uses_openai_endpoint_and_max_tokens() {
    let backend = MockBackend::builder()
        .get("/v1/models", models(&["m1"]))
        .post(
            "/v1/completions",
            Reply::json(&json!({"choices": [{"text": "42", "index": 0}]})),
        )
        .spawn()
        .await;
    let gateway = gateway_for(&backend.url());

    let mut params = CompleteParams::new("The answer is");
    params.max_tokens = 16;
    assert_eq!(gateway.complete(params).await, "42");

    let body = backend.last_body("/v1/completions");
    assert_eq!(body["model"], "m1");
    assert_eq!(body["max_tokens"], 16);
    assert!(body.get("n_predict").is_none());
    assert_eq!(backend.hits_on("/completion"), 0);
}

#[tokio::test]
async fn complete_with_empty_choices_is_no_response() {
    let backend = MockBackend::builder()
        .post("/v1/completions", Reply::json(&json!({"choices": []})))
        .spawn()
        .await;
    let gateway = gateway_for(&backend.url());

    let mut params = CompleteParams::new("x");
    params.model = Some("m1".to_string());
    assert_eq!(gateway.complete(params).await, "Error: No response from model");
}

#[tokio::test]
async fn empty_catalog_reports_no_models() {
    let backend = MockBackend::builder()
        .get("/v1/models", models(&[]))
        .spawn()
        .await;
    let url = backend.url();
    let gateway = gateway_for(&url);

    let text = gateway.chat(hello()).await;
    assert_eq!(
        text,
        format!("Error: vLLM server at {url} has no models available.")
    );
    assert_eq!(backend.hits_on("/v1/chat/completions"), 0);

    let status = gateway.status().await;
    assert_eq!(
        status,
        format!("vLLM server at {url} is not responding or has no models loaded.")
    );
}

#[tokio::test]
async fn status_lists_models() {
    let backend = MockBackend::builder()
        .get("/v1/models", models(&["m1", "m2"]))
        .spawn()
        .await;
    let gateway = gateway_for(&backend.url());

    let json: Value = serde_json::from_str(&gateway.status().await).unwrap();
    assert_eq!(json["status"], "running");
    assert_eq!(json["url"], backend.url());
    assert_eq!(json["models"], json!(["m1", "m2"]));
    assert_eq!(json["default_model"], "m1");
}

#[tokio::test]
async fn unreachable_server_with_explicit_model() {
    let port = closed_port().await;
    let url = format!("http://127.0.0.1:{port}");
    let gateway = gateway_for(&url);

    let err = gateway.try_chat(hello().with_model("m1")).await.unwrap_err();
    assert_eq!(err.kind(), OutcomeKind::Unreachable);
    assert!(
        err.to_string()
            .starts_with(&format!("Error: Could not connect to vLLM at {url}: "))
    );

    assert!(!gateway.status_report().await.is_running());
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    let backend = MockBackend::builder()
        .post("/v1/chat/completions", Reply::status(400, "bad temperature"))
        .spawn()
        .await;
    let gateway = gateway_for(&backend.url());

    let mut params = hello().with_model("m1");
    params.temperature = 99.0;
    assert_eq!(gateway.chat(params).await, "Error: HTTP 400 - bad temperature");
    assert!((backend.last_body("/v1/chat/completions")["temperature"].as_f64().unwrap() - 99.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn failed_catalog_query_keeps_last_snapshot() {
    let backend = MockBackend::builder()
        .get("/v1/models", models(&["m1", "m2"]))
        .spawn()
        .await;
    let gateway = gateway_for(&backend.url());
    assert_eq!(gateway.catalog().list_models().await, ["m1", "m2"]);

    for failure in [Reply::raw_json("{oops"), Reply::status(500, "engine dead")] {
        backend.set_get("/v1/models", failure);

        assert!(gateway.catalog().list_models().await.is_empty());
        assert_eq!(gateway.catalog().last_snapshot().unwrap().ids(), ["m1", "m2"]);
        assert_eq!(
            gateway.chat(hello()).await,
            format!(
                "Error: vLLM server at {} has no models available.",
                backend.url()
            )
        );
    }
    assert_eq!(backend.hits_on("/v1/chat/completions"), 0);
}

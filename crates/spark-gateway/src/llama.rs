//! Gateway for a local llama.cpp `llama-server`.
//!
//! The target is rediscovered on every call: state descriptor, PID identity
//! check, loopback-only host resolution. Nothing is cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use spark_core::{
    Backend, ConnectionTarget, GatewayError, OutcomeKind, ServerState, merge_system_prompt,
};
use spark_runtime::{HealthProbe, ProcessTable, StateReader, probe_health};
use tracing::debug;

use crate::config::GatewayConfig;
use crate::forward::{Upstream, post_json};
use crate::status::{LlamaRunning, StatusReport};
use crate::tools::{ChatParams, CompleteParams, InferenceTools, render};
use crate::wire::{ChatCompletionResponse, ChatRequest, CompletionRequest, NativeCompletionResponse};

/// Status text when no validated server exists.
pub const LLAMA_NOT_RUNNING: &str = "llama-server is not running. Use /llama:serve to start it.";

/// Status text when the health endpoint answers with a non-200 status.
pub const LLAMA_HEALTH_FAILED: &str = "llama-server health check failed";

const BACKEND: Backend = Backend::LlamaCpp;

/// Tool surface for llama-server.
#[derive(Debug, Clone)]
pub struct LlamaGateway {
    state: StateReader,
    probe_timeout: Duration,
    generation_timeout: Duration,
}

impl LlamaGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_state_reader(
            config,
            StateReader::new(&config.state_file, &config.server_binary),
        )
    }

    /// Gateway whose PID checks go through `processes`.
    pub fn with_process_table(config: &GatewayConfig, processes: Arc<dyn ProcessTable>) -> Self {
        Self::with_state_reader(
            config,
            StateReader::with_process_table(&config.state_file, &config.server_binary, processes),
        )
    }

    fn with_state_reader(config: &GatewayConfig, state: StateReader) -> Self {
        Self {
            state,
            probe_timeout: config.probe_timeout,
            generation_timeout: config.generation_timeout,
        }
    }

    fn not_running() -> GatewayError {
        GatewayError::NotRunning {
            hint: format!("Error: {LLAMA_NOT_RUNNING}"),
        }
    }

    fn running_state(&self) -> Result<ServerState, GatewayError> {
        self.state.read().ok_or_else(Self::not_running)
    }

    fn target(&self) -> Result<ConnectionTarget, GatewayError> {
        ConnectionTarget::resolve(&self.running_state()?)
    }

    /// Check state, resolve the target and probe `/health`.
    pub async fn status_report(&self) -> StatusReport {
        let Some(state) = self.state.read() else {
            return StatusReport::unavailable(OutcomeKind::NotRunning, LLAMA_NOT_RUNNING);
        };

        let target = match ConnectionTarget::resolve(&state) {
            Ok(target) => target,
            Err(e) => return StatusReport::unavailable(e.kind(), e.to_string()),
        };

        match probe_health(&target.endpoint("/health"), self.probe_timeout).await {
            HealthProbe::Healthy(health) => StatusReport::Llama(LlamaRunning {
                status: "running",
                model: state.model.unwrap_or_else(|| "unknown".to_string()),
                port: state.port,
                started_at: state.started_at,
                health,
            }),
            HealthProbe::Unhealthy(_) => {
                StatusReport::unavailable(OutcomeKind::UpstreamStatus, LLAMA_HEALTH_FAILED)
            }
            HealthProbe::Unreachable(detail) => StatusReport::unavailable(
                OutcomeKind::Unreachable,
                format!("llama-server state exists but not responding: {detail}"),
            ),
        }
    }

    /// Chat completion against `/v1/chat/completions`.
    pub async fn try_chat(&self, params: ChatParams) -> Result<String, GatewayError> {
        let target = self.target()?;
        let base_url = target.base_url();
        let upstream = Upstream::new(BACKEND, &base_url, self.generation_timeout);

        let messages = merge_system_prompt(params.messages, params.system_prompt.as_deref());
        let request = ChatRequest::new(None, &messages, params.temperature, params.max_tokens);

        debug!(messages = messages.len(), "llama chat");
        let response: ChatCompletionResponse =
            post_json(&upstream, &target.endpoint(BACKEND.chat_path()), &request).await?;
        Ok(response.into_text())
    }

    /// Raw completion against llama.cpp's native `/completion`.
    pub async fn try_complete(&self, params: CompleteParams) -> Result<String, GatewayError> {
        let target = self.target()?;
        let base_url = target.base_url();
        let upstream = Upstream::new(BACKEND, &base_url, self.generation_timeout);

        let request = CompletionRequest::for_backend(
            BACKEND,
            None,
            &params.prompt,
            params.temperature,
            params.max_tokens,
            params.stop.as_deref(),
        );

        let response: NativeCompletionResponse =
            post_json(&upstream, &target.endpoint(BACKEND.completion_path()), &request).await?;
        Ok(response.into_text())
    }
}

#[async_trait]
impl InferenceTools for LlamaGateway {
    fn backend(&self) -> Backend {
        BACKEND
    }

    async fn status(&self) -> String {
        self.status_report().await.render()
    }

    async fn chat(&self, params: ChatParams) -> String {
        render(self.try_chat(params).await)
    }

    async fn complete(&self, params: CompleteParams) -> String {
        render(self.try_complete(params).await)
    }
}

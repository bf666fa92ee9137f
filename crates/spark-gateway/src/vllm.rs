//! Gateway for a vLLM server at a fixed, operator-configured URL.
//!
//! The URL is trusted configuration and is not subject to the loopback
//! allow-set. When the caller names no model, the first entry of a freshly
//! queried catalog is used.

use std::time::Duration;

use async_trait::async_trait;
use spark_core::{Backend, GatewayError, OutcomeKind, merge_system_prompt};
use tracing::debug;

use crate::catalog::ModelResolver;
use crate::config::{GatewayConfig, endpoint_url};
use crate::forward::{Upstream, post_json};
use crate::status::{StatusReport, VllmRunning};
use crate::tools::{ChatParams, CompleteParams, InferenceTools, render};
use crate::wire::{ChatCompletionResponse, ChatRequest, CompletionRequest, TextCompletionResponse};

const BACKEND: Backend = Backend::Vllm;

/// Tool surface for vLLM.
#[derive(Debug)]
pub struct VllmGateway {
    url: String,
    catalog: ModelResolver,
    generation_timeout: Duration,
}

impl VllmGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            url: config.vllm_url.clone(),
            catalog: ModelResolver::new(&config.vllm_url, config.probe_timeout),
            generation_timeout: config.generation_timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub const fn catalog(&self) -> &ModelResolver {
        &self.catalog
    }

    /// Query the catalog and report the served models.
    pub async fn status_report(&self) -> StatusReport {
        let models = self.catalog.list_models().await;
        if models.is_empty() {
            return StatusReport::unavailable(
                OutcomeKind::Unreachable,
                format!(
                    "vLLM server at {} is not responding or has no models loaded.",
                    self.url
                ),
            );
        }

        StatusReport::Vllm(VllmRunning {
            status: "running",
            url: self.url.clone(),
            default_model: models.first().cloned(),
            models,
        })
    }

    /// The caller's model, or the backend's current default.
    async fn resolve_model(&self, requested: Option<String>) -> Result<String, GatewayError> {
        if let Some(model) = requested.filter(|m| !m.is_empty()) {
            return Ok(model);
        }

        self.catalog
            .default_model()
            .await
            .ok_or_else(|| GatewayError::NotRunning {
                hint: format!(
                    "Error: vLLM server at {} has no models available.",
                    self.url
                ),
            })
    }

    fn endpoint(&self, upstream: &Upstream<'_>, path: &str) -> Result<String, GatewayError> {
        endpoint_url(&self.url, path).map_err(|detail| GatewayError::Unreachable {
            server: upstream.backend.display_name().to_string(),
            url: self.url.clone(),
            detail,
        })
    }

    /// Chat completion against `/v1/chat/completions`.
    pub async fn try_chat(&self, params: ChatParams) -> Result<String, GatewayError> {
        let model = self.resolve_model(params.model).await?;
        let upstream = Upstream::new(BACKEND, &self.url, self.generation_timeout);
        let url = self.endpoint(&upstream, BACKEND.chat_path())?;

        let messages = merge_system_prompt(params.messages, params.system_prompt.as_deref());
        let request =
            ChatRequest::new(Some(&model), &messages, params.temperature, params.max_tokens);

        debug!(model = %model, messages = messages.len(), "vLLM chat");
        let response: ChatCompletionResponse = post_json(&upstream, &url, &request).await?;
        Ok(response.into_text())
    }

    /// Raw completion against `/v1/completions`.
    pub async fn try_complete(&self, params: CompleteParams) -> Result<String, GatewayError> {
        let model = self.resolve_model(params.model).await?;
        let upstream = Upstream::new(BACKEND, &self.url, self.generation_timeout);
        let url = self.endpoint(&upstream, BACKEND.completion_path())?;

        let request = CompletionRequest::for_backend(
            BACKEND,
            Some(&model),
            &params.prompt,
            params.temperature,
            params.max_tokens,
            params.stop.as_deref(),
        );

        let response: TextCompletionResponse = post_json(&upstream, &url, &request).await?;
        Ok(response.into_text())
    }
}

#[async_trait]
impl InferenceTools for VllmGateway {
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

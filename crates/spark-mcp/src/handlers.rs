//! Routes MCP methods to the gateway tool surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use spark_core::Backend;
use spark_gateway::{ChatParams, CompleteParams, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, InferenceTools};
use tracing::{debug, info};

use crate::error::McpError;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, ListToolsResult, MCP_PROTOCOL_VERSION,
    McpTool, ServerCapabilities, ServerInfo, ToolsCapability,
};

/// The three operations, named per backend as `<prefix>_<operation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Status,
    Chat,
    Complete,
}

impl ToolKind {
    pub const ALL: [Self; 3] = [Self::Status, Self::Chat, Self::Complete];

    const fn operation(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Chat => "chat",
            Self::Complete => "complete",
        }
    }

    pub fn tool_name(self, backend: Backend) -> String {
        format!("{}_{}", backend.tool_prefix(), self.operation())
    }

    /// Inverse of [`Self::tool_name`] for a given backend.
    pub fn parse(name: &str, backend: Backend) -> Option<Self> {
        let operation = name.strip_prefix(backend.tool_prefix())?.strip_prefix('_')?;
        Self::ALL.into_iter().find(|kind| kind.operation() == operation)
    }

    const fn description(self, backend: Backend) -> &'static str {
        match (self, backend) {
            (Self::Status, Backend::LlamaCpp) => {
                "Check if llama-server is running and return its status."
            }
            (Self::Status, Backend::Vllm) => {
                "Check if the vLLM server is running and list its models."
            }
            (Self::Chat, Backend::LlamaCpp) => {
                "Send a chat completion request to the local llama-server."
            }
            (Self::Chat, Backend::Vllm) => "Send a chat completion request to the vLLM server.",
            (Self::Complete, Backend::LlamaCpp) => {
                "Send a raw completion request to the local llama-server (native /completion endpoint)."
            }
            (Self::Complete, Backend::Vllm) => "Send a raw completion request to the vLLM server.",
        }
    }

    fn input_schema(self, backend: Backend) -> Value {
        let mut properties = match self {
            Self::Status => return json!({"type": "object", "properties": {}}),
            Self::Chat => json!({
                "messages": {
                    "type": "array",
                    "description": "Messages with 'role' (user, assistant, system) and 'content'.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "role": {"type": "string", "enum": ["system", "user", "assistant"]},
                            "content": {"type": "string"}
                        },
                        "required": ["role", "content"]
                    }
                },
                "system_prompt": {
                    "type": "string",
                    "description": "Prepended unless messages already start with a system message."
                }
            }),
            Self::Complete => json!({
                "prompt": {"type": "string", "description": "Text to complete."},
                "stop": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Optional stop sequences."
                }
            }),
        };

        properties["temperature"] = json!({
            "type": "number",
            "description": "Sampling temperature (0.0-2.0).",
            "default": DEFAULT_TEMPERATURE
        });
        properties["max_tokens"] = json!({
            "type": "integer",
            "description": "Maximum tokens to generate.",
            "default": DEFAULT_MAX_TOKENS
        });
        if backend == Backend::Vllm {
            properties["model"] = json!({
                "type": "string",
                "description": "Model to use (default: first available model)."
            });
        }

        let required = if self == Self::Chat { "messages" } else { "prompt" };
        json!({"type": "object", "properties": properties, "required": [required]})
    }
}

/// Handles MCP requests for one backend. Shared by concurrent tool calls.
pub struct RequestHandler {
    tools: Arc<dyn InferenceTools>,
    initialized: AtomicBool,
}

impl RequestHandler {
    pub fn new(tools: Arc<dyn InferenceTools>) -> Self {
        Self {
            tools,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn backend(&self) -> Backend {
        self.tools.backend()
    }

    fn handle_initialize(&self, params: &Value) -> Result<Value, McpError> {
        info!(
            client = %params.pointer("/clientInfo/name").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
            "MCP client connecting"
        );
        self.initialized.store(true, Ordering::Release);

        to_value(&InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION,
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: format!("spark-{}", self.backend().tool_prefix()),
                version: env!("CARGO_PKG_VERSION"),
            },
        })
    }

    pub fn list_tools(&self) -> Vec<McpTool> {
        let backend = self.backend();
        ToolKind::ALL
            .into_iter()
            .map(|kind| McpTool {
                name: kind.tool_name(backend),
                description: kind.description(backend),
                input_schema: kind.input_schema(backend),
            })
            .collect()
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let call: CallToolParams = parse_params(params)?;
        let kind = ToolKind::parse(&call.name, self.backend())
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {}", call.name)))?;
        let arguments = call.arguments.unwrap_or_else(|| json!({}));

        info!(tool = %call.name, "Calling tool");
        let text = match kind {
            ToolKind::Status => self.tools.status().await,
            ToolKind::Chat => self.tools.chat(parse_params::<ChatParams>(arguments)?).await,
            ToolKind::Complete => {
                self.tools
                    .complete(parse_params::<CompleteParams>(arguments)?)
                    .await
            }
        };

        to_value(&CallToolResult::text(text))
    }

    /// Dispatch one method. Notifications get the same routing; their
    /// result is discarded by the caller.
    pub async fn route(&self, method: &str, params: Value) -> Result<Value, McpError> {
        debug!(method, "Routing MCP method");
        match method {
            "initialize" => self.handle_initialize(&params),
            "notifications/initialized" | "notifications/cancelled" | "ping" => Ok(json!({})),
            "tools/list" => to_value(&ListToolsResult {
                tools: self.list_tools(),
            }),
            "tools/call" => self.handle_tools_call(params).await,
            other => Err(McpError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, McpError> {
    serde_json::from_value(params).map_err(|e| McpError::invalid_params(e.to_string()))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::Internal {
        message: format!("Failed to serialize result: {e}"),
    })
}

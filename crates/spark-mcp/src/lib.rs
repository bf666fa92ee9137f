//! MCP (Model Context Protocol) server for the spark gateway.
//!
//! Serves one backend's `status`, `chat` and `complete` tools as
//! `<prefix>_<operation>` over newline-delimited JSON-RPC 2.0.
//!
//! ```text
//! Client <-> Transport (stdio/channel) <-> McpServer <-> RequestHandler <-> InferenceTools
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod transport;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use spark_gateway::InferenceTools;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

pub use error::McpError;
pub use handlers::{RequestHandler, ToolKind};
pub use protocol::{
    CancelledParams, IncomingMessage, JSONRPC_VERSION, JsonRpcResponse, MCP_PROTOCOL_VERSION,
    RequestId,
};
pub use transport::{ChannelTransport, StdioTransport, Transport};

const CANCELLED: &str = "notifications/cancelled";

/// Processes JSON-RPC messages from a transport until EOF.
///
/// `tools/call` requests run as independent tasks, so a slow generation does
/// not hold up later requests. `notifications/cancelled` aborts the matching
/// task and its response is never sent.
pub struct McpServer {
    handler: Arc<RequestHandler>,
}

impl McpServer {
    pub fn new(tools: Arc<dyn InferenceTools>) -> Self {
        Self {
            handler: Arc::new(RequestHandler::new(tools)),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.handler.is_initialized()
    }

    /// Serve until the peer closes the transport, then flush the responses
    /// of calls still in flight.
    pub async fn run<T: Transport>(&self, transport: &mut T) -> Result<(), McpError> {
        info!(backend = %self.handler.backend(), "MCP server starting");

        let (finished_tx, mut finished) = mpsc::unbounded_channel();
        let mut in_flight: HashMap<RequestId, AbortHandle> = HashMap::new();

        loop {
            tokio::select! {
                read = transport.read_message() => {
                    let message = match read {
                        Ok(Some(message)) => message,
                        Ok(None) => {
                            info!("Transport closed, shutting down MCP server");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "Transport read error");
                            break;
                        }
                    };
                    if message.trim().is_empty() {
                        continue;
                    }

                    let incoming = match decode(&message) {
                        Ok(incoming) => incoming,
                        Err(response) => {
                            write_response(transport, &response).await?;
                            continue;
                        }
                    };

                    if incoming.id.is_none() && incoming.method == CANCELLED {
                        cancel(&mut in_flight, incoming.params);
                    } else if let Some(id) =
                        incoming.id.clone().filter(|_| incoming.method == "tools/call")
                    {
                        let task = tokio::spawn(call_tool(
                            Arc::clone(&self.handler),
                            id.clone(),
                            incoming.params,
                            finished_tx.clone(),
                        ));
                        in_flight.insert(id, task.abort_handle());
                    } else if let Some(response) = self.respond(incoming).await {
                        write_response(transport, &response).await?;
                    }
                }
                Some((id, response)) = finished.recv() => {
                    if in_flight.remove(&id).is_some() {
                        write_response(transport, &response).await?;
                    }
                }
            }
        }

        drop(finished_tx);
        while let Some((id, response)) = finished.recv().await {
            if in_flight.remove(&id).is_some() {
                write_response(transport, &response).await?;
            }
        }

        transport.close().await?;
        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw message inline. `None` for notifications.
    pub async fn process_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        match decode(raw) {
            Ok(incoming) => self.respond(incoming).await,
            Err(response) => Some(response),
        }
    }

    async fn respond(&self, incoming: IncomingMessage) -> Option<JsonRpcResponse> {
        let outcome = self
            .handler
            .route(&incoming.method, incoming.params)
            .await;

        if incoming.id.is_none() {
            if let Err(e) = outcome {
                debug!(method = %incoming.method, "Ignoring failed notification: {e}");
            }
            return None;
        }

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(incoming.id, result),
            Err(e) => JsonRpcResponse::failure(incoming.id, &e),
        })
    }
}

/// Parse and version-check one message, or the error response to send.
fn decode(raw: &str) -> Result<IncomingMessage, JsonRpcResponse> {
    let incoming: IncomingMessage = serde_json::from_str(raw).map_err(|e| {
        warn!("Unparsable JSON-RPC message: {e}");
        let err = McpError::ParseError {
            message: e.to_string(),
        };
        JsonRpcResponse::failure(None, &err)
    })?;

    if incoming.jsonrpc != JSONRPC_VERSION {
        let err = McpError::InvalidRequest {
            message: format!("expected jsonrpc 2.0, got {}", incoming.jsonrpc),
        };
        return Err(JsonRpcResponse::failure(incoming.id, &err));
    }
    Ok(incoming)
}

async fn call_tool(
    handler: Arc<RequestHandler>,
    id: RequestId,
    params: Value,
    finished: mpsc::UnboundedSender<(RequestId, JsonRpcResponse)>,
) {
    let response = match handler.route("tools/call", params).await {
        Ok(result) => JsonRpcResponse::success(Some(id.clone()), result),
        Err(e) => JsonRpcResponse::failure(Some(id.clone()), &e),
    };
    // The receiver is gone only once the server has stopped.
    let _ = finished.send((id, response));
}

fn cancel(in_flight: &mut HashMap<RequestId, AbortHandle>, params: Value) {
    let params: CancelledParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => {
            debug!("Ignoring malformed cancellation: {e}");
            return;
        }
    };

    match in_flight.remove(&params.request_id) {
        Some(task) => {
            task.abort();
            info!(
                request = ?params.request_id,
                reason = params.reason.as_deref().unwrap_or("none"),
                "Cancelled tool call"
            );
        }
        None => debug!(request = ?params.request_id, "Cancellation for unknown request"),
    }
}

async fn write_response<T: Transport>(
    transport: &mut T,
    response: &JsonRpcResponse,
) -> Result<(), McpError> {
    let encoded = serde_json::to_string(response).map_err(|e| McpError::Internal {
        message: format!("Failed to serialize response: {e}"),
    })?;
    transport.write_message(&encoded).await
}

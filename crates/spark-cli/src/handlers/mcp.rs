//! Serve one backend over MCP on stdin/stdout.

use spark_core::Backend;
use spark_mcp::{McpServer, StdioTransport};
use tracing::info;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Runs until stdin closes. Logs go to stderr; stdout carries only protocol.
pub async fn serve(ctx: &CliContext, backend: Backend) -> Result<(), CliError> {
    info!(%backend, "Serving MCP over stdio");
    let server = McpServer::new(ctx.tools(backend));
    let mut transport = StdioTransport::new();
    server.run(&mut transport).await?;
    Ok(())
}

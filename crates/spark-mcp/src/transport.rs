//! Message transports for the MCP server.
//!
//! - [`StdioTransport`]: newline-delimited JSON over stdin/stdout
//! - [`ChannelTransport`]: in-process tokio channels, for tests

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tokio::sync::mpsc;

use crate::error::McpError;

/// Reads and writes one JSON-RPC message at a time.
///
/// `read_message` must be cancel safe: the server races it against
/// responses from in-flight tool calls.
#[async_trait]
pub trait Transport: Send {
    /// Next message, or `None` once the peer has closed its side.
    async fn read_message(&mut self) -> Result<Option<String>, McpError>;

    async fn write_message(&mut self, message: &str) -> Result<(), McpError>;

    async fn close(&mut self) -> Result<(), McpError>;
}

/// NDJSON over the process's stdin/stdout. Nothing else may write to stdout.
pub struct StdioTransport {
    lines: Lines<BufReader<Stdin>>,
    writer: Stdout,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            writer: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn read_message(&mut self) -> Result<Option<String>, McpError> {
        let line = self.lines.next_line().await?;
        Ok(line.map(|line| line.trim_end().to_string()))
    }

    async fn write_message(&mut self, message: &str) -> Result<(), McpError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), McpError> {
        self.writer.flush().await?;
        Ok(())
    }
}

/// One end of an in-process transport pair.
pub struct ChannelTransport {
    receiver: mpsc::Receiver<String>,
    sender: mpsc::Sender<String>,
}

impl ChannelTransport {
    /// Two linked ends: what one writes, the other reads.
    pub fn pair(buffer: usize) -> (Self, Self) {
        let (tx_a, rx_a) = mpsc::channel(buffer);
        let (tx_b, rx_b) = mpsc::channel(buffer);
        (
            Self {
                receiver: rx_a,
                sender: tx_b,
            },
            Self {
                receiver: rx_b,
                sender: tx_a,
            },
        )
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn read_message(&mut self) -> Result<Option<String>, McpError> {
        Ok(self.receiver.recv().await)
    }

    async fn write_message(&mut self, message: &str) -> Result<(), McpError> {
        self.sender
            .send(message.to_string())
            .await
            .map_err(|_| McpError::Internal {
                message: "channel peer dropped".to_string(),
            })
    }

    async fn close(&mut self) -> Result<(), McpError> {
        self.receiver.close();
        Ok(())
    }
}

//! State descriptor fixtures and a controllable process table.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use spark_gateway::{DEFAULT_VLLM_URL, GatewayConfig, LlamaGateway};
use spark_runtime::ProcessTable;
use tempfile::TempDir;

pub const SERVER_PID: u32 = 4242;

mockall::mock! {
    pub Processes {}

    impl ProcessTable for Processes {
        fn command_line(&self, pid: u32) -> Option<String>;
    }
}

/// Process table where [`SERVER_PID`] is a live llama-server.
pub fn live_server() -> Arc<dyn ProcessTable> {
    let mut table = MockProcesses::new();
    table.expect_command_line().returning(|pid| {
        (pid == SERVER_PID).then(|| "/opt/llama/bin/llama-server --port 30000".to_string())
    });
    Arc::new(table)
}

/// Process table that must never be consulted.
pub fn untouched() -> Arc<dyn ProcessTable> {
    let mut table = MockProcesses::new();
    table.expect_command_line().never();
    Arc::new(table)
}

/// Temporary directory holding (or not) a state descriptor.
pub struct StateDir {
    dir: TempDir,
}

impl StateDir {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn with_descriptor(descriptor: &Value) -> Self {
        let state = Self::empty();
        std::fs::write(state.path(), descriptor.to_string()).unwrap();
        state
    }

    /// Descriptor for a llama-server on `host:port`.
    pub fn serving(host: &str, port: u16) -> Self {
        Self::with_descriptor(&json!({
            "pid": SERVER_PID,
            "host": host,
            "port": port,
            "model": "qwen2.5-7b",
            "started_at": "2026-10-16T09:00:00Z"
        }))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("llama-server-state.json")
    }

    pub fn config(&self) -> GatewayConfig {
        GatewayConfig::new(self.path(), DEFAULT_VLLM_URL)
    }

    pub fn gateway(&self, processes: Arc<dyn ProcessTable>) -> LlamaGateway {
        LlamaGateway::with_process_table(&self.config(), processes)
    }

    pub fn gateway_with_timeout(
        &self,
        processes: Arc<dyn ProcessTable>,
        generation: Duration,
    ) -> LlamaGateway {
        let config = self
            .config()
            .with_timeouts(Duration::from_secs(5), generation);
        LlamaGateway::with_process_table(&config, processes)
    }
}

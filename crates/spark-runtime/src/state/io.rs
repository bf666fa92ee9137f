//! State descriptor parsing.
//!
//! Format: a JSON object written by the launcher
//! ```text
//! {"pid": 12345, "host": "127.0.0.1", "port": 30000, "model": "...", "started_at": "..."}
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use spark_core::ServerState;
use tracing::debug;

/// On-disk shape. `pid` is optional here so that a missing or zero PID can
/// be told apart from a malformed document in logs.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    pid: Option<u32>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    started_at: Option<Value>,
}

/// Parse descriptor content. `None` for malformed JSON or a missing/zero PID.
pub fn parse_state_descriptor(content: &str) -> Option<ServerState> {
    let raw: RawDescriptor = match serde_json::from_str(content) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("Ignoring unparsable state descriptor: {e}");
            return None;
        }
    };

    let pid = raw.pid.filter(|&pid| pid != 0)?;

    Some(ServerState {
        pid,
        host: raw.host,
        port: raw.port,
        model: raw.model,
        started_at: raw.started_at,
    })
}

/// Read and parse the descriptor at `path`.
///
/// Absent or unreadable files are `None`, same as malformed content.
pub fn read_state_file(path: &Path) -> Option<ServerState> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), "No readable state descriptor: {e}");
            return None;
        }
    };

    parse_state_descriptor(&content)
}

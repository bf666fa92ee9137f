//! Discovery of a running llama-server through its state descriptor.
//!
//! The descriptor is written by an external launcher and never modified
//! here. It is re-read on every call and only trusted after the recorded PID
//! has been confirmed alive and identified as llama-server.
//!
//! # Safety guarantees
//! - Absent, unreadable or malformed descriptors read as "not running"
//! - A live PID owned by an unrelated process (PID reuse) reads as "not running"

mod io;
mod verify;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spark_core::ServerState;
use tracing::debug;

pub use io::{parse_state_descriptor, read_state_file};
pub use verify::{DEFAULT_SERVER_BINARY, ProcessTable, SystemProcessTable, is_expected_server};

/// Reads and validates the state descriptor.
#[derive(Clone)]
pub struct StateReader {
    path: PathBuf,
    expected_binary: String,
    processes: Arc<dyn ProcessTable>,
}

impl StateReader {
    /// Reader backed by the real OS process table.
    pub fn new(path: impl Into<PathBuf>, expected_binary: impl Into<String>) -> Self {
        Self::with_process_table(path, expected_binary, Arc::new(SystemProcessTable))
    }

    /// Reader backed by a caller-provided process table.
    pub fn with_process_table(
        path: impl Into<PathBuf>,
        expected_binary: impl Into<String>,
        processes: Arc<dyn ProcessTable>,
    ) -> Self {
        Self {
            path: path.into(),
            expected_binary: expected_binary.into(),
            processes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the validated state, or `None` when the server is not running.
    ///
    /// Never an error: every failure along the way means "not running" for
    /// this call.
    pub fn read(&self) -> Option<ServerState> {
        let state = read_state_file(&self.path)?;

        if !is_expected_server(self.processes.as_ref(), state.pid, &self.expected_binary) {
            debug!(
                pid = state.pid,
                expected = %self.expected_binary,
                "State descriptor PID is not a live server process"
            );
            return None;
        }

        Some(state)
    }
}

impl std::fmt::Debug for StateReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateReader")
            .field("path", &self.path)
            .field("expected_binary", &self.expected_binary)
            .finish_non_exhaustive()
    }
}

//! OS-level concerns for the spark gateway.
//!
//! - [`state`]: reads the llama-server state descriptor and confirms the
//!   recorded PID still belongs to a live llama-server process
//! - [`health`]: bounded-timeout HTTP liveness probe

#![deny(unsafe_code)]

pub mod health;
pub mod state;

pub use health::{HealthProbe, probe_health};
pub use state::{
    DEFAULT_SERVER_BINARY, ProcessTable, StateReader, SystemProcessTable, is_expected_server,
    parse_state_descriptor, read_state_file,
};

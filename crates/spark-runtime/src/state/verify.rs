//! Process verification to ensure a PID belongs to llama-server.

#[cfg(target_os = "linux")]
use std::fs;

#[cfg(not(target_os = "linux"))]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

/// Executable name that must appear in the recorded process's command line.
pub const DEFAULT_SERVER_BINARY: &str = "llama-server";

/// Read access to the OS process table.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessTable: Send + Sync {
    /// Command line of `pid`, or `None` if no such process exists or it
    /// cannot be inspected.
    fn command_line(&self, pid: u32) -> Option<String>;
}

/// Check that `pid` is alive and its command line names `expected_binary`.
///
/// A PID alone is never trusted: a recycled PID owned by an unrelated
/// process returns `false`.
pub fn is_expected_server(table: &dyn ProcessTable, pid: u32, expected_binary: &str) -> bool {
    table
        .command_line(pid)
        .is_some_and(|cmdline| cmdline.contains(expected_binary))
}

/// The real process table.
///
/// # Platform behavior
/// - **Linux**: Reads `/proc/<pid>/cmdline`
/// - **Other**: Uses `sysinfo` to read the process command line
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    #[cfg(target_os = "linux")]
    fn command_line(&self, pid: u32) -> Option<String> {
        let raw = fs::read(format!("/proc/{pid}/cmdline")).ok()?;
        // Arguments are NUL-separated
        Some(
            String::from_utf8_lossy(&raw)
                .split('\0')
                .filter(|arg| !arg.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    #[cfg(not(target_os = "linux"))]
    fn command_line(&self, pid: u32) -> Option<String> {
        let pid = Pid::from_u32(pid);
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing()
                .with_cmd(UpdateKind::Always)
                .with_exe(UpdateKind::Always),
        );

        let process = system.process(pid)?;
        let mut parts: Vec<String> = process
            .cmd()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        if parts.is_empty()
            && let Some(exe) = process.exe()
        {
            parts.push(exe.to_string_lossy().into_owned());
        }
        Some(parts.join(" "))
    }
}

use serde::Serialize;
use sysinfo::{Pid, Signal, System};
use tracing::{info, warn};

use super::source::ProcessSource;

pub const SUCCESS: &str = "Success";
pub const ALREADY_TERMINATED: &str = "already terminated";
pub const FAILED_ALL: &str = "Failed to kill any processes";
pub const NOTHING_TO_TERMINATE: &str = "No processes to terminate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillResult {
    Success(u32, &'static str),
    Failed(u32, String),
    NotFound(u32),
}

/// Outcome of terminating every instance of a group. `killed` counts pids
/// whose termination signal was accepted, not pids confirmed to have exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KillReport {
    pub name: String,
    pub killed: usize,
    pub message: String,
}

impl KillReport {
    pub fn already_terminated(name: &str) -> Self {
        KillReport {
            name: name.to_string(),
            killed: 0,
            message: ALREADY_TERMINATED.to_string(),
        }
    }
}

pub fn kill_process(sys: &System, pid: u32, signal: Signal) -> KillResult {
    let sysinfo_pid = Pid::from_u32(pid);
    match sys.process(sysinfo_pid) {
        Some(process) => {
            let signal_name = match signal {
                Signal::Term => "SIGTERM",
                Signal::Kill => "SIGKILL",
                _ => "signal",
            };
            match process.kill_with(signal) {
                Some(true) => KillResult::Success(pid, signal_name),
                Some(false) => {
                    KillResult::Failed(pid, format!("Failed to send {signal_name} to PID {pid}"))
                }
                None => {
                    // Signal not supported on this platform, fall back to kill()
                    if process.kill() {
                        KillResult::Success(pid, signal_name)
                    } else {
                        KillResult::Failed(
                            pid,
                            format!("Failed to kill PID {pid} (permission denied?)"),
                        )
                    }
                }
            }
        }
        None => KillResult::NotFound(pid),
    }
}

/// Signals each pid independently; one failure never stops the rest.
pub fn terminate_group(source: &dyn ProcessSource, name: &str, pids: &[u32]) -> KillReport {
    if pids.is_empty() {
        return KillReport {
            name: name.to_string(),
            killed: 0,
            message: NOTHING_TO_TERMINATE.to_string(),
        };
    }

    let mut killed = 0;
    for &pid in pids {
        match source.terminate(pid) {
            KillResult::Success(_, signal) => {
                killed += 1;
                info!(pid, name, signal, "termination signal sent");
            }
            KillResult::NotFound(_) => {
                warn!(pid, name, "process already gone");
            }
            KillResult::Failed(_, reason) => {
                warn!(pid, name, %reason, "failed to terminate process");
            }
        }
    }

    let message = if killed > 0 { SUCCESS } else { FAILED_ALL };
    info!(name, killed, attempted = pids.len(), "termination finished");
    KillReport {
        name: name.to_string(),
        killed,
        message: message.to_string(),
    }
}

use std::fmt;

use serde::Serialize;

use crate::system::source::RawProcess;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessState {
    Running,
    Sleeping,
    Idle,
    Stopped,
    Zombie,
    Dead,
    Terminating,
    Unknown,
}

impl ProcessState {
    pub fn label(self) -> &'static str {
        match self {
            ProcessState::Running => "Running",
            ProcessState::Sleeping => "Sleeping",
            ProcessState::Idle => "Idle",
            ProcessState::Stopped => "Stopped",
            ProcessState::Zombie => "Zombie",
            ProcessState::Dead => "Dead",
            ProcessState::Terminating => "Terminating",
            ProcessState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One process as seen by a single poll, already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub memory_mb: f64,
    pub cpu_percent: f64,
    pub status: ProcessState,
    pub start_time: Option<u64>,
}

impl ProcessSample {
    pub fn from_raw(raw: RawProcess, logical_cpus: usize) -> Self {
        ProcessSample {
            pid: raw.pid,
            memory_mb: memory_mb(raw.private_bytes, raw.rss_bytes),
            cpu_percent: normalize_cpu(raw.cpu_raw, logical_cpus),
            status: raw.status,
            start_time: raw.start_time,
            name: raw.name,
        }
    }
}

/// Private bytes when the platform reports them, otherwise RSS, otherwise zero.
pub fn memory_mb(private_bytes: Option<u64>, rss_bytes: Option<u64>) -> f64 {
    private_bytes
        .or(rss_bytes)
        .map(|bytes| bytes as f64 / BYTES_PER_MB)
        .unwrap_or(0.0)
}

/// Scales a per-core CPU reading (100 = one full core) to a share of the
/// whole machine.
pub fn normalize_cpu(raw: f32, logical_cpus: usize) -> f64 {
    let cores = logical_cpus.max(1) as f64;
    let share = f64::from(raw) / cores;
    if share.is_nan() {
        return 0.0;
    }
    share.clamp(0.0, 100.0)
}

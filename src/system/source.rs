use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::kill::KillResult;
use super::process::ProcessState;

/// A process exactly as the OS reported it, before filtering or scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProcess {
    pub pid: u32,
    pub name: String,
    pub exe: Option<PathBuf>,
    pub private_bytes: Option<u64>,
    pub rss_bytes: Option<u64>,
    /// Percent of a single logical core; may exceed 100 on multi-core hosts.
    pub cpu_raw: f32,
    pub status: ProcessState,
    pub start_time: Option<u64>,
}

/// One full pass over the process table.
#[derive(Debug, Clone, Default)]
pub struct TableScan {
    pub system_cpu: f32,
    /// Used share of physical memory at scan time, 0..=100.
    pub memory_percent: f32,
    pub logical_cpus: usize,
    pub processes: Vec<RawProcess>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskStats {
    pub mount_point: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostStats {
    pub logical_cpus: usize,
    pub memory_total: u64,
    pub memory_used: u64,
    pub uptime_secs: u64,
    pub disks: Vec<DiskStats>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("process table unavailable: {0}")]
    Unavailable(String),
}

/// Access to the host's process table.
///
/// Implementations skip processes that vanish or deny access while being
/// read; only a failure of the whole table is reported as an error.
pub trait ProcessSource: Send + Sync {
    /// Measures system CPU over `cpu_window`, then reads every process.
    fn scan(&self, cpu_window: Duration) -> Result<TableScan, SourceError>;

    /// Re-reads the given pids with a CPU measurement over `cpu_window`.
    /// Pids that no longer exist are left out.
    fn probe(&self, pids: &[u32], cpu_window: Duration) -> Vec<RawProcess>;

    fn find_by_name(&self, name: &str) -> Vec<u32>;

    /// Sends a graceful termination request to `pid`.
    fn terminate(&self, pid: u32) -> KillResult;

    fn logical_cpus(&self) -> usize;

    fn host(&self) -> HostStats;
}

use serde::Serialize;

use super::source::HostStats;
use crate::format::format_uptime;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskUsage {
    pub mount_point: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub percent: f64,
}

/// Headline host figures plus the rolling CPU and memory history, built on
/// demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInfo {
    pub cpu_count: usize,
    pub cpu_percent: f32,
    pub cpu_history: Vec<f32>,
    pub memory_total_gb: f64,
    pub memory_percent: f64,
    pub memory_history: Vec<f32>,
    pub uptime: String,
    pub disks: Vec<DiskUsage>,
}

impl SystemInfo {
    pub fn from_host(host: HostStats, cpu_history: Vec<f32>, memory_history: Vec<f32>) -> Self {
        let memory_percent = percent(host.memory_used, host.memory_total);
        let disks = host
            .disks
            .into_iter()
            .map(|disk| {
                let used = disk.total_bytes.saturating_sub(disk.available_bytes);
                DiskUsage {
                    mount_point: disk.mount_point,
                    total_gb: disk.total_bytes as f64 / BYTES_PER_GB,
                    used_gb: used as f64 / BYTES_PER_GB,
                    percent: percent(used, disk.total_bytes),
                }
            })
            .collect();

        SystemInfo {
            cpu_count: host.logical_cpus,
            cpu_percent: cpu_history.last().copied().unwrap_or(0.0),
            cpu_history,
            memory_total_gb: host.memory_total as f64 / BYTES_PER_GB,
            memory_percent,
            memory_history,
            uptime: format_uptime(host.uptime_secs),
            disks,
        }
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0)
}

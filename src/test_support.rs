use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use grouptop::system::kill::KillResult;
use grouptop::system::monitor::{MonitorConfig, ProcessMonitor};
use grouptop::system::process::ProcessState;
use grouptop::system::source::{
    DiskStats, HostStats, ProcessSource, RawProcess, SourceError, TableScan,
};

/// In-memory process table for app and UI tests.
pub struct FakeSource {
    processes: Mutex<Vec<RawProcess>>,
}

impl FakeSource {
    pub fn new(processes: Vec<RawProcess>) -> Self {
        Self {
            processes: Mutex::new(processes),
        }
    }
}

impl ProcessSource for FakeSource {
    fn scan(&self, _cpu_window: Duration) -> Result<TableScan, SourceError> {
        Ok(TableScan {
            system_cpu: 25.0,
            memory_percent: 40.0,
            logical_cpus: 4,
            processes: self.processes.lock().unwrap().clone(),
        })
    }

    fn probe(&self, pids: &[u32], _cpu_window: Duration) -> Vec<RawProcess> {
        let processes = self.processes.lock().unwrap();
        pids.iter()
            .filter_map(|pid| processes.iter().find(|p| p.pid == *pid).cloned())
            .collect()
    }

    fn find_by_name(&self, name: &str) -> Vec<u32> {
        let processes = self.processes.lock().unwrap();
        processes
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.pid)
            .collect()
    }

    fn terminate(&self, pid: u32) -> KillResult {
        let mut processes = self.processes.lock().unwrap();
        match processes.iter().position(|p| p.pid == pid) {
            Some(index) => {
                processes.remove(index);
                KillResult::Success(pid, "SIGTERM")
            }
            None => KillResult::NotFound(pid),
        }
    }

    fn logical_cpus(&self) -> usize {
        4
    }

    fn host(&self) -> HostStats {
        HostStats {
            logical_cpus: 4,
            memory_total: 8 * 1024 * 1024 * 1024,
            memory_used: 2 * 1024 * 1024 * 1024,
            uptime_secs: 3_600 * 5 + 60 * 7,
            disks: vec![DiskStats {
                mount_point: "/".to_string(),
                total_bytes: 200 * 1024 * 1024 * 1024,
                available_bytes: 50 * 1024 * 1024 * 1024,
            }],
        }
    }
}

pub fn raw(pid: u32, name: &str, memory_mb: u64, cpu_raw: f32) -> RawProcess {
    RawProcess {
        pid,
        name: name.to_string(),
        exe: Some(PathBuf::from(format!("/usr/bin/{name}"))),
        private_bytes: Some(memory_mb * 1024 * 1024),
        rss_bytes: Some(memory_mb * 2 * 1024 * 1024),
        cpu_raw,
        status: ProcessState::Running,
        start_time: Some(1_700_000_000 + u64::from(pid)),
    }
}

/// Monitor over a fake table with one poll already applied.
pub fn polled_monitor(processes: Vec<RawProcess>) -> ProcessMonitor {
    let monitor = ProcessMonitor::new(Arc::new(FakeSource::new(processes)), MonitorConfig::default());
    monitor.poll_once().unwrap();
    monitor
}

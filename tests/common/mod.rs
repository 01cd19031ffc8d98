#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use grouptop::system::kill::KillResult;
use grouptop::system::monitor::{MonitorConfig, ProcessMonitor};
use grouptop::system::process::ProcessState;
use grouptop::system::source::{
    DiskStats, HostStats, ProcessSource, RawProcess, SourceError, TableScan,
};

/// Scriptable process table.
#[derive(Default)]
pub struct MockSource {
    table: Mutex<Vec<RawProcess>>,
    logical_cpus: Mutex<usize>,
    system_cpu: Mutex<f32>,
    memory_percent: Mutex<f32>,
    failing_scans: AtomicUsize,
    kill_outcomes: Mutex<HashMap<u32, KillResult>>,
    pub scans: AtomicUsize,
    pub probes: AtomicUsize,
    pub terminated: Mutex<Vec<u32>>,
}

impl MockSource {
    pub fn new(table: Vec<RawProcess>) -> Arc<Self> {
        let source = MockSource {
            table: Mutex::new(table),
            logical_cpus: Mutex::new(1),
            ..MockSource::default()
        };
        Arc::new(source)
    }

    pub fn set_table(&self, table: Vec<RawProcess>) {
        *self.table.lock().unwrap() = table;
    }

    pub fn set_logical_cpus(&self, cpus: usize) {
        *self.logical_cpus.lock().unwrap() = cpus;
    }

    pub fn set_system_cpu(&self, cpu: f32) {
        *self.system_cpu.lock().unwrap() = cpu;
    }

    pub fn set_memory_percent(&self, percent: f32) {
        *self.memory_percent.lock().unwrap() = percent;
    }

    /// The next `n` scans fail as a whole.
    pub fn fail_next_scans(&self, n: usize) {
        self.failing_scans.store(n, Ordering::SeqCst);
    }

    pub fn set_kill_outcome(&self, pid: u32, outcome: KillResult) {
        self.kill_outcomes.lock().unwrap().insert(pid, outcome);
    }
}

impl ProcessSource for MockSource {
    fn scan(&self, _cpu_window: Duration) -> Result<TableScan, SourceError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing_scans.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_scans.store(failing - 1, Ordering::SeqCst);
            return Err(SourceError::Unavailable("mock scan failure".to_string()));
        }
        Ok(TableScan {
            system_cpu: *self.system_cpu.lock().unwrap(),
            memory_percent: *self.memory_percent.lock().unwrap(),
            logical_cpus: *self.logical_cpus.lock().unwrap(),
            processes: self.table.lock().unwrap().clone(),
        })
    }

    fn probe(&self, pids: &[u32], _cpu_window: Duration) -> Vec<RawProcess> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let table = self.table.lock().unwrap();
        pids.iter()
            .filter_map(|pid| table.iter().find(|p| p.pid == *pid).cloned())
            .collect()
    }

    fn find_by_name(&self, name: &str) -> Vec<u32> {
        self.table
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.pid)
            .collect()
    }

    fn terminate(&self, pid: u32) -> KillResult {
        self.terminated.lock().unwrap().push(pid);
        if let Some(outcome) = self.kill_outcomes.lock().unwrap().get(&pid) {
            return outcome.clone();
        }
        let live = self.table.lock().unwrap().iter().any(|p| p.pid == pid);
        if live {
            KillResult::Success(pid, "SIGTERM")
        } else {
            KillResult::NotFound(pid)
        }
    }

    fn logical_cpus(&self) -> usize {
        *self.logical_cpus.lock().unwrap()
    }

    fn host(&self) -> HostStats {
        HostStats {
            logical_cpus: *self.logical_cpus.lock().unwrap(),
            memory_total: 16 * 1024 * 1024 * 1024,
            memory_used: 4 * 1024 * 1024 * 1024,
            uptime_secs: 90_061,
            disks: vec![DiskStats {
                mount_point: "/".to_string(),
                total_bytes: 100 * 1024 * 1024 * 1024,
                available_bytes: 75 * 1024 * 1024 * 1024,
            }],
        }
    }
}

pub fn raw(pid: u32, name: &str, memory_mb: f64, cpu_raw: f32) -> RawProcess {
    RawProcess {
        pid,
        name: name.to_string(),
        exe: Some(PathBuf::from(format!("/opt/bin/{name}"))),
        private_bytes: Some((memory_mb * 1024.0 * 1024.0) as u64),
        rss_bytes: Some((memory_mb * 1024.0 * 1024.0) as u64 * 2),
        cpu_raw,
        status: ProcessState::Running,
        start_time: Some(1_700_000_000 + u64::from(pid)),
    }
}

pub fn monitor_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.sampler.poll_interval = Duration::from_millis(20);
    config.sampler.retry_interval = Duration::from_millis(10);
    config.sampler.cpu_window = Duration::ZERO;
    config.probe_window = Duration::ZERO;
    config
}

pub fn monitor(source: &Arc<MockSource>) -> ProcessMonitor {
    let dyn_source: Arc<dyn ProcessSource> = source.clone();
    ProcessMonitor::new(dyn_source, monitor_config())
}

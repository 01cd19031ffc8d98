use std::ffi::OsStr;
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use sysinfo::{
    Disks, MINIMUM_CPU_UPDATE_INTERVAL, Pid, Process, ProcessRefreshKind, ProcessStatus,
    ProcessesToUpdate, Signal, System, UpdateKind,
};

use super::kill::{KillResult, kill_process};
use super::platform;
use super::process::ProcessState;
use super::source::{DiskStats, HostStats, ProcessSource, RawProcess, SourceError, TableScan};

/// `ProcessSource` backed by `sysinfo`.
///
/// The table used by `scan` is kept between polls because per-process CPU
/// usage is the delta since the previous refresh. Probes, lookups and
/// terminations each use a short-lived `System` so they never wait on a scan.
pub struct Collector {
    table: Mutex<System>,
    logical_cpus: usize,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        // Throwaway pass: the first CPU reading of every process is
        // meaningless without a baseline.
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );
        let logical_cpus = match sys.cpus().len() {
            0 => thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        };
        Collector {
            table: Mutex::new(sys),
            logical_cpus,
        }
    }
}

impl ProcessSource for Collector {
    fn scan(&self, cpu_window: Duration) -> Result<TableScan, SourceError> {
        let mut sys = self.table.lock().unwrap_or_else(PoisonError::into_inner);

        sys.refresh_cpu_usage();
        thread::sleep(cpu_window.max(MINIMUM_CPU_UPDATE_INTERVAL));
        sys.refresh_cpu_usage();
        let system_cpu = sys.global_cpu_usage();

        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cpu()
                .with_exe(UpdateKind::OnlyIfNotSet),
        );

        // An empty table here means the refresh itself failed; keeping the
        // previous snapshot is recorded under "Empty table from the OS" in
        // DESIGN.md. Sources that can legitimately report no processes
        // return Ok and publish an empty snapshot.
        if sys.processes().is_empty() {
            return Err(SourceError::Unavailable(
                "refresh returned an empty process table".to_string(),
            ));
        }

        let mut processes: Vec<RawProcess> = sys
            .processes()
            .iter()
            .map(|(pid, process)| raw_process(pid.as_u32(), process))
            .collect();
        processes.sort_unstable_by_key(|p| p.pid);

        sys.refresh_memory();
        let memory_percent = memory_percent(sys.used_memory(), sys.total_memory());

        Ok(TableScan {
            system_cpu,
            memory_percent,
            logical_cpus: self.logical_cpus,
            processes,
        })
    }

    fn probe(&self, pids: &[u32], cpu_window: Duration) -> Vec<RawProcess> {
        let targets: Vec<Pid> = pids.iter().copied().map(Pid::from_u32).collect();
        let kind = ProcessRefreshKind::nothing().with_memory().with_cpu();

        let mut sys = System::new();
        sys.refresh_processes_specifics(ProcessesToUpdate::Some(&targets), true, kind);
        thread::sleep(cpu_window);
        sys.refresh_processes_specifics(ProcessesToUpdate::Some(&targets), true, kind);

        pids.iter()
            .filter_map(|&pid| {
                sys.process(Pid::from_u32(pid))
                    .map(|process| raw_process(pid, process))
            })
            .collect()
    }

    fn find_by_name(&self, name: &str) -> Vec<u32> {
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        let mut pids: Vec<u32> = sys
            .processes_by_exact_name(OsStr::new(name))
            .map(|process| process.pid().as_u32())
            .collect();
        pids.sort_unstable();
        pids
    }

    fn terminate(&self, pid: u32) -> KillResult {
        let mut sys = System::new();
        let target = [Pid::from_u32(pid)];
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&target),
            true,
            ProcessRefreshKind::nothing(),
        );
        kill_process(&sys, pid, Signal::Term)
    }

    fn logical_cpus(&self) -> usize {
        self.logical_cpus
    }

    fn host(&self) -> HostStats {
        let mut sys = System::new();
        sys.refresh_memory();

        let disks = Disks::new_with_refreshed_list()
            .list()
            .iter()
            .map(|disk| DiskStats {
                mount_point: disk.mount_point().to_string_lossy().into_owned(),
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
            })
            .collect();

        HostStats {
            logical_cpus: self.logical_cpus,
            memory_total: sys.total_memory(),
            memory_used: sys.used_memory(),
            uptime_secs: System::uptime(),
            disks,
        }
    }
}

fn memory_percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0) as f32
}

fn raw_process(pid: u32, process: &Process) -> RawProcess {
    let start_time = match process.start_time() {
        0 => None,
        secs => Some(secs),
    };
    RawProcess {
        pid,
        name: process.name().to_string_lossy().into_owned(),
        exe: process.exe().map(|path| path.to_path_buf()),
        private_bytes: platform::private_memory(pid),
        rss_bytes: Some(process.memory()),
        cpu_raw: process.cpu_usage(),
        status: process_state(process.status()),
        start_time,
    }
}

fn process_state(status: ProcessStatus) -> ProcessState {
    match status {
        ProcessStatus::Run | ProcessStatus::Waking => ProcessState::Running,
        ProcessStatus::Sleep | ProcessStatus::UninterruptibleDiskSleep => ProcessState::Sleeping,
        ProcessStatus::Idle | ProcessStatus::Parked => ProcessState::Idle,
        ProcessStatus::Stop | ProcessStatus::Tracing => ProcessState::Stopped,
        ProcessStatus::Zombie => ProcessState::Zombie,
        ProcessStatus::Dead | ProcessStatus::Wakekill => ProcessState::Terminating,
        _ => ProcessState::Unknown,
    }
}

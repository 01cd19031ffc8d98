use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::process::ProcessSample;
use super::snapshot::Snapshot;
use super::source::{ProcessSource, RawProcess, SourceError};
use super::store::SnapshotStore;

#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub poll_interval: Duration,
    pub retry_interval: Duration,
    pub cpu_window: Duration,
    /// Case-sensitive substrings; a process whose name contains any of them
    /// is left out of every snapshot.
    pub reserved_names: Vec<String>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            poll_interval: Duration::from_secs(2),
            retry_interval: Duration::from_secs(1),
            cpu_window: Duration::from_millis(200),
            reserved_names: vec!["System".to_string(), "svchost".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollReport {
    pub groups: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub system_cpu: f32,
    pub memory_percent: f32,
}

/// Turns process-table scans into snapshots.
#[derive(Clone)]
pub struct Sampler {
    source: Arc<dyn ProcessSource>,
    store: Arc<SnapshotStore>,
    config: SamplerConfig,
    updated: Arc<watch::Sender<Option<Instant>>>,
}

impl Sampler {
    pub fn new(
        source: Arc<dyn ProcessSource>,
        store: Arc<SnapshotStore>,
        config: SamplerConfig,
    ) -> Self {
        let (updated, _) = watch::channel(None);
        Sampler {
            source,
            store,
            config,
            updated: Arc::new(updated),
        }
    }

    /// Receives the instant of every successful poll; `None` until the first.
    pub fn subscribe(&self) -> watch::Receiver<Option<Instant>> {
        self.updated.subscribe()
    }

    pub fn poll_once(&self) -> Result<PollReport, SourceError> {
        let scan = self.source.scan(self.config.cpu_window)?;
        let total = scan.processes.len();
        let logical_cpus = scan.logical_cpus;

        let samples: Vec<ProcessSample> = scan
            .processes
            .into_iter()
            .filter(|raw| accepts(raw, &self.config.reserved_names))
            .map(|raw| ProcessSample::from_raw(raw, logical_cpus))
            .collect();

        let accepted = samples.len();
        let snapshot = Snapshot::from_samples(samples);
        let report = PollReport {
            groups: snapshot.len(),
            accepted,
            skipped: total - accepted,
            system_cpu: scan.system_cpu,
            memory_percent: scan.memory_percent,
        };

        self.store.replace(snapshot);
        self.store.append_cpu(scan.system_cpu);
        self.store.append_memory(scan.memory_percent);
        self.updated.send_replace(Some(Instant::now()));

        debug!(
            groups = report.groups,
            accepted = report.accepted,
            skipped = report.skipped,
            system_cpu = report.system_cpu,
            "poll complete"
        );
        Ok(report)
    }

    /// Polls until `running` is cleared. A failed poll keeps the previous
    /// snapshot and retries after the shorter retry interval.
    pub fn run(&self, running: &AtomicBool) {
        info!(
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "sampler started"
        );
        while running.load(Ordering::Acquire) {
            let pause = match self.poll_once() {
                Ok(_) => self.config.poll_interval,
                Err(err) => {
                    warn!(error = %err, "poll failed, keeping previous snapshot");
                    self.config.retry_interval
                }
            };
            thread::sleep(pause);
        }
        info!("sampler stopped");
    }

    pub fn spawn(self, running: Arc<AtomicBool>) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("grouptop-sampler".to_string())
            .spawn(move || self.run(&running))
    }
}

/// Entries without an executable path are kernel threads or processes we
/// cannot inspect.
pub fn accepts(raw: &RawProcess, reserved_names: &[String]) -> bool {
    if raw.exe.as_ref().is_none_or(|exe| exe.as_os_str().is_empty()) {
        return false;
    }
    !reserved_names
        .iter()
        .any(|pattern| !pattern.is_empty() && raw.name.contains(pattern.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::process::ProcessState;
    use std::path::PathBuf;

    fn raw(name: &str, exe: Option<&str>) -> RawProcess {
        RawProcess {
            pid: 1,
            name: name.to_string(),
            exe: exe.map(PathBuf::from),
            private_bytes: None,
            rss_bytes: Some(1024),
            cpu_raw: 0.0,
            status: ProcessState::Running,
            start_time: None,
        }
    }

    fn reserved() -> Vec<String> {
        SamplerConfig::default().reserved_names
    }

    #[test]
    fn entries_without_executable_are_skipped() {
        assert!(!accepts(&raw("kworker/0:1", None), &reserved()));
        assert!(!accepts(&raw("ghost", Some("")), &reserved()));
        assert!(accepts(&raw("bash", Some("/usr/bin/bash")), &reserved()));
    }

    #[test]
    fn reserved_patterns_match_case_sensitive_substrings() {
        let reserved = reserved();
        assert!(!accepts(&raw("System Idle Process", Some("C:\\x")), &reserved));
        assert!(!accepts(&raw("svchost.exe", Some("C:\\x")), &reserved));
        assert!(accepts(&raw("systemd", Some("/usr/lib/systemd")), &reserved));
    }

    #[test]
    fn empty_pattern_matches_nothing() {
        assert!(accepts(&raw("bash", Some("/bin/bash")), &[String::new()]));
    }
}

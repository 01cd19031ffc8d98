use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::info;

use super::collector::Collector;
use super::group::GroupSummary;
use super::history::DEFAULT_CAPACITY;
use super::info::SystemInfo;
use super::instances::{InstanceCache, InstanceDetail, collect_instances};
use super::kill::{KillReport, terminate_group};
use super::query::{SortKey, filter_and_sort};
use super::sampler::{PollReport, Sampler, SamplerConfig};
use super::snapshot::Snapshot;
use super::source::{ProcessSource, SourceError};
use super::store::SnapshotStore;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_CPU_WINDOW: Duration = Duration::from_millis(200);
pub const DEFAULT_INSTANCE_TTL: Duration = Duration::from_secs(2);
pub const DEFAULT_PROBE_WINDOW: Duration = Duration::from_millis(100);
pub const DEFAULT_CACHE_SWEEP: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub sampler: SamplerConfig,
    pub instance_ttl: Duration,
    pub probe_window: Duration,
    pub cache_sweep_after: Duration,
    pub cpu_history_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            sampler: SamplerConfig {
                poll_interval: DEFAULT_POLL_INTERVAL,
                retry_interval: DEFAULT_RETRY_INTERVAL,
                cpu_window: DEFAULT_CPU_WINDOW,
                ..SamplerConfig::default()
            },
            instance_ttl: DEFAULT_INSTANCE_TTL,
            probe_window: DEFAULT_PROBE_WINDOW,
            cache_sweep_after: DEFAULT_CACHE_SWEEP,
            cpu_history_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Entry point for presentation code: owns the sampler, the snapshot store
/// and the instance cache. Cloning is cheap and every clone shares state.
#[derive(Clone)]
pub struct ProcessMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ProcessSource>,
    store: Arc<SnapshotStore>,
    cache: InstanceCache,
    sampler: Sampler,
    probe_window: Duration,
    worker: Mutex<Option<Worker>>,
    updated: watch::Receiver<Option<Instant>>,
}

/// A sampler thread and the flag only it watches. A cleared flag is never
/// set again; a restart gets a new thread with a new flag.
struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn is_live(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.handle.is_finished()
    }
}

impl ProcessMonitor {
    pub fn new(source: Arc<dyn ProcessSource>, config: MonitorConfig) -> Self {
        let store = Arc::new(SnapshotStore::new(config.cpu_history_capacity));
        let sampler = Sampler::new(Arc::clone(&source), Arc::clone(&store), config.sampler);
        let updated = sampler.subscribe();
        ProcessMonitor {
            inner: Arc::new(Inner {
                source,
                store,
                cache: InstanceCache::new(config.instance_ttl, config.cache_sweep_after),
                sampler,
                probe_window: config.probe_window,
                worker: Mutex::new(None),
                updated,
            }),
        }
    }

    pub fn with_sysinfo(config: MonitorConfig) -> Self {
        Self::new(Arc::new(Collector::new()), config)
    }

    /// Starts the background sampler. A sampler that has not been asked to
    /// stop is reused; one that has is left to exit on its own.
    pub fn start_sampling(&self) -> io::Result<()> {
        let mut worker = self.lock_worker();
        if worker.as_ref().is_some_and(Worker::is_live) {
            return Ok(());
        }
        let running = Arc::new(AtomicBool::new(true));
        let handle = self.inner.sampler.clone().spawn(Arc::clone(&running))?;
        *worker = Some(Worker { running, handle });
        Ok(())
    }

    /// Asks the sampler to stop after its current poll. Returns immediately.
    pub fn shutdown(&self) {
        let worker = self.lock_worker();
        if let Some(worker) = worker.as_ref()
            && worker.running.swap(false, Ordering::AcqRel)
        {
            info!("sampler shutdown requested");
        }
    }

    /// Stops the sampler and waits for its thread to exit.
    pub fn join(&self) {
        self.shutdown();
        let worker = self.lock_worker().take();
        if let Some(worker) = worker {
            let _ = worker.handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_worker()
            .as_ref()
            .is_some_and(|worker| worker.running.load(Ordering::Acquire))
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<Worker>> {
        self.inner
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn poll_once(&self) -> Result<PollReport, SourceError> {
        self.inner.sampler.poll_once()
    }

    /// Resolves once the first poll has published a snapshot.
    pub async fn wait_ready(&self) {
        let mut updated = self.inner.updated.clone();
        let _ = updated.wait_for(Option::is_some).await;
    }

    pub fn last_updated(&self) -> Option<Instant> {
        *self.inner.updated.borrow()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.store.read_all()
    }

    pub fn get_filtered(
        &self,
        filter_text: &str,
        sort_key: SortKey,
        descending: bool,
    ) -> Vec<(String, GroupSummary)> {
        filter_and_sort(&self.snapshot(), filter_text, sort_key, descending)
    }

    /// Per-instance details for a group. Blocks for the CPU probe window on a
    /// cache miss.
    pub fn get_instances(&self, name: &str) -> Vec<InstanceDetail> {
        if let Some(cached) = self.inner.cache.get_fresh(name) {
            return cached;
        }
        let group = self.inner.store.group(name);
        let instances = collect_instances(
            self.inner.source.as_ref(),
            name,
            group.as_ref(),
            self.inner.probe_window,
        );
        self.inner.cache.insert(name, instances.clone());
        instances
    }

    pub fn instance_refresh_count(&self) -> u64 {
        self.inner.cache.refresh_count()
    }

    /// Sends a graceful terminate to every instance of `name` on a worker
    /// thread, then hands the report to `on_complete` on that thread.
    pub fn kill_by_name<F>(&self, name: &str, on_complete: F) -> io::Result<JoinHandle<()>>
    where
        F: FnOnce(KillReport) + Send + 'static,
    {
        let pids = self.inner.store.group(name).map(|group| group.pids);
        let source = Arc::clone(&self.inner.source);
        let name = name.to_string();
        thread::Builder::new()
            .name("grouptop-kill".to_string())
            .spawn(move || {
                let report = match pids {
                    Some(pids) => terminate_group(source.as_ref(), &name, &pids),
                    None => KillReport::already_terminated(&name),
                };
                on_complete(report);
            })
    }

    pub fn system_info(&self) -> SystemInfo {
        SystemInfo::from_host(
            self.inner.source.host(),
            self.inner.store.cpu_history(),
            self.inner.store.memory_history(),
        )
    }
}

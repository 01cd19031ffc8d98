use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::group::ProcessGroup;
use super::process::{ProcessState, memory_mb, normalize_cpu};
use super::source::ProcessSource;

pub const HIGH_MEMORY_MB: f64 = 500.0;
pub const HIGH_CPU_PERCENT: f64 = 50.0;

const SWEEP_EVERY: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceTag {
    HighMem,
    HighCpu,
}

impl InstanceTag {
    pub fn classify(memory_mb: f64, cpu_percent: f64) -> Option<Self> {
        if memory_mb > HIGH_MEMORY_MB {
            Some(InstanceTag::HighMem)
        } else if cpu_percent > HIGH_CPU_PERCENT {
            Some(InstanceTag::HighCpu)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstanceTag::HighMem => "high_mem",
            InstanceTag::HighCpu => "high_cpu",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceDetail {
    pub pid: u32,
    pub memory_mb: f64,
    pub cpu_percent: f64,
    pub status: ProcessState,
    pub tag: Option<InstanceTag>,
}

/// Reads live details for every instance of `name`.
///
/// Uses the group's pid list when it has one, otherwise scans the process
/// table for the name. Memory recorded by the last poll wins over a fresh
/// reading so the totals line up with the group row.
pub fn collect_instances(
    source: &dyn ProcessSource,
    name: &str,
    group: Option<&ProcessGroup>,
    probe_window: Duration,
) -> Vec<InstanceDetail> {
    let pids = match group {
        Some(group) if !group.pids.is_empty() => group.pids.clone(),
        _ => source.find_by_name(name),
    };
    if pids.is_empty() {
        return Vec::new();
    }

    let logical_cpus = source.logical_cpus();
    source
        .probe(&pids, probe_window)
        .into_iter()
        .map(|raw| {
            let memory = group
                .and_then(|g| g.pid_memory.get(&raw.pid).copied())
                .unwrap_or_else(|| memory_mb(raw.private_bytes, raw.rss_bytes));
            let cpu = normalize_cpu(raw.cpu_raw, logical_cpus);
            InstanceDetail {
                pid: raw.pid,
                memory_mb: memory,
                cpu_percent: cpu,
                status: raw.status,
                tag: InstanceTag::classify(memory, cpu),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    created: Instant,
    instances: Vec<InstanceDetail>,
}

/// Per-name instance lists, fresh for `ttl`.
///
/// The map lock is held only for lookups and inserts. Two callers missing
/// the same name at once both recompute; the later insert wins.
#[derive(Debug)]
pub struct InstanceCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    sweep_after: Duration,
    refreshes: AtomicU64,
}

impl InstanceCache {
    pub fn new(ttl: Duration, sweep_after: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            sweep_after: sweep_after.max(ttl),
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn get_fresh(&self, name: &str) -> Option<Vec<InstanceDetail>> {
        let entries = self.lock();
        entries
            .get(name)
            .filter(|entry| entry.created.elapsed() < self.ttl)
            .map(|entry| entry.instances.clone())
    }

    pub fn insert(&self, name: &str, instances: Vec<InstanceDetail>) {
        let count = self.refreshes.fetch_add(1, Ordering::Relaxed) + 1;
        let mut entries = self.lock();
        entries.insert(
            name.to_string(),
            CacheEntry {
                created: Instant::now(),
                instances,
            },
        );
        if count.is_multiple_of(SWEEP_EVERY) {
            let sweep_after = self.sweep_after;
            entries.retain(|_, entry| entry.created.elapsed() < sweep_after);
        }
    }

    /// Number of recomputed entries since creation.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

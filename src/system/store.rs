use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::group::ProcessGroup;
use super::history::History;
use super::snapshot::Snapshot;

/// Latest snapshot plus CPU and memory history, shared between the sampler thread and
/// readers. Readers get an immutable `Arc<Snapshot>`; a replace swaps the
/// pointer, so a reader sees either the whole old mapping or the whole new one.
#[derive(Debug)]
pub struct SnapshotStore {
    snapshot: Mutex<Arc<Snapshot>>,
    cpu_history: Mutex<History>,
    memory_history: Mutex<History>,
}

impl SnapshotStore {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            snapshot: Mutex::new(Arc::new(Snapshot::default())),
            cpu_history: Mutex::new(History::new(history_capacity)),
            memory_history: Mutex::new(History::new(history_capacity)),
        }
    }

    pub fn replace(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        *lock(&self.snapshot) = next;
    }

    pub fn read_all(&self) -> Arc<Snapshot> {
        Arc::clone(&lock(&self.snapshot))
    }

    pub fn group(&self, name: &str) -> Option<ProcessGroup> {
        self.read_all().get(name).cloned()
    }

    pub fn append_cpu(&self, cpu_percent: f32) {
        lock(&self.cpu_history).push(cpu_percent);
    }

    pub fn cpu_history(&self) -> Vec<f32> {
        lock(&self.cpu_history).to_vec()
    }

    pub fn append_memory(&self, memory_percent: f32) {
        lock(&self.memory_history).push(memory_percent);
    }

    pub fn memory_history(&self) -> Vec<f32> {
        lock(&self.memory_history).to_vec()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(super::history::DEFAULT_CAPACITY)
    }
}

// A panic while holding the guard cannot leave either value half-written:
// each is replaced or pushed in a single statement.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

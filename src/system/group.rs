use std::collections::HashMap;

use serde::Serialize;

use super::process::{ProcessSample, ProcessState};

/// Every live process sharing one executable name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessGroup {
    pub name: String,
    /// Enumeration order of the poll that built this group.
    pub pids: Vec<u32>,
    pub memory_mb: f64,
    pub cpu_percent: f64,
    pub status: ProcessState,
    pub pid_memory: HashMap<u32, f64>,
    /// Oldest start time among members, epoch seconds.
    pub start_time: Option<u64>,
}

impl ProcessGroup {
    pub fn new(name: impl Into<String>) -> Self {
        ProcessGroup {
            name: name.into(),
            pids: Vec::new(),
            memory_mb: 0.0,
            cpu_percent: 0.0,
            status: ProcessState::Running,
            pid_memory: HashMap::new(),
            start_time: None,
        }
    }

    pub fn add(&mut self, sample: &ProcessSample) {
        self.pids.push(sample.pid);
        self.memory_mb += sample.memory_mb;
        self.cpu_percent += sample.cpu_percent;
        self.status = sample.status;
        self.pid_memory.insert(sample.pid, sample.memory_mb);
        if let Some(started) = sample.start_time {
            self.start_time = Some(match self.start_time {
                Some(current) => current.min(started),
                None => started,
            });
        }
    }

    pub fn pid_count(&self) -> usize {
        self.pids.len()
    }

    /// A group that lost all of its members is hidden, unless it is
    /// being shut down.
    pub fn is_displayable(&self) -> bool {
        !self.pids.is_empty() || self.status == ProcessState::Terminating
    }

    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            memory_mb: self.memory_mb,
            cpu_percent: self.cpu_percent,
            status: self.status,
            pid_count: self.pid_count(),
            start_time: self.start_time.unwrap_or(0),
        }
    }
}

/// Row-level view of a group handed to presentation code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub memory_mb: f64,
    pub cpu_percent: f64,
    pub status: ProcessState,
    pub pid_count: usize,
    pub start_time: u64,
}

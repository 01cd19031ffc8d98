use std::cmp::Ordering;

use serde::Serialize;

use super::group::{GroupSummary, ProcessGroup};
use super::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortKey {
    #[default]
    Memory,
    Cpu,
    Name,
    StartTime,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Memory,
        SortKey::Cpu,
        SortKey::Name,
        SortKey::StartTime,
    ];

    pub fn next(self) -> Self {
        match self {
            SortKey::Memory => SortKey::Cpu,
            SortKey::Cpu => SortKey::Name,
            SortKey::Name => SortKey::StartTime,
            SortKey::StartTime => SortKey::Memory,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Memory => "Memory (MB)",
            SortKey::Cpu => "CPU",
            SortKey::Name => "Name",
            SortKey::StartTime => "Start Time",
        }
    }

    /// Accepts column labels as well as config spellings. Unknown labels
    /// sort by memory.
    pub fn from_label(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "cpu" | "cpupercent" => SortKey::Cpu,
            "name" => SortKey::Name,
            "starttime" | "start" | "uptime" => SortKey::StartTime,
            _ => SortKey::Memory,
        }
    }

    fn compare(self, a: &ProcessGroup, b: &ProcessGroup) -> Ordering {
        match self {
            SortKey::Memory => a.memory_mb.total_cmp(&b.memory_mb),
            SortKey::Cpu => a.cpu_percent.total_cmp(&b.cpu_percent),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::StartTime => a.start_time.unwrap_or(0).cmp(&b.start_time.unwrap_or(0)),
        }
    }
}

/// Displayable groups whose name contains `filter_text` (case-insensitive),
/// ordered by `key`. Equal keys keep snapshot order in both directions.
pub fn filter_and_sort(
    snapshot: &Snapshot,
    filter_text: &str,
    key: SortKey,
    descending: bool,
) -> Vec<(String, GroupSummary)> {
    let needle = filter_text.to_lowercase();
    let mut matched: Vec<&ProcessGroup> = snapshot
        .groups()
        .iter()
        .filter(|g| g.is_displayable())
        .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
        .collect();

    matched.sort_by(|a, b| {
        let ord = key.compare(a, b);
        if descending { ord.reverse() } else { ord }
    });

    matched
        .into_iter()
        .map(|g| (g.name.clone(), g.summary()))
        .collect()
}

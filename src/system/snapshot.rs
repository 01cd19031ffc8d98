use std::collections::HashMap;

use super::group::ProcessGroup;
use super::process::ProcessSample;

/// Name-keyed groups valid as of one poll. Iteration follows the order in
/// which each name first appeared in the process table.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    groups: Vec<ProcessGroup>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = ProcessSample>,
    {
        let mut snapshot = Snapshot::default();
        for sample in samples {
            let slot = match snapshot.index.get(&sample.name) {
                Some(&slot) => slot,
                None => {
                    snapshot.groups.push(ProcessGroup::new(sample.name.clone()));
                    let slot = snapshot.groups.len() - 1;
                    snapshot.index.insert(sample.name.clone(), slot);
                    slot
                }
            };
            snapshot.groups[slot].add(&sample);
        }
        snapshot
    }

    /// Builds a snapshot from prepared groups. A repeated name replaces the
    /// earlier group in place.
    pub fn from_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = ProcessGroup>,
    {
        let mut snapshot = Snapshot::default();
        for group in groups {
            match snapshot.index.get(&group.name) {
                Some(&slot) => snapshot.groups[slot] = group,
                None => {
                    snapshot.index.insert(group.name.clone(), snapshot.groups.len());
                    snapshot.groups.push(group);
                }
            }
        }
        snapshot
    }

    pub fn get(&self, name: &str) -> Option<&ProcessGroup> {
        self.index.get(name).map(|&slot| &self.groups[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn groups(&self) -> &[ProcessGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn pid_count(&self) -> usize {
        self.groups.iter().map(ProcessGroup::pid_count).sum()
    }
}

use grouptop::system::group::ProcessGroup;
use grouptop::system::history::History;
use grouptop::system::process::normalize_cpu;
use grouptop::system::query::{SortKey, filter_and_sort};
use grouptop::system::snapshot::Snapshot;
use proptest::prelude::*;

fn arb_group() -> impl Strategy<Value = ProcessGroup> {
    (
        "[a-zA-Z]{1,8}",
        0.0f64..5000.0,
        0.0f64..100.0,
        proptest::option::of(1_600_000_000u64..1_700_000_000),
        1u32..5,
    )
        .prop_map(|(name, memory, cpu, start, count)| {
            let mut group = ProcessGroup::new(name);
            group.pids = (1..=count).collect();
            group.memory_mb = memory;
            group.cpu_percent = cpu;
            group.start_time = start;
            group
        })
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    proptest::collection::vec(arb_group(), 0..40).prop_map(Snapshot::from_groups)
}

fn arb_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

proptest! {
    #[test]
    fn sorted_output_is_monotonic(
        snapshot in arb_snapshot(),
        key in arb_key(),
        descending in any::<bool>(),
    ) {
        let rows = filter_and_sort(&snapshot, "", key, descending);
        prop_assert_eq!(rows.len(), snapshot.len());
        for pair in rows.windows(2) {
            let (a_name, a) = &pair[0];
            let (b_name, b) = &pair[1];
            let ordered = match key {
                SortKey::Memory => a.memory_mb.total_cmp(&b.memory_mb),
                SortKey::Cpu => a.cpu_percent.total_cmp(&b.cpu_percent),
                SortKey::Name => a_name.to_lowercase().cmp(&b_name.to_lowercase()),
                SortKey::StartTime => a.start_time.cmp(&b.start_time),
            };
            if descending {
                prop_assert!(ordered.is_ge());
            } else {
                prop_assert!(ordered.is_le());
            }
        }
    }

    #[test]
    fn filter_keeps_exactly_matching_names(
        snapshot in arb_snapshot(),
        needle in "[a-zA-Z]{0,2}",
    ) {
        let rows = filter_and_sort(&snapshot, &needle, SortKey::Name, false);
        let lower = needle.to_lowercase();
        for (name, _) in &rows {
            prop_assert!(name.to_lowercase().contains(&lower));
        }
        let kept: Vec<&str> = rows.iter().map(|(n, _)| n.as_str()).collect();
        for group in snapshot.groups() {
            if !kept.contains(&group.name.as_str()) {
                prop_assert!(!group.name.to_lowercase().contains(&lower));
            }
        }
    }

    #[test]
    fn normalized_cpu_stays_in_range(raw in any::<f32>(), cpus in 0usize..256) {
        let value = normalize_cpu(raw, cpus);
        prop_assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn cpu_history_never_exceeds_capacity(
        samples in proptest::collection::vec(0.0f32..100.0, 0..200),
    ) {
        let mut history = History::default();
        for sample in &samples {
            history.push(*sample);
        }
        prop_assert!(history.len() <= 60);
        prop_assert_eq!(history.len(), samples.len().min(60));
        if let Some(last) = samples.last() {
            prop_assert_eq!(history.latest(), Some(*last));
        }
    }
}

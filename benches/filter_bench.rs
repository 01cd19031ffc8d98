use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use grouptop::system::process::{ProcessSample, ProcessState};
use grouptop::system::query::{SortKey, filter_and_sort};
use grouptop::system::snapshot::Snapshot;

/// `n` processes spread over roughly `n / 4` names.
fn make_samples(n: usize) -> Vec<ProcessSample> {
    (0..n)
        .map(|i| ProcessSample {
            pid: i as u32 + 1,
            name: format!("proc_{}", i % (n / 4).max(1)),
            memory_mb: ((n - i) as f64 + 1.0) * 1.5,
            cpu_percent: (i % 100) as f64,
            status: ProcessState::Running,
            start_time: Some(1_700_000_000 + i as u64),
        })
        .collect()
}

fn bench_snapshot_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_build_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let samples = make_samples(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &samples, |b, samples| {
            b.iter(|| {
                let snapshot = Snapshot::from_samples(black_box(samples.clone()));
                black_box(snapshot);
            })
        });
    }

    group.finish();
}

fn bench_filter_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_sort_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let snapshot = Snapshot::from_samples(make_samples(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            b.iter(|| {
                let rows = filter_and_sort(black_box(snapshot), "", SortKey::Memory, true);
                black_box(rows);
            })
        });
    }

    group.finish();
}

fn bench_filtered_name_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_name_sort_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let snapshot = Snapshot::from_samples(make_samples(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            b.iter(|| {
                let rows = filter_and_sort(black_box(snapshot), "PROC_1", SortKey::Name, false);
                black_box(rows);
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_snapshot_build,
    bench_filter_and_sort,
    bench_filtered_name_sort
);
criterion_main!(benches);

//! Rank index benchmarks
//!
//! Compares in-place re-ranking through the position map with the top-k
//! query path the shell uses.
//!
//! Run with:
//!   cargo bench --bench rank_index

use std::sync::Arc;

use arbor::{ManualClock, Messages, Registry};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn populated(resources: usize) -> Registry {
    let mut reg = Registry::with_clock(Messages::default(), Arc::new(ManualClock::ticking()));
    for i in 0..resources {
        reg.create(&format!("file_{:05}", i)).unwrap();
    }
    reg
}

fn bench_reprioritize(c: &mut Criterion) {
    let mut group = c.benchmark_group("reprioritize_on_insert");

    for size in [100, 1_000, 10_000] {
        let mut reg = populated(size);
        let mut i = 0usize;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let name = format!("file_{:05}", i % size);
                i += 1;
                black_box(reg.insert(&name, "x").unwrap().id());
            })
        });
    }

    group.finish();
}

fn bench_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");

    for k in [1, 10, 100] {
        let mut reg = populated(10_000);
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| black_box(reg.recent(k).unwrap().len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reprioritize, bench_top_k);
criterion_main!(benches);

//! ConcurrentSet benchmark.
//!
//! Compares a cached snapshot read against a read that has to rebuild the
//! snapshot after a write, and measures writes and lookups under contention.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use syncset::set::ConcurrentSet;

const SIZES: [u32; 3] = [100, 1000, 10000];

fn populated(size: u32) -> ConcurrentSet<u32> {
    (0..size).collect()
}

fn benchmark_elements_cached(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("concurrent_set_elements_cached");

    for size in SIZES {
        let set = populated(size);
        let _ = set.elements();
        group.bench_with_input(BenchmarkId::new("elements", size), &size, |bencher, _| {
            bencher.iter(|| black_box(set.elements()));
        });
    }

    group.finish();
}

fn benchmark_elements_after_write(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("concurrent_set_elements_after_write");

    for size in SIZES {
        let set = populated(size);
        group.bench_with_input(BenchmarkId::new("add_then_elements", size), &size, |bencher, _| {
            bencher.iter(|| {
                set.add(black_box(0));
                black_box(set.elements())
            });
        });
    }

    group.finish();
}

fn benchmark_contended_operations(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("concurrent_set_contended");

    for threads in [1u32, 4] {
        group.bench_with_input(BenchmarkId::new("mixed", threads), &threads, |bencher, &threads| {
            bencher.iter(|| {
                let set = Arc::new(populated(1000));
                let handles: Vec<_> = (0..threads)
                    .map(|index| {
                        let set = Arc::clone(&set);
                        thread::spawn(move || {
                            for value in 0..1000 {
                                match value % 8 {
                                    0 => set.add(value + index * 1000),
                                    1 => {
                                        let _ = set.delete(&value);
                                    }
                                    2 => {
                                        black_box(set.elements());
                                    }
                                    _ => {
                                        black_box(set.contains(&value));
                                    }
                                }
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_elements_cached,
    benchmark_elements_after_write,
    benchmark_contended_operations
);

criterion_main!(benches);

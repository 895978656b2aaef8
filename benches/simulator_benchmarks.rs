use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cachesim::cache::{Cache, CacheGeometry};
use cachesim::hierarchy::{Hierarchy, HierarchyLevel, LevelCache, LevelCounters, Mode};

fn two_level_hierarchy() -> Hierarchy {
    let l1 = CacheGeometry::new(4, 64, 32 * 1024, 1, 0o01).unwrap();
    let l2 = CacheGeometry::new(8, 64, 1024 * 1024, 10, 0o01).unwrap();
    let levels = vec![
        HierarchyLevel {
            n: 1,
            cache: LevelCache::Unified(Cache::new(l1, StdRng::seed_from_u64(1))),
            counters: LevelCounters::default(),
        },
        HierarchyLevel {
            n: 2,
            cache: LevelCache::Unified(Cache::new(l2, StdRng::seed_from_u64(2))),
            counters: LevelCounters::default(),
        },
    ];
    Hierarchy::new(levels, 100)
}

fn sequential_access_benchmark(c: &mut Criterion) {
    c.bench_function("sequential_reads", |b| {
        b.iter(|| {
            let mut hierarchy = two_level_hierarchy();
            for i in 0..10_000u32 {
                hierarchy.pair_access(0, black_box(i * 4), Mode::DataRead);
            }
        });
    });
}

fn strided_write_benchmark(c: &mut Criterion) {
    c.bench_function("strided_writes_with_eviction", |b| {
        b.iter(|| {
            let mut hierarchy = two_level_hierarchy();
            for i in 0..10_000u32 {
                let addr = (i.wrapping_mul(4099)) & 0x000f_ffff;
                hierarchy.pair_access(0, black_box(addr), Mode::DataWrite);
            }
            hierarchy.flush();
        });
    });
}

fn cache_level_access_benchmark(c: &mut Criterion) {
    let geometry = CacheGeometry::new(8, 64, 256 * 1024, 1, 0o01).unwrap();

    c.bench_function("cache_level_access", |b| {
        let mut cache = Cache::new(geometry, StdRng::seed_from_u64(7));
        b.iter(|| {
            for i in 0..10_000u32 {
                black_box(cache.access(i * 64, i % 3 == 0));
            }
        });
    });
}

criterion_group!(
    benches,
    sequential_access_benchmark,
    strided_write_benchmark,
    cache_level_access_benchmark
);
criterion_main!(benches);

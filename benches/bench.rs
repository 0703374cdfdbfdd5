// Criterion benchmarks for Lume Swipe

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lume_swipe::core::{derive_key, validate, EffectQueue, SwipeMatchEngine};
use lume_swipe::services::{MemoryMatchStore, MemorySwipeStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn bench_derive_key(c: &mut Criterion) {
    c.bench_function("derive_key", |b| {
        b.iter(|| derive_key(black_box("6650f3c2a91e4b7d"), black_box("5f1e0b9d33c84a02")));
    });
}

fn bench_validate(c: &mut Criterion) {
    c.bench_function("validate_swipe", |b| {
        b.iter(|| validate(black_box("u1"), black_box("u2"), black_box("Like")));
    });
}

fn bench_record_swipe(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("record_swipe");

    for existing in [0usize, 1_000, 10_000].iter() {
        let (queue, _rx) = EffectQueue::channel(1024);
        let engine = SwipeMatchEngine::new(
            Arc::new(MemorySwipeStore::new()),
            Arc::new(MemoryMatchStore::new()),
            queue,
        );

        rt.block_on(async {
            for i in 0..*existing {
                engine
                    .record_swipe(&format!("seed-{}", i), &format!("seed-{}", i + 1), "like")
                    .await
                    .unwrap();
            }
        });

        // Every iteration needs a fresh ordered pair
        let counter = AtomicUsize::new(0);

        group.bench_with_input(BenchmarkId::new("one_sided", existing), existing, |b, _| {
            b.iter(|| {
                let n = counter.fetch_add(1, Ordering::Relaxed);
                rt.block_on(engine.record_swipe(&format!("a-{}", n), &format!("b-{}", n), "like"))
            });
        });

        group.bench_with_input(BenchmarkId::new("mutual", existing), existing, |b, _| {
            b.iter(|| {
                let n = counter.fetch_add(1, Ordering::Relaxed);
                let (a, b) = (format!("m-{}", n), format!("n-{}", n));
                rt.block_on(async {
                    engine.record_swipe(&a, &b, "like").await.unwrap();
                    engine.record_swipe(&b, &a, "like").await
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_derive_key, bench_validate, bench_record_swipe);

criterion_main!(benches);

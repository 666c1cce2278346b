//! # Renumbering Benchmarks
//!
//! | Operation | Input | Target |
//! |-----------|-------|--------|
//! | Plan construction | 10 - 10,000 categories | < 10ms at 10,000 |
//! | Full in-memory reorder | 10 - 1,000 categories | < 100ms at 1,000 |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pam_01_category_reorder::algorithms::build_plan;
use pam_01_category_reorder::{
    Category, CategoryReorderApi, CategoryReorderService, InMemoryCategoryStore, ReorderConfig,
    TargetOrder,
};
use std::time::Duration;

/// `n` rows stored in reverse order, target puts them back.
fn reversed(n: usize) -> (Vec<Category>, TargetOrder) {
    let rows: Vec<Category> = (0..n)
        .map(|i| Category::new((n - i) as i64, format!("kategori-{i}")))
        .collect();
    let target =
        TargetOrder::from_pairs((0..n).map(|i| (i as i64 + 1, format!("kategori-{i}")))).unwrap();
    (rows, target)
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("pam-01-plan");

    for size in [10usize, 100, 1_000, 10_000] {
        let (rows, target) = reversed(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build_plan", size), &size, |b, _| {
            b.iter(|| black_box(build_plan(&target, &rows, 100, i32::MAX as i64).unwrap()))
        });
    }

    group.finish();
}

fn bench_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("pam-01-reorder");
    group.measurement_time(Duration::from_secs(10));
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

    for size in [10usize, 100, 1_000] {
        let (rows, target) = reversed(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("in_memory", size), &size, |b, _| {
            b.iter(|| {
                let store = InMemoryCategoryStore::with_categories(rows.clone()).unwrap();
                let config = ReorderConfig {
                    verify_after_commit: false,
                    ..ReorderConfig::default()
                };
                let service = CategoryReorderService::with_config(store, config);
                black_box(runtime.block_on(service.reorder(&target)).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan, bench_reorder);
criterion_main!(benches);

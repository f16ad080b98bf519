//! Performance benchmarks for the subscription tracker.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recurly::{
    export, BillingCycle, Category, CycleFilter, FilterCriteria, StoreConfig, SubscriptionInput,
    SubscriptionManager, SubscriptionStore,
};
use tempfile::TempDir;

fn pinned_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

fn synthetic(i: usize) -> SubscriptionInput {
    let base = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let cycle = if i % 3 == 0 {
        BillingCycle::Yearly
    } else {
        BillingCycle::Monthly
    };

    SubscriptionInput::new(
        format!("Service {i:05}"),
        1.0 + (i % 100) as f64,
        cycle,
        Category::KNOWN[i % Category::KNOWN.len()],
        base + Duration::days((i % 60) as i64),
    )
    .unwrap()
}

fn populated_manager(count: usize) -> SubscriptionManager {
    let manager = SubscriptionManager::open(SubscriptionStore::in_memory());
    for i in 0..count {
        manager.add(synthetic(i)).unwrap();
    }
    manager
}

/// Benchmark the dashboard figures over varying collection sizes
fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary");
    let now = pinned_now();

    for size in [10, 100, 1000] {
        let manager = populated_manager(size);
        group.bench_with_input(BenchmarkId::new("subscriptions", size), &size, |b, _| {
            b.iter(|| black_box(manager.summary_at(now)));
        });
    }

    group.finish();
}

/// Benchmark sorted upcoming renewals
fn bench_upcoming(c: &mut Criterion) {
    let mut group = c.benchmark_group("upcoming_renewals");
    let now = pinned_now();

    for size in [10, 100, 1000] {
        let manager = populated_manager(size);
        group.bench_with_input(BenchmarkId::new("subscriptions", size), &size, |b, _| {
            b.iter(|| black_box(manager.upcoming_renewals_at(now)));
        });
    }

    group.finish();
}

/// Benchmark the combined filter
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let now = pinned_now();
    let manager = populated_manager(1000);

    let cases = [
        ("unfiltered", FilterCriteria::new()),
        ("search", FilterCriteria::new().with_search("service 00")),
        (
            "combined",
            FilterCriteria::new()
                .with_search("service")
                .with_category(Category::STREAMING)
                .with_cycle(CycleFilter::Upcoming),
        ),
    ];

    for (name, criteria) in cases {
        group.bench_function(name, |b| {
            b.iter(|| black_box(manager.filter_at(&criteria, now)));
        });
    }

    group.finish();
}

/// Benchmark add, which rewrites the whole collection each time
fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");

    for existing in [0, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("memory", existing), &existing, |b, &n| {
            let manager = populated_manager(n);
            let mut i = n;
            b.iter(|| {
                i += 1;
                black_box(manager.add(synthetic(i)).unwrap());
            });
        });
    }

    group.bench_function("file_100", |b| {
        let dir = TempDir::new().unwrap();
        let manager = SubscriptionManager::open(
            SubscriptionStore::open(StoreConfig {
                path: dir.path().join("data"),
                ..Default::default()
            })
            .unwrap(),
        );
        for i in 0..100 {
            manager.add(synthetic(i)).unwrap();
        }
        let mut i = 100;
        b.iter(|| {
            i += 1;
            black_box(manager.add(synthetic(i)).unwrap());
        });
    });

    group.finish();
}

/// Benchmark a cold load from disk
fn bench_restart(c: &mut Criterion) {
    let mut group = c.benchmark_group("restart");

    for size in [100, 1000] {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            path: dir.path().join("data"),
            ..Default::default()
        };
        {
            let store = SubscriptionStore::open(config.clone()).unwrap();
            let manager = populated_manager(size);
            store.try_save(&manager.subscriptions()).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("subscriptions", size), &size, |b, _| {
            b.iter(|| {
                let store = SubscriptionStore::open(config.clone()).unwrap();
                black_box(SubscriptionManager::open(store).active_count())
            });
        });
    }

    group.finish();
}

/// Benchmark CSV rendering
fn bench_export(c: &mut Criterion) {
    let manager = populated_manager(1000);
    let subs = manager.subscriptions();

    c.bench_function("export_csv_1000", |b| {
        b.iter(|| black_box(export::to_csv_string(&subs).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_summary,
    bench_upcoming,
    bench_filter,
    bench_add,
    bench_restart,
    bench_export,
);

criterion_main!(benches);

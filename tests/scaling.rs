//! Scaling tests with synthetic subscription collections.
//!
//! Every mutation rewrites the whole collection, so these measure:
//! - Population through the manager (memory and file backed)
//! - Restart from a large persisted blob
//! - Metrics, upcoming renewals and filters over large collections
//! - Export of a large filtered view

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use recurly::{
    export, BillingCycle, Category, CycleFilter, FilterCriteria, StoreConfig, SubscriptionInput,
    SubscriptionManager, SubscriptionStore,
};
use std::time::Instant;
use tempfile::TempDir;

const MEMORY_COUNT: usize = 2_000;
const FILE_COUNT: usize = 1_000;

fn test_config(dir: &TempDir) -> StoreConfig {
    StoreConfig {
        path: dir.path().to_path_buf(),
        ..Default::default()
    }
}

fn pinned_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

/// Timing helper
struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn report(&self) {
        println!("  {} took {:.2}ms", self.name, self.elapsed_ms());
    }

    fn report_with_count(&self, count: usize) {
        let ms = self.elapsed_ms();
        let per_item = if count > 0 { ms / count as f64 } else { 0.0 };
        println!(
            "  {} took {:.2}ms ({} items, {:.4}ms/item)",
            self.name, ms, count, per_item
        );
    }
}

/// Deterministic synthetic subscription `i`.
///
/// Renewals spread over 60 days from the pinned clock; every third is yearly.
fn synthetic(i: usize) -> SubscriptionInput {
    let base = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let cycle = if i % 3 == 0 {
        BillingCycle::Yearly
    } else {
        BillingCycle::Monthly
    };
    let category = Category::KNOWN[i % Category::KNOWN.len()];

    SubscriptionInput::new(
        format!("Service {i:05}"),
        1.0 + (i % 100) as f64,
        cycle,
        category,
        base + Duration::days((i % 60) as i64),
    )
    .unwrap()
}

fn populate(manager: &SubscriptionManager, count: usize) {
    for i in 0..count {
        manager.add(synthetic(i)).unwrap();
    }
}

// =============================================================================
// Test: Large in-memory collection
// =============================================================================

#[test]
fn test_scaling_memory_collection() {
    println!("\n=== Scaling: {} subscriptions in memory ===", MEMORY_COUNT);
    let manager = SubscriptionManager::open(SubscriptionStore::in_memory());
    let now = pinned_now();

    let timer = Timer::new("populate");
    populate(&manager, MEMORY_COUNT);
    timer.report_with_count(MEMORY_COUNT);
    assert_eq!(manager.active_count(), MEMORY_COUNT);

    let timer = Timer::new("summary");
    let summary = manager.summary_at(now);
    timer.report();
    assert_eq!(summary.active_count, MEMORY_COUNT);
    assert!(summary.monthly_cost > 0.0);
    assert!((summary.yearly_cost - summary.monthly_cost * 12.0).abs() < summary.yearly_cost * 1e-9);

    let timer = Timer::new("upcoming renewals");
    let upcoming = manager.upcoming_renewals_at(now);
    timer.report_with_count(upcoming.len());

    // Offsets 1..=7 days fall inside the window; offset 0 is midnight, before `now`
    let expected = (0..MEMORY_COUNT).filter(|i| (1..=7).contains(&(i % 60))).count();
    assert_eq!(upcoming.len(), expected);
    assert!(upcoming
        .windows(2)
        .all(|pair| pair[0].next_renewal <= pair[1].next_renewal));

    let timer = Timer::new("combined filter");
    let criteria = FilterCriteria::new()
        .with_search("service 00")
        .with_category(Category::STREAMING)
        .with_cycle(CycleFilter::Monthly);
    let filtered = manager.filter_at(&criteria, now);
    timer.report_with_count(filtered.len());

    assert!(!filtered.is_empty());
    assert!(filtered.iter().all(|s| {
        s.name.starts_with("Service 00")
            && s.category.as_str() == Category::STREAMING
            && s.billing_cycle == BillingCycle::Monthly
    }));
}

// =============================================================================
// Test: File-backed population and restart
// =============================================================================

#[test]
fn test_scaling_file_restart() {
    println!("\n=== Scaling: {} subscriptions on disk ===", FILE_COUNT);
    let dir = TempDir::new().unwrap();

    let monthly_before = {
        let manager = SubscriptionManager::open(SubscriptionStore::open(test_config(&dir)).unwrap());

        let timer = Timer::new("populate (full rewrite per add)");
        populate(&manager, FILE_COUNT);
        timer.report_with_count(FILE_COUNT);

        manager.monthly_cost()
    };

    let timer = Timer::new("restart");
    let manager = SubscriptionManager::open(SubscriptionStore::open(test_config(&dir)).unwrap());
    timer.report();

    assert_eq!(manager.active_count(), FILE_COUNT);
    assert!((manager.monthly_cost() - monthly_before).abs() < 1e-6);

    // Newest first
    let subs = manager.subscriptions();
    assert_eq!(subs[0].name, format!("Service {:05}", FILE_COUNT - 1));
    assert_eq!(subs[FILE_COUNT - 1].name, "Service 00000");
}

// =============================================================================
// Test: Bulk delete
// =============================================================================

#[test]
fn test_scaling_bulk_delete() {
    println!("\n=== Scaling: bulk delete ===");
    let manager = SubscriptionManager::open(SubscriptionStore::in_memory());
    populate(&manager, MEMORY_COUNT / 5);

    let yearly: Vec<_> = manager
        .filter(&FilterCriteria::new().with_cycle(CycleFilter::Yearly))
        .into_iter()
        .map(|s| s.id)
        .collect();

    let timer = Timer::new("delete yearly");
    for id in &yearly {
        assert!(manager.delete(id).unwrap());
    }
    timer.report_with_count(yearly.len());

    assert_eq!(manager.active_count(), MEMORY_COUNT / 5 - yearly.len());
    assert!(manager
        .filter(&FilterCriteria::new().with_cycle(CycleFilter::Yearly))
        .is_empty());
}

// =============================================================================
// Test: Large export
// =============================================================================

#[test]
fn test_scaling_export() {
    println!("\n=== Scaling: export ===");
    let dir = TempDir::new().unwrap();
    let manager = SubscriptionManager::open(SubscriptionStore::in_memory());
    populate(&manager, MEMORY_COUNT);

    let timer = Timer::new("export all");
    let path = export::export_to_file(&manager.subscriptions(), dir.path().join("all"))
        .unwrap()
        .unwrap();
    timer.report_with_count(MEMORY_COUNT);

    let contents = std::fs::read_to_string(path).unwrap();
    assert_eq!(contents.lines().count(), MEMORY_COUNT + 1);
}

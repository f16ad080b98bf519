//! Derived metrics computed on demand from a collection.
//!
//! Everything here is a pure function of the slice and an explicit `now`,
//! so the manager can call them under a read lock and tests can pin time.

use crate::types::{within_window, RenewalInstant, Subscription};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default width of the "due soon" window.
pub const DUE_SOON_DAYS: i64 = 3;

/// Default width of the "upcoming renewal" window.
pub const UPCOMING_DAYS: i64 = 7;

/// Total spend per month, converting yearly charges to monthly equivalents.
pub fn monthly_cost(subscriptions: &[Subscription]) -> f64 {
    subscriptions.iter().map(Subscription::monthly_cost).sum()
}

/// Total spend per year, converting monthly charges to yearly equivalents.
pub fn yearly_cost(subscriptions: &[Subscription]) -> f64 {
    subscriptions.iter().map(Subscription::yearly_cost).sum()
}

/// Every tracked subscription counts as active.
pub fn active_count(subscriptions: &[Subscription]) -> usize {
    subscriptions.len()
}

/// Whether `at` falls within `[now, now + window]`.
pub fn is_due_within(at: impl RenewalInstant, now: DateTime<Utc>, window: Duration) -> bool {
    within_window(at.renewal_instant(), now, window)
}

/// Subscriptions renewing within `[now, now + window]`, soonest first.
///
/// Ties keep their collection order.
pub fn upcoming_renewals(
    subscriptions: &[Subscription],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<Subscription> {
    let mut upcoming: Vec<Subscription> = subscriptions
        .iter()
        .filter(|sub| sub.renews_within(now, window))
        .cloned()
        .collect();

    // sort_by_key is stable
    upcoming.sort_by_key(|sub| sub.next_renewal);
    upcoming
}

/// Number of subscriptions renewing within `[now, now + window]`.
pub fn upcoming_renewals_count(
    subscriptions: &[Subscription],
    now: DateTime<Utc>,
    window: Duration,
) -> usize {
    subscriptions
        .iter()
        .filter(|sub| sub.renews_within(now, window))
        .count()
}

/// The four headline figures shown on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    pub active_count: usize,
    pub upcoming_count: usize,
}

impl DashboardSummary {
    pub fn compute(
        subscriptions: &[Subscription],
        now: DateTime<Utc>,
        upcoming_window: Duration,
    ) -> Self {
        Self {
            monthly_cost: monthly_cost(subscriptions),
            yearly_cost: yearly_cost(subscriptions),
            active_count: active_count(subscriptions),
            upcoming_count: upcoming_renewals_count(subscriptions, now, upcoming_window),
        }
    }
}

//! Core types for the subscription tracker.

use crate::error::TrackerError;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a subscription.
///
/// New subscriptions get a UUID v4. Persisted collections may carry any
/// string id, so the wrapper does not enforce a format.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        SubscriptionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubscriptionId {
    fn from(s: &str) -> Self {
        SubscriptionId(s.to_string())
    }
}

impl From<String> for SubscriptionId {
    fn from(s: String) -> Self {
        SubscriptionId(s)
    }
}

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recurrence period of a charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Convert a cost charged on this cycle to its per-month equivalent.
    pub fn monthly_amount(&self, cost: f64) -> f64 {
        match self {
            BillingCycle::Monthly => cost,
            BillingCycle::Yearly => cost / 12.0,
        }
    }

    /// Convert a cost charged on this cycle to its per-year equivalent.
    pub fn yearly_amount(&self, cost: f64) -> f64 {
        match self {
            BillingCycle::Monthly => cost * 12.0,
            BillingCycle::Yearly => cost,
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(TrackerError::Deserialization(format!(
                "unknown billing cycle: {other:?}"
            ))),
        }
    }
}

/// Category tag for a subscription.
///
/// The well-known tags are listed in [`Category::KNOWN`], but any string is
/// accepted; filtering compares tags exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const STREAMING: &'static str = "Streaming";
    pub const SAAS: &'static str = "SaaS";
    pub const UTILITIES: &'static str = "Utilities";
    pub const FITNESS: &'static str = "Fitness";
    pub const OTHER: &'static str = "Other";

    /// Tags offered by the dashboard.
    pub const KNOWN: [&'static str; 5] = [
        Self::STREAMING,
        Self::SAAS,
        Self::UTILITIES,
        Self::FITNESS,
        Self::OTHER,
    ];

    pub fn new(tag: impl Into<String>) -> Self {
        Category(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the well-known tags.
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::new(Self::SAAS)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::new(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recurring payment tracked by the manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Unique identifier (assigned by the manager).
    pub id: SubscriptionId,

    pub name: String,

    /// Cost per billing cycle, stored as entered.
    pub cost: f64,

    pub billing_cycle: BillingCycle,

    pub category: Category,

    /// Next renewal date (`YYYY-MM-DD`).
    pub next_renewal: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the subscription was added (assigned by the manager).
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Per-month equivalent of this subscription's cost.
    pub fn monthly_cost(&self) -> f64 {
        self.billing_cycle.monthly_amount(self.cost)
    }

    /// Per-year equivalent of this subscription's cost.
    pub fn yearly_cost(&self) -> f64 {
        self.billing_cycle.yearly_amount(self.cost)
    }

    /// Instant at which the next renewal happens (midnight UTC).
    pub fn renewal_at(&self) -> DateTime<Utc> {
        self.next_renewal.renewal_instant()
    }

    /// Whether the next renewal falls within `[now, now + window]`.
    pub fn renews_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        within_window(self.renewal_at(), now, window)
    }
}

/// Anything that can be placed on the timeline for renewal-window checks.
pub trait RenewalInstant {
    fn renewal_instant(&self) -> DateTime<Utc>;
}

impl RenewalInstant for NaiveDate {
    /// Calendar dates are read as midnight UTC.
    fn renewal_instant(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.and_time(NaiveTime::default()))
    }
}

impl RenewalInstant for DateTime<Utc> {
    fn renewal_instant(&self) -> DateTime<Utc> {
        *self
    }
}

impl RenewalInstant for Subscription {
    fn renewal_instant(&self) -> DateTime<Utc> {
        self.renewal_at()
    }
}

impl<T: RenewalInstant + ?Sized> RenewalInstant for &T {
    fn renewal_instant(&self) -> DateTime<Utc> {
        (**self).renewal_instant()
    }
}

/// `at` lies in `[now, now + window]`, both ends inclusive.
///
/// A negative window is empty past `now`. If `now + window` overflows the
/// representable range, the upper bound is open.
pub fn within_window(at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    let window = window.max(Duration::zero());
    at >= now && now.checked_add_signed(window).map_or(true, |end| at <= end)
}

//! Filter evaluation over the collection.

use crate::error::TrackerError;
use crate::types::{BillingCycle, Category, Subscription};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Billing/renewal dimension of a filter. Exactly one applies at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleFilter {
    #[default]
    All,
    Monthly,
    Yearly,
    /// Renewing within the upcoming window.
    Upcoming,
}

impl CycleFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleFilter::All => "all",
            CycleFilter::Monthly => "monthly",
            CycleFilter::Yearly => "yearly",
            CycleFilter::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for CycleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CycleFilter {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(CycleFilter::All),
            "monthly" => Ok(CycleFilter::Monthly),
            "yearly" => Ok(CycleFilter::Yearly),
            "upcoming" => Ok(CycleFilter::Upcoming),
            other => Err(TrackerError::InvalidFilter(format!(
                "unknown cycle filter {other:?}"
            ))),
        }
    }
}

/// Conjunctive filter: every set dimension must match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the name. Empty matches everything.
    pub search: String,

    /// Exact category tag, or `None` for any.
    pub category: Option<Category>,

    pub cycle: CycleFilter,
}

impl FilterCriteria {
    /// Criteria that match every subscription.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build criteria from the string values a filter bar produces.
    ///
    /// An empty `category` means "all categories".
    pub fn from_parts(search: &str, category: &str, cycle: &str) -> Result<Self, TrackerError> {
        Ok(Self {
            search: search.to_string(),
            category: (!category.is_empty()).then(|| Category::new(category)),
            cycle: cycle.parse()?,
        })
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_cycle(mut self, cycle: CycleFilter) -> Self {
        self.cycle = cycle;
        self
    }

    /// Whether no dimension narrows the result.
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty() && self.category.is_none() && self.cycle == CycleFilter::All
    }

    /// Check one subscription against every dimension.
    pub fn matches(&self, sub: &Subscription, now: DateTime<Utc>, upcoming_window: Duration) -> bool {
        if !self.search.is_empty()
            && !sub.name.to_lowercase().contains(&self.search.to_lowercase())
        {
            return false;
        }

        if let Some(ref category) = self.category {
            if &sub.category != category {
                return false;
            }
        }

        match self.cycle {
            CycleFilter::All => true,
            CycleFilter::Monthly => sub.billing_cycle == BillingCycle::Monthly,
            CycleFilter::Yearly => sub.billing_cycle == BillingCycle::Yearly,
            CycleFilter::Upcoming => sub.renews_within(now, upcoming_window),
        }
    }
}

/// Subscriptions matching `criteria`, in collection order.
pub fn apply(
    subscriptions: &[Subscription],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
    upcoming_window: Duration,
) -> Vec<Subscription> {
    subscriptions
        .iter()
        .filter(|sub| criteria.matches(sub, now, upcoming_window))
        .cloned()
        .collect()
}

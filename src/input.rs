//! Validated input for creating and editing subscriptions.
//!
//! The manager never sees raw form data. Callers fill a [`SubscriptionDraft`]
//! (or a [`SubscriptionUpdate`] for partial edits) and validate it; only the
//! resulting [`SubscriptionInput`] / [`SubscriptionPatch`] are accepted by
//! [`SubscriptionManager`](crate::SubscriptionManager).

use crate::error::ValidationError;
use crate::types::{BillingCycle, Category, Subscription};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw, unvalidated subscription fields as a form would collect them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDraft {
    pub name: String,
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    pub category: Category,
    pub next_renewal: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Default for SubscriptionDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            cost: 0.0,
            billing_cycle: BillingCycle::Monthly,
            category: Category::default(),
            next_renewal: None,
            notes: None,
        }
    }
}

impl SubscriptionDraft {
    /// Check every field and produce an input the manager will accept.
    pub fn validate(self) -> Result<SubscriptionInput, ValidationError> {
        validate_name(&self.name)?;
        validate_cost(self.cost)?;
        let next_renewal = self.next_renewal.ok_or(ValidationError::MissingRenewalDate)?;

        Ok(SubscriptionInput {
            name: self.name,
            cost: self.cost,
            billing_cycle: self.billing_cycle,
            category: self.category,
            next_renewal,
            notes: self.notes,
        })
    }
}

impl From<&Subscription> for SubscriptionDraft {
    /// Pre-fill a draft from an existing subscription (edit form).
    fn from(sub: &Subscription) -> Self {
        Self {
            name: sub.name.clone(),
            cost: sub.cost,
            billing_cycle: sub.billing_cycle,
            category: sub.category.clone(),
            next_renewal: Some(sub.next_renewal),
            notes: sub.notes.clone(),
        }
    }
}

/// Validated fields for a new subscription.
///
/// Only obtainable through [`SubscriptionDraft::validate`] or
/// [`SubscriptionInput::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptionInput {
    name: String,
    cost: f64,
    billing_cycle: BillingCycle,
    category: Category,
    next_renewal: NaiveDate,
    notes: Option<String>,
}

impl SubscriptionInput {
    pub fn new(
        name: impl Into<String>,
        cost: f64,
        billing_cycle: BillingCycle,
        category: impl Into<Category>,
        next_renewal: NaiveDate,
    ) -> Result<Self, ValidationError> {
        SubscriptionDraft {
            name: name.into(),
            cost,
            billing_cycle,
            category: category.into(),
            next_renewal: Some(next_renewal),
            notes: None,
        }
        .validate()
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn billing_cycle(&self) -> BillingCycle {
        self.billing_cycle
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn next_renewal(&self) -> NaiveDate {
        self.next_renewal
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (String, f64, BillingCycle, Category, NaiveDate, Option<String>) {
        (
            self.name,
            self.cost,
            self.billing_cycle,
            self.category,
            self.next_renewal,
            self.notes,
        )
    }
}

/// Raw partial edit: `None` leaves a field untouched.
///
/// `notes: Some(None)` clears the notes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub billing_cycle: Option<BillingCycle>,
    pub category: Option<Category>,
    pub next_renewal: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl SubscriptionUpdate {
    /// Check every present field and produce a patch the manager will accept.
    pub fn validate(self) -> Result<SubscriptionPatch, ValidationError> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(cost) = self.cost {
            validate_cost(cost)?;
        }

        Ok(SubscriptionPatch {
            name: self.name,
            cost: self.cost,
            billing_cycle: self.billing_cycle,
            category: self.category,
            next_renewal: self.next_renewal,
            notes: self.notes,
        })
    }
}

/// Validated partial edit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubscriptionPatch {
    name: Option<String>,
    cost: Option<f64>,
    billing_cycle: Option<BillingCycle>,
    category: Option<Category>,
    next_renewal: Option<NaiveDate>,
    notes: Option<Option<String>>,
}

impl SubscriptionPatch {
    /// A patch that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge present fields over `sub`. `id` and `created_at` are never touched.
    pub(crate) fn apply_to(&self, sub: &mut Subscription) {
        if let Some(ref name) = self.name {
            sub.name = name.clone();
        }
        if let Some(cost) = self.cost {
            sub.cost = cost;
        }
        if let Some(cycle) = self.billing_cycle {
            sub.billing_cycle = cycle;
        }
        if let Some(ref category) = self.category {
            sub.category = category.clone();
        }
        if let Some(date) = self.next_renewal {
            sub.next_renewal = date;
        }
        if let Some(ref notes) = self.notes {
            sub.notes = notes.clone();
        }
    }
}

impl From<SubscriptionInput> for SubscriptionPatch {
    /// Full-form edit: every editable field is replaced.
    fn from(input: SubscriptionInput) -> Self {
        let (name, cost, billing_cycle, category, next_renewal, notes) = input.into_parts();
        Self {
            name: Some(name),
            cost: Some(cost),
            billing_cycle: Some(billing_cycle),
            category: Some(category),
            next_renewal: Some(next_renewal),
            notes: Some(notes),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn validate_cost(cost: f64) -> Result<(), ValidationError> {
    if !cost.is_finite() || cost <= 0.0 {
        return Err(ValidationError::InvalidCost);
    }
    Ok(())
}

/// Distinguishes an absent `notes` key from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

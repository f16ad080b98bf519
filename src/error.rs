//! Error types for the subscription tracker.

use crate::types::SubscriptionId;
use thiserror::Error;

/// Reasons a draft or update is rejected before it reaches the manager.
///
/// The messages are user-facing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a subscription name")]
    EmptyName,

    #[error("Please enter a valid cost")]
    InvalidCost,

    #[error("Please select a renewal date")]
    MissingRenewalDate,
}

/// Main error type for tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Corrupt persisted data under key {key}: {reason}")]
    Corruption { key: String, reason: String },

    #[error("Failed to persist key {key}: {reason}")]
    PersistenceWriteFailed { key: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Subscription not found: {0}")]
    NotFound(SubscriptionId),

    #[error("Manager not initialized")]
    NotInitialized,

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            TrackerError::Deserialization(e.to_string())
        } else {
            TrackerError::Serialization(e.to_string())
        }
    }
}

impl From<csv::Error> for TrackerError {
    fn from(e: csv::Error) -> Self {
        TrackerError::Export(e.to_string())
    }
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

//! Quota records and decisions.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// Caller key used when no identity could be derived from the request.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Message attached to a usage snapshot when the store could not be read.
pub const USAGE_UNAVAILABLE: &str = "Could not retrieve usage data";

/// Persisted daily counter for one caller.
///
/// `count` only has meaning for the stored `date`; a record from an earlier
/// day counts as zero until it is overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaRecord {
    pub key: String,
    pub date: String,
    pub count: u32,
}

impl QuotaRecord {
    #[must_use]
    pub fn new(key: impl Into<String>, date: impl Into<String>, count: u32) -> Self {
        Self {
            key: key.into(),
            date: date.into(),
            count,
        }
    }

    /// Count that applies on `today`.
    #[must_use]
    pub fn effective_count(&self, today: &str) -> u32 {
        if self.date == today {
            self.count
        } else {
            0
        }
    }
}

/// Outcome of the store's conditional increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalIncrement {
    /// Record was created or incremented; carries the new count.
    Applied(u32),
    /// Stored date differs from the requested day; nothing was written.
    StaleDate,
}

/// Result of a quota check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed,
    Denied(String),
}

impl QuotaDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub(crate) fn exceeded(limit: u32) -> Self {
        Self::Denied(format!(
            "Daily rate limit of {limit} requests exceeded. Please try again tomorrow."
        ))
    }
}

/// Read-only view of a caller's usage for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    pub key: String,
    pub date: String,
    pub used: u32,
    pub remaining: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UsageSnapshot {
    #[must_use]
    pub fn new(key: &str, today: &str, used: u32, limit: u32) -> Self {
        Self {
            key: key.to_string(),
            date: today.to_string(),
            used,
            remaining: limit.saturating_sub(used),
            limit,
            error: None,
        }
    }

    /// Zero-usage snapshot flagged as unreliable.
    #[must_use]
    pub fn unavailable(key: &str, today: &str, limit: u32) -> Self {
        Self {
            error: Some(USAGE_UNAVAILABLE.to_string()),
            ..Self::new(key, today, 0, limit)
        }
    }
}

/// Format a calendar day the way quota records store it.
#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Current UTC day as `YYYY-MM-DD`.
#[must_use]
pub fn utc_today() -> String {
    format_day(Utc::now().date_naive())
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One complete reading of the four tracked statistics for a country at a
/// point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_cases: u64,
    pub deaths: u64,
    /// Percentage, reported upstream at two decimal places.
    pub fatality_rate: f64,
    pub recoveries: u64,
}

/// Signed per-field difference between two snapshots (`new − old`).
/// Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsDelta {
    pub total_cases: i64,
    pub deaths: i64,
    pub fatality_rate: f64,
    pub recoveries: i64,
}

/// Raw scraped text for the four statistic fields, before parsing.
#[derive(Debug, Clone, Default)]
pub struct RawFields {
    pub total_cases: String,
    pub deaths: String,
    pub fatality_rate: String,
    pub recoveries: String,
}

/// Persisted per-country record: the last snapshot that was successfully
/// notified, and when. The timestamp is for operator inspection only and is
/// never compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryState {
    pub statistics: StatisticsSnapshot,
    pub updated_at: DateTime<Utc>,
}

/// Last-known statistics keyed by country code.
pub type PersistedState = BTreeMap<String, CountryState>;

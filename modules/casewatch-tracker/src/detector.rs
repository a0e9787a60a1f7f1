//! Snapshot comparison — did anything change, and by how much.

use tracing::debug;

use casewatch_common::{StatisticsDelta, StatisticsSnapshot};

/// True iff at least one field differs under exact equality. The rate is
/// compared with exact f64 equality, no epsilon; upstream values are
/// fixed-precision.
pub fn has_changed(old: &StatisticsSnapshot, new: &StatisticsSnapshot) -> bool {
    debug!(
        old_total_cases = old.total_cases,
        new_total_cases = new.total_cases,
        old_deaths = old.deaths,
        new_deaths = new.deaths,
        old_fatality_rate = old.fatality_rate,
        new_fatality_rate = new.fatality_rate,
        old_recoveries = old.recoveries,
        new_recoveries = new.recoveries,
        "Comparing snapshots"
    );

    old.total_cases != new.total_cases
        || old.deaths != new.deaths
        || old.fatality_rate != new.fatality_rate
        || old.recoveries != new.recoveries
}

/// Signed `new - old` for every field, zero included; the formatter decides
/// field-by-field whether to render an annotation.
pub fn compute_delta(old: &StatisticsSnapshot, new: &StatisticsSnapshot) -> StatisticsDelta {
    StatisticsDelta {
        total_cases: new.total_cases as i64 - old.total_cases as i64,
        deaths: new.deaths as i64 - old.deaths as i64,
        fatality_rate: new.fatality_rate - old.fatality_rate,
        recoveries: new.recoveries as i64 - old.recoveries as i64,
    }
}

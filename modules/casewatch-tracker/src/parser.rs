//! Raw-text sanitization and parsing for scraped statistic fields.
//!
//! Dashboard text carries thousands separators, unit suffixes ("%"), and
//! locale decimal commas that must be normalized identically across locales.
//! Integer fields keep only ASCII digits; the rate keeps digits and a decimal
//! point after comma normalization.

use casewatch_common::{CasewatchError, RawFields, StatisticsSnapshot};

/// Parse the four scraped field texts into a typed snapshot.
pub fn parse_snapshot(raw: &RawFields) -> Result<StatisticsSnapshot, CasewatchError> {
    Ok(StatisticsSnapshot {
        total_cases: parse_count("total_cases", &raw.total_cases)?,
        deaths: parse_count("deaths", &raw.deaths)?,
        fatality_rate: parse_rate("fatality_rate", &raw.fatality_rate)?,
        recoveries: parse_count("recoveries", &raw.recoveries)?,
    })
}

/// Strip everything but ASCII digits, then parse base-10.
fn parse_count(field: &str, raw: &str) -> Result<u64, CasewatchError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(parse_error(field, raw));
    }
    digits.parse().map_err(|_| parse_error(field, raw))
}

/// Normalize decimal commas to points, strip everything but digits and
/// points, then parse. A string left with more than one point (a thousands
/// separator colliding with a decimal mark) is an error, not a guess.
fn parse_rate(field: &str, raw: &str) -> Result<f64, CasewatchError> {
    let cleaned: String = raw
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return Err(parse_error(field, raw));
    }
    cleaned.parse().map_err(|_| parse_error(field, raw))
}

fn parse_error(field: &str, raw: &str) -> CasewatchError {
    CasewatchError::Parse(format!("{field}: cannot parse {raw:?} as a number"))
}

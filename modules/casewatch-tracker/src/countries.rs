//! Country watch list — which countries to track, where their dashboards
//! live, and which DOM selectors hold each statistic.
//!
//! Loaded from a JSON file so adding a country is a configuration edit, not a
//! code change. The file is an array: file order is processing order. A broken
//! entry surfaces here as a configuration error, not as a cryptic parse
//! failure mid-run.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use casewatch_common::CasewatchError;

/// Anchor element the dashboard renders once its numbers are in the DOM.
const DEFAULT_READY_SELECTOR: &str = ".drawer-inner";

/// CSS selector for each tracked statistic.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSelectors {
    pub total_cases: String,
    pub deaths: String,
    pub fatality_rate: String,
    pub recoveries: String,
}

impl FieldSelectors {
    /// Field name / selector pairs in report order.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("total_cases", self.total_cases.as_str()),
            ("deaths", self.deaths.as_str()),
            ("fatality_rate", self.fatality_rate.as_str()),
            ("recoveries", self.recoveries.as_str()),
        ]
    }
}

/// One tracked country.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryConfig {
    /// Unique key, also the key into the persisted state.
    pub code: String,
    /// Display glyph prepended to the notification message.
    pub flag: String,
    /// Dashboard URL to render and read.
    pub source_url: String,
    /// Element that must be present before any field is read.
    #[serde(default = "default_ready_selector")]
    pub ready_selector: String,
    pub selectors: FieldSelectors,
}

fn default_ready_selector() -> String {
    DEFAULT_READY_SELECTOR.to_string()
}

/// Load and validate the country list. File order is preserved.
pub fn load(path: &Path) -> Result<Vec<CountryConfig>, CasewatchError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CasewatchError::Config(format!("Cannot read country list {}: {e}", path.display()))
    })?;

    let countries: Vec<CountryConfig> = serde_json::from_str(&raw).map_err(|e| {
        CasewatchError::Config(format!("Invalid country list {}: {e}", path.display()))
    })?;

    validate(&countries)?;
    Ok(countries)
}

/// Validate a country list: unique non-empty codes, non-empty flags, absolute
/// http(s) source URLs, non-empty selectors.
pub fn validate(countries: &[CountryConfig]) -> Result<(), CasewatchError> {
    if countries.is_empty() {
        return Err(CasewatchError::Config("Country list is empty".to_string()));
    }

    let mut seen = HashSet::new();
    for country in countries {
        if country.code.trim().is_empty() {
            return Err(CasewatchError::Config(
                "Country with empty code".to_string(),
            ));
        }
        if !seen.insert(country.code.as_str()) {
            return Err(CasewatchError::Config(format!(
                "Duplicate country code: {}",
                country.code
            )));
        }
        if country.flag.trim().is_empty() {
            return Err(CasewatchError::Config(format!(
                "{}: empty flag",
                country.code
            )));
        }
        let parsed = Url::parse(&country.source_url).map_err(|e| {
            CasewatchError::Config(format!(
                "{}: invalid source_url {}: {e}",
                country.code, country.source_url
            ))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(CasewatchError::Config(format!(
                "{}: source_url must be http(s), got {}",
                country.code,
                parsed.scheme()
            )));
        }
        if country.ready_selector.trim().is_empty() {
            return Err(CasewatchError::Config(format!(
                "{}: empty ready_selector",
                country.code
            )));
        }
        for (field, selector) in country.selectors.fields() {
            if selector.trim().is_empty() {
                return Err(CasewatchError::Config(format!(
                    "{}: empty selector for {field}",
                    country.code
                )));
            }
        }
    }

    Ok(())
}

//! Browserless-backed stat source.
//!
//! One /scrape request per country: render the dashboard, wait for the ready
//! selector, read all four field texts in a single pass.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use browserless_client::BrowserlessClient;
use casewatch_common::RawFields;

use crate::countries::CountryConfig;
use crate::traits::StatSource;

pub struct BrowserlessSource {
    client: BrowserlessClient,
}

impl BrowserlessSource {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        info!(base_url, "Using BrowserlessSource");
        Self {
            client: BrowserlessClient::new(base_url, token),
        }
    }
}

#[async_trait]
impl StatSource for BrowserlessSource {
    async fn fetch_fields(&self, country: &CountryConfig) -> Result<RawFields> {
        info!(
            country = country.code.as_str(),
            url = country.source_url.as_str(),
            "Fetching statistics"
        );

        let selectors: Vec<&str> = country
            .selectors
            .fields()
            .into_iter()
            .map(|(_, selector)| selector)
            .collect();

        let page = self
            .client
            .scrape(
                &country.source_url,
                &selectors,
                Some(&country.ready_selector),
            )
            .await
            .context("Browserless scrape request failed")?;

        let field_text = |field: &str, selector: &str| -> Result<String> {
            page.require_text(selector)
                .map(str::to_string)
                .with_context(|| format!("No element for {field} on {}", country.source_url))
        };

        Ok(RawFields {
            total_cases: field_text("total_cases", &country.selectors.total_cases)?,
            deaths: field_text("deaths", &country.selectors.deaths)?,
            fatality_rate: field_text("fatality_rate", &country.selectors.fatality_rate)?,
            recoveries: field_text("recoveries", &country.selectors.recoveries)?,
        })
    }
}

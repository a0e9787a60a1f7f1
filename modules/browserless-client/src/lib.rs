pub mod error;

pub use error::{BrowserlessError, Result};

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Captures for one requested selector, as returned by /scrape.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedElement {
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub results: Vec<ElementResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementResult {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    data: Vec<ScrapedElement>,
}

/// One rendered page: element text captured per CSS selector.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    elements: Vec<ScrapedElement>,
}

impl ScrapedPage {
    /// Text content of the first element matching `selector`, or `None` when
    /// the selector matched nothing on the rendered page.
    pub fn first_text(&self, selector: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|e| e.selector == selector)
            .and_then(|e| e.results.first())
            .map(|r| r.text.as_str())
    }

    /// Like [`first_text`](Self::first_text), but a missing selector is an error.
    pub fn require_text(&self, selector: &str) -> Result<&str> {
        self.first_text(selector)
            .ok_or_else(|| BrowserlessError::SelectorNotFound(selector.to_string()))
    }
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Render a URL via the Browserless /scrape endpoint and capture element
    /// text for each CSS selector. Navigation waits for network idle, and when
    /// `wait_for` is given the read is further deferred until that element is
    /// present in the DOM. Dashboard widgets fill in asynchronously after the
    /// initial document load.
    pub async fn scrape(
        &self,
        url: &str,
        selectors: &[&str],
        wait_for: Option<&str>,
    ) -> Result<ScrapedPage> {
        let mut endpoint = format!("{}/scrape", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let elements: Vec<_> = selectors
            .iter()
            .map(|s| serde_json::json!({ "selector": s }))
            .collect();
        let mut body = serde_json::json!({
            "url": url,
            "elements": elements,
            "gotoOptions": { "waitUntil": "networkidle0" },
        });
        if let Some(anchor) = wait_for {
            body["waitForSelector"] =
                serde_json::json!({ "selector": anchor, "timeout": 15_000 });
        }

        debug!(url, selectors = selectors.len(), "Browserless scrape request");

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ScrapeResponse = resp.json().await?;
        Ok(ScrapedPage {
            elements: parsed.data,
        })
    }
}

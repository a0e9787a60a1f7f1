// Trait abstractions for the tracker's collaborators.
//
// StatSource — fetch rendered field text from a country dashboard.
// Notifier — deliver a formatted report to a chat channel.
// StateStore — load/save the country → last-snapshot mapping.
//
// These enable deterministic testing with MockSource, MockNotifier and
// MemoryStore: no browser, no Slack, no disk. `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

use casewatch_common::{CasewatchError, PersistedState, RawFields};

use crate::countries::CountryConfig;

#[async_trait]
pub trait StatSource: Send + Sync {
    /// Fetch the raw text of each statistic field from the country's rendered
    /// dashboard. Must not resolve before the page has stabilized: the stat
    /// widgets fill in after the initial document load.
    async fn fetch_fields(&self, country: &CountryConfig) -> Result<RawFields>;
}

/// Receipt returned by a successful delivery.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub channel: String,
    pub message_id: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a text message to a channel.
    async fn deliver(&self, channel: &str, text: &str) -> Result<DeliveryReceipt>;
}

pub trait StateStore: Send + Sync {
    /// Load the full country → last-snapshot mapping.
    fn load(&self) -> Result<PersistedState, CasewatchError>;

    /// Overwrite the persisted mapping. Called synchronously after each
    /// notified change, before the run moves to the next country.
    fn save(&self, state: &PersistedState) -> Result<(), CasewatchError>;
}

// Test mocks for the tracker pipeline.
//
// Three mocks matching the three trait boundaries:
// - MockSource (StatSource) — HashMap-based country→raw fields
// - MockNotifier (Notifier) — records deliveries, optionally failing
// - MemoryStore (StateStore) — Mutex-held in-memory state
//
// Plus fixture helpers for snapshots, raw fields and country configs.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use casewatch_common::{CasewatchError, PersistedState, RawFields, StatisticsSnapshot};

use crate::countries::{CountryConfig, FieldSelectors};
use crate::traits::{DeliveryReceipt, Notifier, StatSource, StateStore};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn snapshot(
    total_cases: u64,
    deaths: u64,
    fatality_rate: f64,
    recoveries: u64,
) -> StatisticsSnapshot {
    StatisticsSnapshot {
        total_cases,
        deaths,
        fatality_rate,
        recoveries,
    }
}

pub fn raw_fields(
    total_cases: &str,
    deaths: &str,
    fatality_rate: &str,
    recoveries: &str,
) -> RawFields {
    RawFields {
        total_cases: total_cases.to_string(),
        deaths: deaths.to_string(),
        fatality_rate: fatality_rate.to_string(),
        recoveries: recoveries.to_string(),
    }
}

/// Minimal valid country config for tests.
pub fn country(code: &str, flag: &str) -> CountryConfig {
    CountryConfig {
        code: code.to_string(),
        flag: flag.to_string(),
        source_url: format!("https://covid.example/{code}"),
        ready_selector: ".drawer-inner".to_string(),
        selectors: FieldSelectors {
            total_cases: ".section-el .section-el-number".to_string(),
            deaths: ".section-el:nth-child(5) .section-el-number".to_string(),
            fatality_rate: ".section-el:nth-child(10) .section-el-number".to_string(),
            recoveries: ".section-el:nth-child(6) .section-el-number".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// HashMap-based stat source. Returns `Err` for unregistered country codes.
/// Builder pattern: `.on_country()`, `.failing_for()`.
pub struct MockSource {
    responses: HashMap<String, RawFields>,
    failing: HashSet<String>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    pub fn on_country(mut self, code: &str, fields: RawFields) -> Self {
        self.responses.insert(code.to_string(), fields);
        self
    }

    /// Make fetches for `code` fail with a simulated rendering error.
    pub fn failing_for(mut self, code: &str) -> Self {
        self.failing.insert(code.to_string());
        self
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatSource for MockSource {
    async fn fetch_fields(&self, country: &CountryConfig) -> Result<RawFields> {
        if self.failing.contains(&country.code) {
            bail!("MockSource: simulated fetch failure for {}", country.code);
        }
        self.responses
            .get(&country.code)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockSource: no fields registered for {}", country.code))
    }
}

// ---------------------------------------------------------------------------
// MockNotifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel: String,
    pub text: String,
}

/// Records every delivered message; optionally fails every delivery.
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: true,
        }
    }

    /// Shared handle to the delivery record, for assertions after the
    /// notifier has been boxed into a Tracker.
    pub fn sent(&self) -> Arc<Mutex<Vec<SentMessage>>> {
        self.sent.clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn deliver(&self, channel: &str, text: &str) -> Result<DeliveryReceipt> {
        if self.failing {
            bail!("MockNotifier: simulated delivery failure");
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(DeliveryReceipt {
            channel: channel.to_string(),
            message_id: format!("{}.000100", sent.len()),
        })
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Mutex-held in-memory state store. Clones share the same underlying state,
/// so a test can keep a handle across tracker runs.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<PersistedState>>,
    fail_load: bool,
    fail_save: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_state(PersistedState::new())
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            fail_load: false,
            fail_save: false,
        }
    }

    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::new()
        }
    }

    pub fn failing_save(state: PersistedState) -> Self {
        Self {
            fail_save: true,
            ..Self::with_state(state)
        }
    }

    /// Shared handle to the stored state, for assertions after boxing.
    pub fn state(&self) -> Arc<Mutex<PersistedState>> {
        self.state.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<PersistedState, CasewatchError> {
        if self.fail_load {
            return Err(CasewatchError::Store(
                "MemoryStore: simulated load failure".to_string(),
            ));
        }
        Ok(self.state.lock().unwrap().clone())
    }

    fn save(&self, state: &PersistedState) -> Result<(), CasewatchError> {
        if self.fail_save {
            return Err(CasewatchError::Store(
                "MemoryStore: simulated save failure".to_string(),
            ));
        }
        *self.state.lock().unwrap() = state.clone();
        Ok(())
    }
}

//! Tracker run log — persisted JSON timeline of every action taken during a
//! run.
//!
//! Each run produces a single `{DATA_DIR}/tracker-runs/{run_id}.json` file
//! containing an ordered list of events with timestamps.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::stats::RunStats;

/// Root data directory, controlled by `DATA_DIR` env var (default: `"data"`).
pub fn data_dir() -> PathBuf {
    PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

pub struct RunLog {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    events: Vec<RunEvent>,
    seq: u32,
}

#[derive(Serialize)]
struct RunEvent {
    seq: u32,
    ts: DateTime<Utc>,
    #[serde(flatten)]
    kind: EventKind,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    FieldsFetched {
        country: String,
        url: String,
    },
    NothingChanged {
        country: String,
    },
    ChangeNotified {
        country: String,
        channel: String,
        message_id: String,
        first_observation: bool,
    },
    SnapshotPersisted {
        country: String,
    },
    CountryFailed {
        country: String,
        phase: String,
        message: String,
    },
}

impl RunLog {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            events: Vec::new(),
            seq: 0,
        }
    }

    pub fn log(&mut self, kind: EventKind) {
        self.events.push(RunEvent {
            seq: self.seq,
            ts: Utc::now(),
            kind,
        });
        self.seq += 1;
    }

    /// Serialize the run log to JSON and write it under `dir`.
    /// Returns the file path on success.
    pub fn save(&self, dir: &Path, stats: &RunStats) -> Result<PathBuf> {
        let dir = dir.join("tracker-runs");
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.json", self.run_id));

        let output = SerializedRunLog {
            run_id: &self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            stats: SerializedStats::from(stats),
            events: &self.events,
        };

        std::fs::write(&path, serde_json::to_string_pretty(&output)?)?;
        info!(path = %path.display(), events = self.events.len(), "Tracker run log saved");

        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Serialization wrappers
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SerializedRunLog<'a> {
    run_id: &'a str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    stats: SerializedStats,
    events: &'a [RunEvent],
}

#[derive(Serialize)]
struct SerializedStats {
    countries_checked: u32,
    unchanged: u32,
    notified: u32,
    first_observations: u32,
    failed: u32,
}

impl From<&RunStats> for SerializedStats {
    fn from(s: &RunStats) -> Self {
        Self {
            countries_checked: s.countries_checked,
            unchanged: s.unchanged,
            notified: s.notified,
            first_observations: s.first_observations,
            failed: s.failed,
        }
    }
}

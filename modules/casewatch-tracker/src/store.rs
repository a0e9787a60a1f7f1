//! JSON state store — last-known statistics per country, on disk.
//!
//! Full-file overwrite semantics, pretty-printed for human inspection. Writes
//! go to a temp file in the same directory and are renamed over the old
//! state, so a crash mid-save never leaves a partial file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use casewatch_common::{CasewatchError, PersistedState};

use crate::traits::StateStore;

pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for JsonStateStore {
    /// Load the full state mapping. A missing file is an empty state (first
    /// run ever); any other read or parse failure is an error, since the
    /// caller cannot safely reason about existing state.
    fn load(&self) -> Result<PersistedState, CasewatchError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No state file yet, starting empty");
                return Ok(PersistedState::new());
            }
            Err(e) => {
                return Err(CasewatchError::Store(format!(
                    "Cannot read state file {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&raw).map_err(|e| {
            CasewatchError::Store(format!(
                "Corrupt state file {}: {e}",
                self.path.display()
            ))
        })
    }

    fn save(&self, state: &PersistedState) -> Result<(), CasewatchError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| CasewatchError::Store(format!("Cannot serialize state: {e}")))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            CasewatchError::Store(format!("Cannot create temp state file in {}: {e}", dir.display()))
        })?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| CasewatchError::Store(format!("Cannot write state: {e}")))?;
        tmp.flush()
            .map_err(|e| CasewatchError::Store(format!("Cannot flush state: {e}")))?;
        tmp.persist(&self.path).map_err(|e| {
            CasewatchError::Store(format!(
                "Cannot replace state file {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use casewatch_common::CountryState;

    use crate::testing::snapshot;

    fn state_with(code: &str) -> PersistedState {
        let mut state = PersistedState::new();
        state.insert(
            code.to_string(),
            CountryState {
                statistics: snapshot(1000, 50, 5.00, 200),
                updated_at: Utc::now(),
            },
        );
        state
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("state.json"));

        store.save(&state_with("mx")).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.get("mx").unwrap().statistics,
            snapshot(1000, 50, 5.00, 200)
        );
    }

    #[test]
    fn missing_file_loads_as_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonStateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CasewatchError::Store(_)));
    }

    #[test]
    fn save_overwrites_the_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("state.json"));

        store.save(&state_with("mx")).unwrap();
        store.save(&state_with("ar")).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.contains_key("ar"));
        assert!(!loaded.contains_key("mx"));
    }

    #[test]
    fn state_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        JsonStateStore::new(&path).save(&state_with("mx")).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'));
        assert!(raw.contains("  \"mx\""));
    }
}

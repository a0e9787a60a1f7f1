//! The per-country orchestration loop.
//!
//! Each country walks Fetch → Parse → Detect, then either skips (unchanged)
//! or Format → Notify → Persist. Failures are isolated per country. Persist
//! runs only after a successful Notify, so a persisted change is always one
//! that was reported; a failed Notify leaves the old snapshot in place and
//! the next run re-attempts the same change.

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use casewatch_common::{CasewatchError, CountryState, PersistedState};

use crate::countries::CountryConfig;
use crate::detector;
use crate::parser;
use crate::report;
use crate::run_log::{EventKind, RunLog};
use crate::stats::RunStats;
use crate::traits::{Notifier, StatSource, StateStore};

enum CountryOutcome {
    Unchanged,
    Notified { first_observation: bool },
}

pub struct Tracker {
    source: Box<dyn StatSource>,
    notifier: Box<dyn Notifier>,
    store: Box<dyn StateStore>,
    channel: String,
    run_log_dir: Option<std::path::PathBuf>,
}

impl Tracker {
    pub fn new(
        source: Box<dyn StatSource>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn StateStore>,
        channel: &str,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
            channel: channel.to_string(),
            run_log_dir: None,
        }
    }

    /// Persist a JSON run log under `dir` at the end of each run.
    pub fn with_run_log_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.run_log_dir = Some(dir.into());
        self
    }

    /// Run one full tracking cycle over the configured countries, in order.
    ///
    /// A store-wide load failure is fatal. Everything else is contained to
    /// the country it happened in.
    pub async fn run(&self, countries: &[CountryConfig]) -> Result<RunStats, CasewatchError> {
        let mut state = self.store.load()?;

        let mut stats = RunStats::default();
        let mut run_log = RunLog::new(Uuid::new_v4().to_string());

        for country in countries {
            stats.countries_checked += 1;

            match self
                .process_country(country, &mut state, &mut run_log)
                .await
            {
                Ok(CountryOutcome::Unchanged) => {
                    info!(country = country.code.as_str(), "Nothing changed");
                    run_log.log(EventKind::NothingChanged {
                        country: country.code.clone(),
                    });
                    stats.unchanged += 1;
                }
                Ok(CountryOutcome::Notified { first_observation }) => {
                    stats.notified += 1;
                    if first_observation {
                        stats.first_observations += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        country = country.code.as_str(),
                        phase = e.phase(),
                        error = %e,
                        "Country update failed"
                    );
                    run_log.log(EventKind::CountryFailed {
                        country: country.code.clone(),
                        phase: e.phase().to_string(),
                        message: e.to_string(),
                    });
                    stats.failed += 1;
                }
            }
        }

        if let Some(dir) = &self.run_log_dir {
            if let Err(e) = run_log.save(dir, &stats) {
                error!(error = %e, "Failed to save run log");
            }
        }

        Ok(stats)
    }

    async fn process_country(
        &self,
        country: &CountryConfig,
        state: &mut PersistedState,
        run_log: &mut RunLog,
    ) -> Result<CountryOutcome, CasewatchError> {
        // Fetch
        let raw = self
            .source
            .fetch_fields(country)
            .await
            .map_err(|e| CasewatchError::Fetch(format!("{e:#}")))?;

        run_log.log(EventKind::FieldsFetched {
            country: country.code.clone(),
            url: country.source_url.clone(),
        });

        // Parse
        let new = parser::parse_snapshot(&raw)?;

        // Detect. A country with no prior snapshot is always-changed.
        let old = state.get(&country.code).map(|s| s.statistics);
        if let Some(ref old_snapshot) = old {
            if !detector::has_changed(old_snapshot, &new) {
                return Ok(CountryOutcome::Unchanged);
            }
        }
        let first_observation = old.is_none();

        // Format
        let message = report::format_message(&country.flag, old.as_ref(), &new, &country.source_url);

        // Notify. A failure here must NOT persist the snapshot; the next run
        // then re-attempts the same change.
        let receipt = self
            .notifier
            .deliver(&self.channel, &message)
            .await
            .map_err(|e| CasewatchError::Notify(format!("{e:#}")))?;

        info!(
            country = country.code.as_str(),
            first_observation, "Change notified"
        );
        run_log.log(EventKind::ChangeNotified {
            country: country.code.clone(),
            channel: receipt.channel,
            message_id: receipt.message_id,
            first_observation,
        });

        // Persist. Write-through before moving on to the next country.
        state.insert(
            country.code.clone(),
            CountryState {
                statistics: new,
                updated_at: Utc::now(),
            },
        );
        self.store.save(state)?;
        run_log.log(EventKind::SnapshotPersisted {
            country: country.code.clone(),
        });

        Ok(CountryOutcome::Notified { first_observation })
    }
}

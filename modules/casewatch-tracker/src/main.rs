use std::path::Path;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use casewatch_common::Config;
use casewatch_tracker::countries;
use casewatch_tracker::notifier::SlackNotifier;
use casewatch_tracker::run_log;
use casewatch_tracker::source::BrowserlessSource;
use casewatch_tracker::store::JsonStateStore;
use casewatch_tracker::tracker::Tracker;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("casewatch_tracker=info".parse()?),
        )
        .init();

    info!("Casewatch tracker starting...");

    let config = Config::from_env();
    config.log_redacted();

    let countries = countries::load(Path::new(&config.countries_file))?;
    info!(countries = countries.len(), "Country watch list loaded");

    let tracker = Tracker::new(
        Box::new(BrowserlessSource::new(
            &config.browserless_url,
            config.browserless_token.as_deref(),
        )),
        Box::new(SlackNotifier::new(&config.slack_token)),
        Box::new(JsonStateStore::new(&config.state_file)),
        &config.slack_channel,
    )
    .with_run_log_dir(run_log::data_dir());

    let stats = tracker.run(&countries).await?;
    info!("Tracker run complete. {stats}");

    Ok(())
}

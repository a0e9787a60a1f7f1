// End-to-end tracker scenarios against the in-memory mocks: change
// detection, first observations, per-country failure isolation, and the
// notify-before-persist guarantee.

use chrono::Utc;

use casewatch_common::{CasewatchError, CountryState, PersistedState, StatisticsSnapshot};
use casewatch_tracker::testing::{
    country, raw_fields, snapshot, MemoryStore, MockNotifier, MockSource,
};
use casewatch_tracker::tracker::Tracker;

const CHANNEL: &str = "CUW14R946";

fn seeded_state(code: &str, statistics: StatisticsSnapshot) -> PersistedState {
    let mut state = PersistedState::new();
    state.insert(
        code.to_string(),
        CountryState {
            statistics,
            updated_at: Utc::now(),
        },
    );
    state
}

#[tokio::test]
async fn unchanged_country_is_skipped() {
    let source = MockSource::new().on_country("mx", raw_fields("1,000", "50", "5.00%", "200"));
    let notifier = MockNotifier::new();
    let sent = notifier.sent();
    let store = MemoryStore::with_state(seeded_state("mx", snapshot(1000, 50, 5.00, 200)));
    let state = store.state();

    let tracker = Tracker::new(
        Box::new(source),
        Box::new(notifier),
        Box::new(store),
        CHANNEL,
    );
    let stats = tracker.run(&[country("mx", "🇲🇽")]).await.unwrap();

    assert_eq!(stats.countries_checked, 1);
    assert_eq!(stats.unchanged, 1);
    assert_eq!(stats.notified, 0);
    assert!(sent.lock().unwrap().is_empty());
    assert_eq!(
        state.lock().unwrap().get("mx").unwrap().statistics,
        snapshot(1000, 50, 5.00, 200)
    );
}

#[tokio::test]
async fn changed_country_notifies_then_persists() {
    let source = MockSource::new().on_country("mx", raw_fields("1,050", "52", "4.95%", "230"));
    let notifier = MockNotifier::new();
    let sent = notifier.sent();
    let store = MemoryStore::with_state(seeded_state("mx", snapshot(1000, 50, 5.00, 200)));
    let state = store.state();

    let tracker = Tracker::new(
        Box::new(source),
        Box::new(notifier),
        Box::new(store),
        CHANNEL,
    );
    let stats = tracker.run(&[country("mx", "🇲🇽")]).await.unwrap();

    assert_eq!(stats.notified, 1);
    assert_eq!(stats.first_observations, 0);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].channel, CHANNEL);
    assert_eq!(
        sent[0].text,
        "🇲🇽\n\
         Total cases: 1,050 (+50)\n\
         Deaths: 52 (+2)\n\
         Fatality rate: 4.95% (-0.05%)\n\
         Recoveries: 230 (+30)\n\
         https://covid.example/mx"
    );

    assert_eq!(
        state.lock().unwrap().get("mx").unwrap().statistics,
        snapshot(1050, 52, 4.95, 230)
    );
}

#[tokio::test]
async fn first_observation_notifies_without_deltas_and_seeds_the_store() {
    let source = MockSource::new().on_country("mx", raw_fields("1,050", "52", "4.95%", "230"));
    let notifier = MockNotifier::new();
    let sent = notifier.sent();
    let store = MemoryStore::new();
    let state = store.state();

    let tracker = Tracker::new(
        Box::new(source),
        Box::new(notifier),
        Box::new(store),
        CHANNEL,
    );
    let stats = tracker.run(&[country("mx", "🇲🇽")]).await.unwrap();

    assert_eq!(stats.notified, 1);
    assert_eq!(stats.first_observations, 1);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].text.contains('('));

    assert_eq!(
        state.lock().unwrap().get("mx").unwrap().statistics,
        snapshot(1050, 52, 4.95, 230)
    );
}

#[tokio::test]
async fn fetch_failure_does_not_block_later_countries() {
    let source = MockSource::new()
        .failing_for("mx")
        .on_country("ar", raw_fields("800", "30", "3.75%", "100"));
    let notifier = MockNotifier::new();
    let sent = notifier.sent();
    let store = MemoryStore::with_state(seeded_state("mx", snapshot(1000, 50, 5.00, 200)));
    let state = store.state();

    let tracker = Tracker::new(
        Box::new(source),
        Box::new(notifier),
        Box::new(store),
        CHANNEL,
    );
    let stats = tracker
        .run(&[country("mx", "🇲🇽"), country("ar", "🇦🇷")])
        .await
        .unwrap();

    assert_eq!(stats.countries_checked, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.notified, 1);

    // Argentina was notified and persisted; Mexico's state is untouched.
    assert_eq!(sent.lock().unwrap().len(), 1);
    let state = state.lock().unwrap();
    assert_eq!(state.get("mx").unwrap().statistics, snapshot(1000, 50, 5.00, 200));
    assert_eq!(state.get("ar").unwrap().statistics, snapshot(800, 30, 3.75, 100));
}

#[tokio::test]
async fn parse_failure_does_not_block_later_countries() {
    let source = MockSource::new()
        .on_country("mx", raw_fields("N/A", "—", "?", ""))
        .on_country("ar", raw_fields("800", "30", "3.75%", "100"));
    let notifier = MockNotifier::new();
    let store = MemoryStore::new();
    let state = store.state();

    let tracker = Tracker::new(
        Box::new(source),
        Box::new(notifier),
        Box::new(store),
        CHANNEL,
    );
    let stats = tracker
        .run(&[country("mx", "🇲🇽"), country("ar", "🇦🇷")])
        .await
        .unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.notified, 1);
    let state = state.lock().unwrap();
    assert!(!state.contains_key("mx"));
    assert!(state.contains_key("ar"));
}

#[tokio::test]
async fn notify_failure_skips_persist_and_the_next_run_retries() {
    let old = snapshot(1000, 50, 5.00, 200);
    let store = MemoryStore::with_state(seeded_state("mx", old));
    let state = store.state();

    // First run: delivery fails, so the new snapshot must not be persisted.
    let tracker = Tracker::new(
        Box::new(MockSource::new().on_country("mx", raw_fields("1,050", "52", "4.95%", "230"))),
        Box::new(MockNotifier::failing()),
        Box::new(store.clone()),
        CHANNEL,
    );
    let stats = tracker.run(&[country("mx", "🇲🇽")]).await.unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.notified, 0);
    assert_eq!(state.lock().unwrap().get("mx").unwrap().statistics, old);

    // Second run with the same upstream values: the change is re-detected,
    // re-notified, and finally persisted.
    let notifier = MockNotifier::new();
    let sent = notifier.sent();
    let tracker = Tracker::new(
        Box::new(MockSource::new().on_country("mx", raw_fields("1,050", "52", "4.95%", "230"))),
        Box::new(notifier),
        Box::new(store),
        CHANNEL,
    );
    let stats = tracker.run(&[country("mx", "🇲🇽")]).await.unwrap();

    assert_eq!(stats.notified, 1);
    assert_eq!(sent.lock().unwrap().len(), 1);
    assert_eq!(
        state.lock().unwrap().get("mx").unwrap().statistics,
        snapshot(1050, 52, 4.95, 230)
    );
}

#[tokio::test]
async fn save_failure_counts_as_a_country_failure_after_notify() {
    let notifier = MockNotifier::new();
    let sent = notifier.sent();
    let store = MemoryStore::failing_save(seeded_state("mx", snapshot(1000, 50, 5.00, 200)));

    let tracker = Tracker::new(
        Box::new(MockSource::new().on_country("mx", raw_fields("1,050", "52", "4.95%", "230"))),
        Box::new(notifier),
        Box::new(store),
        CHANNEL,
    );
    let stats = tracker.run(&[country("mx", "🇲🇽")]).await.unwrap();

    // The message went out, but the country still counts as failed.
    assert_eq!(sent.lock().unwrap().len(), 1);
    assert_eq!(stats.notified, 0);
    assert_eq!(stats.failed, 1);
}

#[tokio::test]
async fn store_wide_load_failure_is_fatal() {
    let tracker = Tracker::new(
        Box::new(MockSource::new().on_country("mx", raw_fields("1,050", "52", "4.95%", "230"))),
        Box::new(MockNotifier::new()),
        Box::new(MemoryStore::failing_load()),
        CHANNEL,
    );
    let err = tracker.run(&[country("mx", "🇲🇽")]).await.unwrap_err();
    assert!(matches!(err, CasewatchError::Store(_)));
}

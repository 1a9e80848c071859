//! End-to-end sampling scenarios, driven over a paused clock.

use std::{sync::Arc, time::Duration};

use panoptes::{
    channels::NotificationChannel,
    config::AppConfig,
    dispatcher::AlertDispatcher,
    engine::Sampler,
    sampling::SourceError,
    test_helpers::{AppConfigBuilder, FailingChannel, FakeReader, RecordingChannel},
};
use tokio_util::sync::CancellationToken;

fn config() -> AppConfig {
    AppConfigBuilder::new()
        .threshold(3)
        .sampling_interval(1000)
        .window(5)
        .cooldown(120)
        .source_read_timeout(100)
        .source("cam-0", "http://127.0.0.1:9000/count")
        .build()
}

fn recording_dispatcher() -> (Arc<AlertDispatcher>, Arc<RecordingChannel>) {
    let recording = Arc::new(RecordingChannel::new());
    let dispatcher = Arc::new(AlertDispatcher::new(vec![(
        "recording".to_string(),
        recording.clone() as Arc<dyn NotificationChannel>,
    )]));
    (dispatcher, recording)
}

/// Runs a sampler over `reader` until `until_ms` of paused time has elapsed,
/// then cancels it and drains the dispatcher.
async fn run_scenario(
    config: AppConfig,
    reader: FakeReader,
    dispatcher: Arc<AlertDispatcher>,
    until_ms: u64,
) {
    let token = CancellationToken::new();
    let sampler =
        Sampler::new(Arc::new(config), Arc::new(reader), dispatcher.clone(), token.clone());

    let handle = tokio::spawn(sampler.run());
    tokio::time::sleep(Duration::from_millis(until_ms)).await;
    token.cancel();
    handle.await.unwrap();
    dispatcher.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn escalates_when_a_closed_window_breaches_the_threshold() {
    let reader = FakeReader::new().source("cam-0", [Ok(1), Ok(2), Ok(4), Ok(2), Ok(1)]);
    let (dispatcher, recording) = recording_dispatcher();

    run_scenario(config(), reader, dispatcher, 5500).await;

    let events = recording.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].aggregate, 4);
    assert_eq!(events[0].threshold, 3);
    assert_eq!(events[0].cooldown_secs, 120);
}

#[tokio::test(start_paused = true)]
async fn cooldown_suppresses_the_next_breaching_window() {
    let reader = FakeReader::new().source(
        "cam-0",
        [Ok(1), Ok(2), Ok(4), Ok(2), Ok(1), Ok(5), Ok(5), Ok(5), Ok(5), Ok(5)],
    );
    let (dispatcher, recording) = recording_dispatcher();

    // The second window closes at t=10s with max 5, well inside the 120s
    // cooldown opened at t=5s.
    run_scenario(config(), reader, dispatcher, 10_500).await;

    let events = recording.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].aggregate, 4);
}

#[tokio::test(start_paused = true)]
async fn escalates_again_once_the_cooldown_expires() {
    let config = AppConfigBuilder::new()
        .threshold(3)
        .sampling_interval(1000)
        .window(5)
        .cooldown(3)
        .source_read_timeout(100)
        .source("cam-0", "http://127.0.0.1:9000/count")
        .build();
    let reader = FakeReader::new().source(
        "cam-0",
        [Ok(1), Ok(2), Ok(4), Ok(2), Ok(1), Ok(5), Ok(5), Ok(5), Ok(5), Ok(5)],
    );
    let (dispatcher, recording) = recording_dispatcher();

    run_scenario(config, reader, dispatcher, 10_500).await;

    let events = recording.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].aggregate, 4);
    assert_eq!(events[1].aggregate, 5);
}

#[tokio::test(start_paused = true)]
async fn unavailable_ticks_leave_the_window_untouched() {
    // The unavailable tick at t=2s produces no sample; the window still
    // closes at t=5s carrying the maximum from t=1s.
    let reader = FakeReader::new().source(
        "cam-0",
        [Ok(4), Err(SourceError::Unavailable), Ok(1), Ok(1), Ok(1)],
    );
    let (dispatcher, recording) = recording_dispatcher();

    run_scenario(config(), reader, dispatcher, 5500).await;

    let events = recording.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].aggregate, 4);
}

#[tokio::test(start_paused = true)]
async fn fully_unavailable_sources_never_escalate() {
    let reader = FakeReader::new()
        .source("cam-0", std::iter::repeat(Err(SourceError::Unavailable)).take(20));
    let (dispatcher, recording) = recording_dispatcher();

    run_scenario(config(), reader, dispatcher, 10_500).await;

    assert!(recording.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failing_channel_does_not_starve_the_healthy_one() {
    let recording = Arc::new(RecordingChannel::new());
    let dispatcher = Arc::new(AlertDispatcher::new(vec![
        ("failing".to_string(), Arc::new(FailingChannel) as Arc<dyn NotificationChannel>),
        ("recording".to_string(), recording.clone() as Arc<dyn NotificationChannel>),
    ]));
    let reader = FakeReader::new().source("cam-0", [Ok(4), Ok(4), Ok(4), Ok(4), Ok(4)]);

    run_scenario(config(), reader, dispatcher, 5500).await;

    let events = recording.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].aggregate, 4);
}

#[tokio::test(start_paused = true)]
async fn aggregates_across_sources_before_windowing() {
    // Rounds of [2, 3] average to 2.5, which rounds away from zero to 3.
    let config = AppConfigBuilder::new()
        .threshold(2)
        .sampling_interval(1000)
        .window(2)
        .cooldown(120)
        .source_read_timeout(100)
        .source("cam-0", "http://127.0.0.1:9000/count")
        .source("cam-1", "http://127.0.0.1:9001/count")
        .build();
    let reader = FakeReader::new()
        .source("cam-0", [Ok(2), Ok(2), Ok(2)])
        .source("cam-1", [Ok(3), Ok(3), Ok(3)]);
    let (dispatcher, recording) = recording_dispatcher();

    run_scenario(config, reader, dispatcher, 2500).await;

    let events = recording.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].aggregate, 3);
}

#[tokio::test(start_paused = true)]
async fn sampler_stops_on_its_own_when_every_source_ends() {
    let reader = FakeReader::new().source("cam-0", [Ok(1), Ok(1)]);
    let (dispatcher, recording) = recording_dispatcher();
    let token = CancellationToken::new();
    let sampler =
        Sampler::new(Arc::new(config()), Arc::new(reader), dispatcher.clone(), token.clone());

    // The script runs dry on the third tick; the sampler removes the source
    // and requests shutdown itself.
    let handle = tokio::spawn(sampler.run());
    tokio::time::timeout(Duration::from_secs(60), handle)
        .await
        .expect("sampler should stop without external cancellation")
        .unwrap();

    dispatcher.shutdown().await;
    assert!(recording.events().is_empty());
    assert!(token.is_cancelled());
}

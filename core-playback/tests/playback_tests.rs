//! Playback and volume tests against the scripted audio graph.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use bridge_traits::audio::GainControl;
use bridge_traits::error::BridgeError;
use core_playback::{PlayOptions, PlaybackError, PlaybackOutcome, PlaybackState};

use common::*;

#[tokio::test]
async fn test_play_wires_source_through_gain_to_destination() {
    let http = Arc::new(http_expecting("https://cdn.test/sfx/click.mp3", b"click"));
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(http, store, cdn_options());

    let handle = player.play("click.mp3", PlayOptions::default());
    let stop = handle.stop_handle();
    assert_eq!(stop.state(), PlaybackState::Pending);

    assert_eq!(handle.outcome().await.unwrap(), PlaybackOutcome::Started);
    assert_eq!(stop.state(), PlaybackState::Playing);

    let sources = player.graph().sources();
    let gains = player.graph().gains();
    assert_eq!(sources.len(), 1);
    assert_eq!(gains.len(), 1);

    let source = &sources[0];
    let gain = &gains[0];
    assert_eq!(source.buffer.lock().as_ref().map(|b| b.frames), Some(50));
    assert!(!source.looping.load(Ordering::SeqCst));
    assert_eq!(*source.started_at.lock(), Some(0.0));
    assert_eq!(*source.connected_gain.lock(), Some(gain.id));
    assert!(source.has_on_ended());
    assert_eq!(*gain.value.lock(), 1.0);
    assert!(gain.to_destination.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_play_options_override_loop_and_volume() {
    let http = Arc::new(http_expecting("https://cdn.test/sfx/theme.ogg", b"theme"));
    let store = Arc::new(MemoryByteStore::new());
    let options = cdn_options().with_volumn(0.8);
    let player = build_player(http, store, options);

    let play = PlayOptions::default().looping(true).with_volumn(0.0);
    let outcome = player.play("theme.ogg", play).outcome().await.unwrap();

    assert_eq!(outcome, PlaybackOutcome::Started);
    let source = &player.graph().sources()[0];
    assert!(source.looping.load(Ordering::SeqCst));
    assert_eq!(*player.graph().gains()[0].value.lock(), 0.0);
}

#[tokio::test]
async fn test_play_uses_player_volume_by_default() {
    let http = Arc::new(http_expecting("https://cdn.test/sfx/click.mp3", b"click"));
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(http, store, cdn_options().with_volumn(0.25));

    player
        .play("click.mp3", PlayOptions::default())
        .outcome()
        .await
        .unwrap();

    assert_eq!(*player.graph().gains()[0].value.lock(), 0.25);
}

#[tokio::test]
async fn test_stop_after_start_halts_and_disconnects() {
    let http = Arc::new(http_expecting("https://cdn.test/sfx/click.mp3", b"click"));
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(http, store, cdn_options());

    let handle = player.play("click.mp3", PlayOptions::default());
    let stop = handle.stop_handle();
    handle.outcome().await.unwrap();

    stop.stop();
    stop.stop();

    let source = &player.graph().sources()[0];
    assert_eq!(stop.state(), PlaybackState::Stopped);
    assert!(source.is_stopped());
    assert!(source.is_disconnected());
    assert!(!source.has_on_ended());
}

#[tokio::test]
async fn test_stop_before_load_completes_prevents_start() {
    let http = Arc::new(GatedHttp::new(b"late-bytes"));
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(http.clone(), store, cdn_options());

    let handle = player.play("late.mp3", PlayOptions::default());
    settle().await;
    assert_eq!(http.calls(), 1);

    handle.stop();
    assert_eq!(handle.state(), PlaybackState::Stopped);

    http.open();
    let outcome = handle.outcome().await.unwrap();

    assert_eq!(outcome, PlaybackOutcome::StoppedBeforeStart);
    assert!(player.graph().sources().is_empty());
    // The load itself still completed and was cached.
    assert!(player.is_cached("late.mp3"));
}

#[tokio::test]
async fn test_natural_end_finishes_and_later_stop_is_noop() {
    let http = Arc::new(http_expecting("https://cdn.test/sfx/click.mp3", b"click"));
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(http, store, cdn_options());

    let handle = player.play("click.mp3", PlayOptions::default());
    let stop = handle.stop_handle();
    handle.outcome().await.unwrap();

    let source = player.graph().sources()[0].clone();
    source.finish_naturally();
    assert_eq!(stop.state(), PlaybackState::Finished);

    stop.stop();
    assert_eq!(stop.state(), PlaybackState::Finished);
    assert!(!source.is_stopped());
}

#[tokio::test]
async fn test_play_reports_load_failure() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::OperationFailed("offline".to_string())));
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(Arc::new(http), store, cdn_options());

    let handle = player.play("click.mp3", PlayOptions::default());
    let stop = handle.stop_handle();
    let err = handle.outcome().await.unwrap_err();

    assert_eq!(
        err,
        PlaybackError::RequestFailed {
            filename: "click.mp3".to_string()
        }
    );
    assert_eq!(stop.state(), PlaybackState::Pending);
    assert!(player.graph().sources().is_empty());
}

#[tokio::test]
async fn test_replaying_cached_file_creates_fresh_nodes() {
    let http = Arc::new(http_expecting("https://cdn.test/sfx/click.mp3", b"click"));
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(http, store, cdn_options());

    for _ in 0..3 {
        let outcome = player
            .play("click.mp3", PlayOptions::default())
            .outcome()
            .await
            .unwrap();
        assert_eq!(outcome, PlaybackOutcome::Started);
    }

    assert_eq!(player.graph().sources().len(), 3);
    assert_eq!(player.graph().gains().len(), 3);
    assert_eq!(player.graph().decode_calls(), 1);
}

#[tokio::test]
async fn test_set_volume_assigns_directly_without_smoothing() {
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(Arc::new(http_never()), store, cdn_options());

    let gain = player.set_volume(0.4).unwrap();

    assert_eq!(gain.gain(), 0.4);
    assert!(gain.0.scheduled.lock().is_empty());
    assert!(gain.0.to_destination.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_set_volume_schedules_when_smoothing_is_supported() {
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player_on(
        Arc::new(http_never()),
        store,
        cdn_options(),
        FakeGraph::with_smoothing(3.5),
    );

    let gain = player.set_volume(0.3).unwrap();

    assert_eq!(*gain.0.scheduled.lock(), vec![(0.3, 3.5, 0.0)]);
    assert!(gain.0.to_destination.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_set_volume_returns_independent_nodes() {
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(Arc::new(http_never()), store, cdn_options());

    let quiet = player.set_volume(0.5).unwrap();
    let loud = player.set_volume(0.9).unwrap();
    assert_ne!(quiet.0.id, loud.0.id);

    quiet.set_gain(0.7);

    assert_eq!(quiet.gain(), 0.7);
    assert_eq!(loud.gain(), 0.9);
}

#[tokio::test]
async fn test_set_volume_applies_out_of_range_values_as_is() {
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(Arc::new(http_never()), store, cdn_options());

    let gain = player.set_volume(2.5).unwrap();

    assert_eq!(gain.gain(), 2.5);
}

#[tokio::test]
async fn test_start_failure_disconnects_source() {
    let http = Arc::new(http_expecting("https://cdn.test/sfx/click.mp3", b"click-bytes"));
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player_on(http, store, cdn_options(), FakeGraph::failing_start());

    let handle = player.play("click.mp3", PlayOptions::default());
    let err = handle.outcome().await.unwrap_err();

    assert!(matches!(err, PlaybackError::PlaybackFailed(_)));
    let sources = player.graph().sources();
    assert_eq!(sources.len(), 1);
    assert!(sources[0].started_at.lock().is_none());
    assert!(sources[0].is_disconnected());
    assert!(!sources[0].has_on_ended());
}

#[test]
fn test_play_without_runtime_reports_spawn_error() {
    let store = Arc::new(MemoryByteStore::new());
    let player = build_player(Arc::new(http_never()), store, cdn_options());

    let handle = player.play("click.mp3", PlayOptions::default());
    assert_eq!(handle.state(), PlaybackState::Pending);

    let err = futures::executor::block_on(handle.outcome()).unwrap_err();
    assert!(matches!(err, PlaybackError::Spawn(_)));
    assert!(player.graph().sources().is_empty());
}

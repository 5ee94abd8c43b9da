//! Integration tests for loading a trace and playing it back
//!
//! Drives a mounted viewer through auto-play and manual navigation, and checks
//! that malformed files never produce an interactive viewer.

use std::time::{Duration, Instant};

use serde_json::json;
use traceview::trace::{BasePath, TraceError, TraceStore};
use traceview::viewer::{PlayMode, PlaybackEvent, PlaybackSettings, Viewer, ViewerId, ViewerInstance};

use super::common::fixtures::{self, TraceDir};

const INTERVAL: Duration = Duration::from_secs(1);

fn settings() -> PlaybackSettings {
    PlaybackSettings { interval: INTERVAL }
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<PlaybackEvent>) -> Vec<PlaybackEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// A 5-step trace played once advances one step per tick and stops at the end
#[test]
fn test_five_step_trace_plays_to_end_without_wrapping() {
    let mut viewer = Viewer::new(ViewerId::new("demo"), fixtures::store(5), &settings());
    let mut events = viewer.subscribe();
    let start = Instant::now();

    viewer.toggle_play(start);
    assert_eq!(viewer.state().play_mode(), PlayMode::Playing);

    for tick in 1..=4u32 {
        assert!(viewer.poll_timer(start + INTERVAL * tick));
        assert_eq!(viewer.state().current_index(), tick as usize);
        assert_eq!(viewer.state().play_mode(), PlayMode::Playing);
    }

    assert!(viewer.poll_timer(start + INTERVAL * 5));
    assert_eq!(viewer.state().current_index(), 4);
    assert_eq!(viewer.state().play_mode(), PlayMode::Idle);
    assert!(viewer.controller().next_deadline().is_none());

    let events = drain(&mut events);
    let seqs: Vec<u64> = events.iter().map(PlaybackEvent::seq).collect();
    assert!(seqs.windows(2).all(|w| w[1] == w[0] + 1), "seqs: {seqs:?}");

    let steps: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::StepChanged { index, .. } => Some(*index),
            PlaybackEvent::ModeChanged { .. } => None,
        })
        .collect();
    assert_eq!(steps, vec![1, 2, 3, 4]);
    assert_eq!(events.last().map(PlaybackEvent::mode), Some(PlayMode::Idle));
}

/// Manual navigation during auto-play pauses it and cancels the timer
#[test]
fn test_manual_navigation_interrupts_playback() {
    let mut viewer = Viewer::new(ViewerId::new("demo"), fixtures::store(5), &settings());
    let start = Instant::now();

    viewer.play(start);
    viewer.poll_timer(start + INTERVAL);
    assert_eq!(viewer.state().current_index(), 1);

    viewer.previous();
    assert_eq!(viewer.state().current_index(), 0);
    assert_eq!(viewer.state().play_mode(), PlayMode::Paused);
    assert!(!viewer.poll_timer(start + INTERVAL * 10));
    assert_eq!(viewer.state().current_index(), 0);

    viewer.play(start);
    viewer.seek(3).unwrap();
    assert_eq!(viewer.state().play_mode(), PlayMode::Paused);
}

/// Replaying a finished trace starts over from the first step
#[test]
fn test_replay_after_end_rewinds() {
    let mut viewer = Viewer::new(ViewerId::new("demo"), fixtures::store(3), &settings());
    let start = Instant::now();

    viewer.last();
    viewer.toggle_play(start);
    assert_eq!(viewer.state().current_index(), 0);
    assert_eq!(viewer.state().play_mode(), PlayMode::Playing);
}

/// Files loaded in production carry the base path exactly once
#[test]
fn test_production_trace_paths_are_prefixed_once() {
    let dir = TraceDir::new();
    let trace = json!({
        "title": "Checkout flow",
        "steps": [
            { "index": 0, "action": "Open site", "screenshotPath": "screens/0.png",
              "videoPath": "/videos/0.mp4" },
            { "index": 1, "action": "Click buy", "screenshotPath": "/screens/1.png",
              "videoPath": "" },
        ]
    });
    let path = dir.write_trace("checkout.json", &trace);

    let store = TraceStore::load(&path, &BasePath::new("/cua_demo")).unwrap();
    assert_eq!(store.title(), Some("Checkout flow"));
    assert_eq!(store.steps()[0].screenshot_path, "/cua_demo/screens/0.png");
    assert_eq!(store.steps()[0].video_path.as_deref(), Some("/cua_demo/videos/0.mp4"));
    assert_eq!(store.steps()[1].screenshot_path, "/cua_demo/screens/1.png");
    assert_eq!(store.steps()[1].video_path, None);
}

/// Malformed traces are rejected at load and mount as unavailable
#[test]
fn test_malformed_traces_mount_unavailable() {
    let dir = TraceDir::new();
    let cases = [
        ("empty.json", json!([])),
        (
            "duplicate.json",
            json!([
                { "index": 0, "action": "a", "screenshotPath": "s/0.png" },
                { "index": 0, "action": "b", "screenshotPath": "s/1.png" },
            ]),
        ),
        (
            "gap.json",
            json!([
                { "index": 0, "action": "a", "screenshotPath": "s/0.png" },
                { "index": 2, "action": "b", "screenshotPath": "s/2.png" },
            ]),
        ),
        (
            "no_screenshot.json",
            json!([{ "index": 0, "action": "a" }]),
        ),
    ];

    for (name, trace) in cases {
        let path = dir.write_trace(name, &trace);
        let result = TraceStore::load(&path, &BasePath::none()).map(std::sync::Arc::new);
        assert!(result.is_err(), "{name} should be rejected");

        let instance = ViewerInstance::mount(ViewerId::new(name), None, result, &settings());
        assert!(!instance.is_available());
        assert!(instance.viewer().is_none());
    }

    let err = TraceStore::load(&dir.path.join("missing.json"), &BasePath::none()).unwrap_err();
    assert!(matches!(err, TraceError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

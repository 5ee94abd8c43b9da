//! Integration tests for media loading through the dispatcher
//!
//! Uses real files under a temporary asset root as well as the mock loader
//! for timing-sensitive preemption.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use traceview::media::{
    FsMediaLoader, LoadOutcome, MediaDispatcher, MediaLoader, MockMediaLoader, ScreenshotInfo,
    SurfaceState, VideoContainer, VideoPlayback,
};
use traceview::trace::BasePath;
use traceview::viewer::{PlaybackSettings, Viewer, ViewerId};

use super::common::fixtures::{self, TraceDir};

const WAIT: Duration = Duration::from_secs(2);

async fn settle(
    viewer: &mut Viewer,
    rx: &mut mpsc::UnboundedReceiver<LoadOutcome>,
    expected: usize,
) {
    for _ in 0..expected {
        let outcome = tokio::time::timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for media")
            .expect("dispatcher dropped");
        viewer.complete_load(outcome);
    }
}

fn viewer(store_len: usize, base: &BasePath) -> Viewer {
    Viewer::new(
        ViewerId::new("viewer1"),
        fixtures::store_with_base(store_len, base),
        &PlaybackSettings::default(),
    )
}

/// Production URLs map back onto the export directory and load for real
#[tokio::test]
async fn test_filesystem_assets_load_under_base_path() {
    let dir = TraceDir::new();
    dir.write_assets(3);
    let base = BasePath::new("/cua_demo");

    let loader: Arc<dyn MediaLoader> = Arc::new(FsMediaLoader::new(dir.asset_root(), base.clone()));
    let (mut dispatcher, mut rx) = MediaDispatcher::new(loader);
    let mut viewer = viewer(3, &base);

    let requests = viewer.pump();
    assert_eq!(requests.len(), 2);
    dispatcher.dispatch(requests);
    settle(&mut viewer, &mut rx, 2).await;

    let media = viewer.media();
    assert_eq!(
        media.screenshot().state,
        SurfaceState::Ready(ScreenshotInfo {
            width: 320,
            height: 200
        })
    );
    match &media.video().state {
        SurfaceState::Ready(info) => assert_eq!(info.container, VideoContainer::Mp4),
        other => panic!("video not ready: {other:?}"),
    }
    // Idle: loaded but held at the first frame
    assert_eq!(media.video().playback, VideoPlayback::Paused);
    assert!(viewer.state().media_ready());
}

/// A missing clip degrades only the video surface of that step
#[tokio::test]
async fn test_missing_clip_degrades_only_video() {
    let dir = TraceDir::new();
    dir.write_png("screens/0.png", 64, 48);
    dir.write_png("screens/1.png", 64, 48);

    let loader: Arc<dyn MediaLoader> =
        Arc::new(FsMediaLoader::new(dir.asset_root(), BasePath::none()));
    let (mut dispatcher, mut rx) = MediaDispatcher::new(loader);
    let mut viewer = viewer(2, &BasePath::none());

    dispatcher.dispatch(viewer.pump());
    settle(&mut viewer, &mut rx, 2).await;

    assert!(viewer.media().screenshot().state.is_ready());
    assert!(viewer.media().video().state.is_failed());
    assert_eq!(viewer.media().video().playback, VideoPlayback::Stopped);
    assert!(!viewer.state().media_ready());

    // Navigation keeps working; step 1 has no clip at all
    assert!(viewer.next());
    dispatcher.dispatch(viewer.pump());
    settle(&mut viewer, &mut rx, 1).await;

    assert_eq!(viewer.media().video().state, SurfaceState::Hidden);
    assert!(viewer.state().media_ready());
}

/// A later seek abandons the earlier step's slow load
#[tokio::test]
async fn test_later_seek_preempts_slow_load() {
    let loader = Arc::new(
        MockMediaLoader::new().with_delay("/screens/1.png", Duration::from_millis(300)),
    );
    let (mut dispatcher, mut rx) = MediaDispatcher::new(loader);
    let mut viewer = viewer(4, &BasePath::none());
    let _ = viewer.pump();

    viewer.seek(1).unwrap();
    dispatcher.dispatch(viewer.pump());
    assert_eq!(dispatcher.in_flight(&ViewerId::new("viewer1")), 1);

    viewer.seek(2).unwrap();
    dispatcher.dispatch(viewer.pump());
    settle(&mut viewer, &mut rx, 2).await;

    // The slow step-1 load was aborted and never reports back
    let late = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
    assert!(late.is_err(), "unexpected outcome: {late:?}");

    assert_eq!(
        viewer.media().screenshot().source.as_deref(),
        Some("/screens/2.png")
    );
    assert!(viewer.state().media_ready());
}

/// A clip that finishes loading while playing starts playing
#[tokio::test]
async fn test_clip_plays_when_loaded_during_auto_play() {
    let loader: Arc<dyn MediaLoader> = Arc::new(MockMediaLoader::new());
    let (mut dispatcher, mut rx) = MediaDispatcher::new(loader);
    let mut viewer = viewer(3, &BasePath::none());

    viewer.play(Instant::now());
    dispatcher.dispatch(viewer.pump());
    settle(&mut viewer, &mut rx, 2).await;
    assert_eq!(viewer.media().video().playback, VideoPlayback::Playing);

    viewer.pause();
    let _ = viewer.pump();
    assert_eq!(viewer.media().video().playback, VideoPlayback::Paused);
}

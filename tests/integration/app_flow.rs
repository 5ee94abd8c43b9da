//! Integration tests for the terminal app
//!
//! Feeds key events into [`App`] and inspects the rendered frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use traceview::config::Config;
use traceview::media::MockMediaLoader;
use traceview::trace::TraceError;
use traceview::ui::{AppEvent, InputMode};
use traceview::viewer::{PlaybackSettings, ViewerId, ViewerInstance, ViewerRegistry};
use traceview::App;

use super::common::fixtures;
use super::common::terminal::{line_containing, render_app};

fn app(traces: Vec<Result<Arc<traceview::TraceStore>, TraceError>>) -> App {
    let config = Config::default();
    let settings = PlaybackSettings {
        interval: Duration::from_millis(250),
    };
    let mut registry = ViewerRegistry::new(config.max_viewers);
    for (i, trace) in traces.into_iter().enumerate() {
        registry
            .mount(ViewerInstance::mount(ViewerId::nth(i + 1), None, trace, &settings))
            .unwrap();
    }
    App::new(config, registry, Arc::new(MockMediaLoader::new()))
}

fn press(app: &mut App, code: KeyCode) {
    let event = AppEvent::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    app.handle_app_event(event, Instant::now());
}

fn type_seek(app: &mut App, digits: &str) {
    press(app, KeyCode::Char(':'));
    for c in digits.chars() {
        press(app, KeyCode::Char(c));
    }
    press(app, KeyCode::Enter);
}

/// Navigation keys move the cursor and the frame follows
#[test]
fn test_navigation_updates_frame() {
    let mut app = app(vec![Ok(fixtures::store(5))]);

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Step 1/5"));
    assert!(line_containing(&screen, "Step 0 action").is_some());

    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Right);
    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Step 3/5"));
    assert!(screen.contains("[1] viewer1 3/5"));

    press(&mut app, KeyCode::End);
    assert!(render_app(&app, 120, 30).contains("Step 5/5"));
    press(&mut app, KeyCode::Home);
    assert!(render_app(&app, 120, 30).contains("Step 1/5"));
}

/// The seek prompt echoes input and jumps on Enter
#[test]
fn test_seek_prompt_round_trip() {
    let mut app = app(vec![Ok(fixtures::store(12))]);

    press(&mut app, KeyCode::Char(':'));
    press(&mut app, KeyCode::Char('1'));
    press(&mut app, KeyCode::Char('1'));
    assert_eq!(app.input_mode(), InputMode::SeekPrompt);
    assert_eq!(app.seek_input(), "11");
    let screen = render_app(&app, 120, 30);
    assert!(line_containing(&screen, ":11").is_some());

    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode(), InputMode::Normal);
    assert!(render_app(&app, 120, 30).contains("Step 1/12"));

    type_seek(&mut app, "7");
    assert!(render_app(&app, 120, 30).contains("Step 7/12"));

    press(&mut app, KeyCode::Char(':'));
    press(&mut app, KeyCode::Char('3'));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.input_mode(), InputMode::Normal);
    assert!(render_app(&app, 120, 30).contains("Step 7/12"));
}

/// Out-of-range seeks show an error and leave the cursor alone
#[test]
fn test_out_of_range_seek_shows_error() {
    let mut app = app(vec![Ok(fixtures::store(4))]);
    press(&mut app, KeyCode::Right);

    type_seek(&mut app, "40");
    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Step 40 is out of range (1-4)"));
    assert!(screen.contains("Step 2/4"));

    // The next action clears the message
    press(&mut app, KeyCode::Right);
    assert!(app.status().is_none());
}

/// Broken traces render a placeholder and ignore navigation
#[test]
fn test_unavailable_tab_renders_reason() {
    let mut app = app(vec![
        Ok(fixtures::store(2)),
        Err(TraceError::DuplicateIndex {
            index: 0,
            position: 1,
        }),
    ]);

    press(&mut app, KeyCode::Tab);
    assert_eq!(app.registry().active_index(), 1);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Char(':'));
    assert_eq!(app.input_mode(), InputMode::Normal);

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Trace unavailable"));
    assert!(screen.contains("Duplicate step index 0 at position 1"));
    assert!(screen.contains("viewer2 (unavailable)"));
}

/// Each tab keeps its own position while switching
#[test]
fn test_tabs_keep_independent_positions() {
    let store = fixtures::store(6);
    let mut app = app(vec![Ok(Arc::clone(&store)), Ok(store)]);

    type_seek(&mut app, "5");
    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Right);

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("[1] viewer1 5/6"));
    assert!(screen.contains("[2] viewer2 2/6"));

    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.registry().len(), 1);
    assert!(!app.should_quit());
    press(&mut app, KeyCode::Char('x'));
    assert!(app.should_quit());
}

/// Auto-play keeps running on a tab that is not shown
#[test]
fn test_background_tab_keeps_playing() {
    let mut app = app(vec![Ok(fixtures::store(4)), Ok(fixtures::store(4))]);
    let start = Instant::now();

    app.handle_key_event(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE), start);
    press(&mut app, KeyCode::Tab);

    let deadline = app.next_deadline().expect("first tab is playing");
    app.handle_app_event(AppEvent::Tick, deadline);

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("[1] viewer1 2/4"));
    assert!(screen.contains("[2] viewer2 1/4"));
}

/// Media loads started by the app land on the right viewer
#[tokio::test]
async fn test_media_outcomes_reach_viewers() {
    let mut app = app(vec![Ok(fixtures::store(3)), Ok(fixtures::store(3))]);
    app.sync_media();

    // Step 0 of each viewer has a screenshot and a clip
    for _ in 0..4 {
        let outcome = tokio::time::timeout(Duration::from_secs(2), app.next_media_outcome())
            .await
            .expect("timed out waiting for media")
            .expect("dispatcher dropped");
        app.handle_app_event(AppEvent::MediaLoaded(outcome), Instant::now());
    }

    for instance in app.registry().iter() {
        let viewer = instance.viewer().unwrap();
        assert!(viewer.state().media_ready(), "{} not ready", instance.id());
    }
    assert!(render_app(&app, 120, 30).contains("media ready"));
}

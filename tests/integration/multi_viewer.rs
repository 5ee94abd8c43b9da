//! Integration tests for several viewers open at once

use std::sync::Arc;
use std::time::Instant;

use traceview::trace::TraceError;
use traceview::viewer::{
    PlayMode, PlaybackSettings, RegistryError, ViewerId, ViewerInstance, ViewerRegistry,
};

use super::common::fixtures;

fn mount(id: &str, trace: Result<Arc<traceview::TraceStore>, TraceError>) -> ViewerInstance {
    ViewerInstance::mount(ViewerId::new(id), None, trace, &PlaybackSettings::default())
}

/// Two viewers over the same trace keep separate cursors
#[test]
fn test_shared_trace_independent_cursors() {
    let store = fixtures::store(6);
    let mut registry = ViewerRegistry::new(4);
    registry.mount(mount("viewer1", Ok(Arc::clone(&store)))).unwrap();
    registry.mount(mount("viewer2", Ok(Arc::clone(&store)))).unwrap();
    assert_eq!(Arc::strong_count(&store), 3);

    let now = Instant::now();
    {
        let first = registry
            .get_mut(&ViewerId::new("viewer1"))
            .and_then(|i| i.viewer_mut())
            .unwrap();
        first.seek(4).unwrap();
        first.play(now);
    }
    {
        let second = registry
            .get_mut(&ViewerId::new("viewer2"))
            .and_then(|i| i.viewer_mut())
            .unwrap();
        second.seek(1).unwrap();
    }

    let first = registry.get(&ViewerId::new("viewer1")).and_then(|i| i.viewer()).unwrap();
    let second = registry.get(&ViewerId::new("viewer2")).and_then(|i| i.viewer()).unwrap();
    assert_eq!(first.state().current_index(), 4);
    assert_eq!(first.state().play_mode(), PlayMode::Playing);
    assert_eq!(second.state().current_index(), 1);
    assert_eq!(second.state().play_mode(), PlayMode::Paused);

    assert_eq!(
        registry.tab_names(),
        vec!["viewer1 5/6".to_string(), "viewer2 2/6".to_string()]
    );
}

/// A broken trace in one viewer leaves its neighbours usable
#[test]
fn test_unavailable_viewer_is_isolated() {
    let mut registry = ViewerRegistry::new(4);
    registry.mount(mount("good", Ok(fixtures::store(3)))).unwrap();
    registry.mount(mount("bad", Err(TraceError::Empty))).unwrap();

    registry.switch_to(1);
    assert!(registry.active().and_then(|i| i.viewer()).is_none());
    assert!(matches!(
        registry.active().and_then(|i| i.unavailable_reason()),
        Some(TraceError::Empty)
    ));

    registry.next_viewer();
    let good = registry.active_mut().and_then(|i| i.viewer_mut()).unwrap();
    assert!(good.next());
    assert_eq!(good.state().current_index(), 1);
}

/// Ids are unique and the registry enforces its capacity
#[test]
fn test_registry_rejects_duplicates_and_overflow() {
    let mut registry = ViewerRegistry::new(2);
    registry.mount(mount("a", Ok(fixtures::store(1)))).unwrap();

    assert!(matches!(
        registry.mount(mount("a", Ok(fixtures::store(1)))),
        Err(RegistryError::DuplicateId(_))
    ));

    registry.mount(mount("b", Ok(fixtures::store(1)))).unwrap();
    assert!(matches!(
        registry.mount(mount("c", Ok(fixtures::store(1)))),
        Err(RegistryError::Full { max: 2 })
    ));

    assert!(registry.unmount(&ViewerId::new("a")).is_some());
    assert!(registry.can_mount());
    assert_eq!(registry.active().map(|i| i.id().as_str()), Some("b"));
}

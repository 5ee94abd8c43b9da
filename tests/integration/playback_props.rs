//! Property tests for the playback controller
//!
//! Arbitrary sequences of navigation, seeks and timer ticks never move the
//! cursor out of range, and rejected seeks never change anything.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use traceview::viewer::{PlayMode, PlaybackController, PlaybackError, PlaybackEvent, ViewerId};

const INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    Seek(usize),
    TogglePlay,
    First,
    Last,
    /// Advance the clock by this many intervals and poll
    Wait(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Next),
        Just(Op::Previous),
        (0usize..40).prop_map(Op::Seek),
        Just(Op::TogglePlay),
        Just(Op::First),
        Just(Op::Last),
        (0u32..3).prop_map(Op::Wait),
    ]
}

fn apply(controller: &mut PlaybackController, op: &Op, now: &mut Instant) {
    match op {
        Op::Next => {
            controller.next();
        }
        Op::Previous => {
            controller.previous();
        }
        Op::Seek(index) => {
            let _ = controller.seek(*index);
        }
        Op::TogglePlay => controller.toggle_play(*now),
        Op::First => controller.first(),
        Op::Last => controller.last(),
        Op::Wait(intervals) => {
            *now += INTERVAL * *intervals;
            controller.poll_timer(*now);
        }
    }
}

proptest! {
    #[test]
    fn cursor_stays_in_range(len in 1usize..20, ops in prop::collection::vec(op(), 0..60)) {
        let mut controller = PlaybackController::new(ViewerId::new("prop"), len, INTERVAL);
        let mut now = Instant::now();

        for op in &ops {
            apply(&mut controller, op, &mut now);
            prop_assert!(controller.current_index() < len);
            if controller.play_mode() != PlayMode::Playing {
                prop_assert!(controller.next_deadline().is_none());
            }
        }
    }

    #[test]
    fn out_of_range_seek_changes_nothing(
        len in 1usize..20,
        ops in prop::collection::vec(op(), 0..30),
        overshoot in 0usize..100,
    ) {
        let mut controller = PlaybackController::new(ViewerId::new("prop"), len, INTERVAL);
        let mut now = Instant::now();
        for op in &ops {
            apply(&mut controller, op, &mut now);
        }

        let mut events = controller.subscribe();
        let before = controller.state().clone();
        let deadline = controller.next_deadline();

        let index = len + overshoot;
        prop_assert_eq!(
            controller.seek(index),
            Err(PlaybackError::OutOfRange { index, len })
        );
        prop_assert_eq!(controller.state(), &before);
        prop_assert_eq!(controller.next_deadline(), deadline);
        prop_assert!(events.try_recv().is_err());
    }

    #[test]
    fn valid_seek_always_pauses(len in 1usize..20, start_playing: bool, target in 0usize..20) {
        let target = target % len;
        let mut controller = PlaybackController::new(ViewerId::new("prop"), len, INTERVAL);
        if start_playing {
            controller.play(Instant::now());
        }

        prop_assert!(controller.seek(target).is_ok());
        prop_assert_eq!(controller.current_index(), target);
        prop_assert_eq!(controller.play_mode(), PlayMode::Paused);
    }

    #[test]
    fn notifications_are_sequential(len in 1usize..10, ops in prop::collection::vec(op(), 0..40)) {
        let mut controller = PlaybackController::new(ViewerId::new("prop"), len, INTERVAL);
        let mut events = controller.subscribe();
        let mut now = Instant::now();
        for op in &ops {
            apply(&mut controller, op, &mut now);
        }

        let mut last_seq = 0;
        let mut index = 0;
        while let Ok(event) = events.try_recv() {
            prop_assert_eq!(event.seq(), last_seq + 1);
            last_seq = event.seq();
            if let PlaybackEvent::StepChanged { index: to, previous, .. } = event {
                prop_assert_eq!(previous, Some(index));
                index = to;
            }
        }
        prop_assert_eq!(index, controller.current_index());
    }
}

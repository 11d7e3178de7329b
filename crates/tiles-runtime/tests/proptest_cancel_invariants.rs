//! Property-based tests for playback interruption.
//!
//! 1. Cancelling playback lands the same board, score and terminal flags as
//!    letting it run out.
//! 2. Interrupting playback with the next move is equivalent to waiting for
//!    it to settle first.
//! 3. After any settled step, every cell's committed value equals its
//!    pending value.

use std::sync::Arc;

use proptest::prelude::*;
use tiles_runtime::{Command, CommandOutcome, ManualClock, Session, SessionConfig};

fn config(seed: u64) -> SessionConfig {
    SessionConfig::default()
        .with_unit_ticks(3)
        .with_spawn_ticks(2)
        .with_overlay_ticks(4)
        .with_terminal_ticks(3, 3)
        .with_seed(seed)
}

fn session(config: SessionConfig) -> Session {
    Session::builder(config)
        .clock(Arc::new(ManualClock::new()))
        .build()
        .expect("valid config")
}

fn drain(session: &Session) {
    for _ in 0..10_000 {
        if !session.is_animating() {
            return;
        }
        session.tick();
    }
    panic!("playback never settled");
}

fn commands() -> impl Strategy<Value = Vec<Command>> {
    prop::collection::vec(
        prop::sample::select(vec![Command::Up, Command::Down, Command::Left, Command::Right]),
        1..60,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cancel_matches_full_playback(seed in any::<u64>(), script in commands()) {
        let played = session(config(seed));
        let cancelled = session(config(seed));
        drain(&played);
        cancelled.handle(Command::Cancel);

        for command in script {
            let a = played.handle(command);
            drain(&played);
            let b = cancelled.handle(command);
            if matches!(b, CommandOutcome::Moved { .. }) {
                cancelled.handle(Command::Cancel);
            }
            prop_assert_eq!(a, b);
            prop_assert_eq!(played.board(), cancelled.board());
        }
        prop_assert_eq!(played.score(), cancelled.score());
        prop_assert_eq!(played.moves(), cancelled.moves());
        prop_assert_eq!(played.is_over(), cancelled.is_over());
    }

    #[test]
    fn interrupting_matches_waiting(seed in any::<u64>(), script in commands()) {
        let waited = session(config(seed));
        let interrupted = session(config(seed));

        for command in script {
            drain(&waited);
            let a = waited.handle(command);
            let b = interrupted.handle(command);
            prop_assert_eq!(a, b);
        }
        drain(&waited);
        drain(&interrupted);
        prop_assert_eq!(waited.board(), interrupted.board());
        prop_assert_eq!(waited.score(), interrupted.score());
        prop_assert_eq!(waited.is_over(), interrupted.is_over());
    }

    #[test]
    fn settled_board_has_no_pending_values(seed in any::<u64>(), script in commands()) {
        let s = session(config(seed));
        for command in script {
            s.handle(command);
            drain(&s);
            let snap = s.snapshot();
            prop_assert_eq!(snap.committed, snap.pending);
            prop_assert!(snap.best >= snap.score);
        }
    }
}

#![forbid(unsafe_code)]

//! Animation scheduler: the live effect set plus the session timer.
//!
//! The scheduler is not internally synchronized. The owning
//! [`Session`](crate::Session) holds it behind the same mutex as the board,
//! which gives the single critical section that enqueue, advance and
//! force-termination all run under.
//!
//! # Invariants
//!
//! 1. Every effect's termination action runs exactly once, or never if the
//!    set is wiped with [`clear`](AnimationScheduler::clear).
//! 2. [`advance`](AnimationScheduler::advance) iterates a snapshot; effects
//!    enqueued while it runs start ticking on the following step.
//! 3. `has_settled()` is latched for one step: it reports whether that step
//!    (an advance or a force-termination) drained the last blocking effect.
//! 4. Force-termination runs blocking effects in ascending total length and
//!    never cuts the game-over overlay short.

use std::mem;

use tiles_core::Board;

use crate::animation::{Animation, Timeline};
use crate::effect::{Effect, EffectId, EffectInfo, EffectKind};
use crate::timer::SessionTimer;

/// Outcome of one scheduler step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Effects whose termination ran during the step.
    pub terminated: usize,
    /// The step moved the set from blocking to non-blocking.
    pub settled: bool,
}

/// Live effects, ordered by enqueue time.
#[derive(Debug)]
pub struct AnimationScheduler {
    live: Vec<Effect>,
    next_id: u64,
    settled: bool,
    timer: SessionTimer,
}

impl AnimationScheduler {
    #[must_use]
    pub fn new(timer: SessionTimer) -> Self {
        Self {
            live: Vec::new(),
            next_id: 0,
            settled: false,
            timer,
        }
    }

    /// Add an effect. Runs no board action.
    pub fn enqueue(&mut self, kind: EffectKind, timeline: Timeline) -> EffectId {
        self.next_id += 1;
        let id = EffectId(self.next_id);
        tracing::debug!(
            %id,
            kind = kind.name(),
            delay = timeline.delay(),
            duration = timeline.duration(),
            "effect enqueued"
        );
        self.live.push(Effect::new(id, kind, timeline));
        id
    }

    /// One clock tick: age every live effect and terminate the finished ones.
    pub fn advance(&mut self, board: &mut Board) -> StepReport {
        let was_blocking = self.is_blocking();
        let snapshot = mem::take(&mut self.live);
        let mut survivors = Vec::with_capacity(snapshot.len());
        let mut terminated = 0;

        for mut effect in snapshot {
            effect.tick(1);
            if effect.is_complete() {
                effect.terminate(board);
                terminated += 1;
            } else {
                survivors.push(effect);
            }
        }

        // Anything enqueued during the loop goes after the survivors.
        survivors.append(&mut self.live);
        self.live = survivors;

        self.settled = was_blocking && !self.is_blocking();
        if self.settled {
            tracing::debug!(terminated, "playback settled");
        }
        StepReport {
            terminated,
            settled: self.settled,
        }
    }

    /// Terminate every blocking effect now, shortest first.
    ///
    /// The game-over overlay is left to play out. Non-blocking overlays keep
    /// running. Returns how many effects were terminated.
    pub fn force_terminate_blocking(&mut self, board: &mut Board) -> usize {
        let was_blocking = self.is_blocking();
        let (mut doomed, kept): (Vec<Effect>, Vec<Effect>) =
            mem::take(&mut self.live).into_iter().partition(|e| {
                e.is_blocking() && !matches!(e.kind(), EffectKind::GameOver)
            });
        self.live = kept;

        // Stable: equal lengths keep enqueue order.
        doomed.sort_by_key(|e| e.timeline().total());
        let count = doomed.len();
        for mut effect in doomed {
            effect.finish();
            effect.terminate(board);
        }

        self.settled = was_blocking && !self.is_blocking();
        tracing::debug!(count, settled = self.settled, "blocking effects force-terminated");
        count
    }

    /// Drop every effect without running terminations.
    pub fn clear(&mut self) {
        let dropped = self.live.len();
        self.live.clear();
        self.settled = false;
        tracing::debug!(dropped, "effects cleared");
    }

    /// Whether any live effect blocks input.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.live.iter().any(Effect::is_blocking)
    }

    /// Whether the most recent step drained the last blocking effect.
    #[must_use]
    pub fn has_settled(&self) -> bool {
        self.settled
    }

    /// Whether an effect of the given kind is live.
    #[must_use]
    pub fn contains(&self, matcher: impl Fn(&EffectKind) -> bool) -> bool {
        self.live.iter().any(|e| matcher(e.kind()))
    }

    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.live.iter()
    }

    #[must_use]
    pub fn infos(&self) -> Vec<EffectInfo> {
        self.live.iter().map(Effect::info).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    #[must_use]
    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut SessionTimer {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tiles_core::{CellValue, Position};

    use super::*;
    use crate::timer::ManualClock;

    fn scheduler() -> AnimationScheduler {
        AnimationScheduler::new(SessionTimer::new(Arc::new(ManualClock::new())))
    }

    fn slide(from: (u8, u8), to: (u8, u8), value: CellValue) -> EffectKind {
        EffectKind::Slide {
            from: from.into(),
            to: to.into(),
            value,
        }
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut s = scheduler();
        let a = s.enqueue(EffectKind::ErrorFlash, Timeline::new(3));
        let b = s.enqueue(EffectKind::ErrorFlash, Timeline::new(3));
        assert!(b > a);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn advance_terminates_on_the_last_tick() {
        let mut s = scheduler();
        let mut board = Board::new();
        board.set_pending((2, 0), CellValue::V4);
        s.enqueue(slide((3, 0), (2, 0), CellValue::V4), Timeline::new(3));

        assert_eq!(s.advance(&mut board).terminated, 0);
        assert_eq!(s.advance(&mut board).terminated, 0);
        assert_eq!(board.get((2, 0)), CellValue::Empty);

        let report = s.advance(&mut board);
        assert_eq!(report.terminated, 1);
        assert!(report.settled);
        assert_eq!(board.get((2, 0)), CellValue::V4);
        assert!(s.is_empty());
    }

    #[test]
    fn settle_is_latched_for_one_step() {
        let mut s = scheduler();
        let mut board = Board::new();
        s.enqueue(EffectKind::GameWon, Timeline::new(1));
        assert!(s.advance(&mut board).settled);
        assert!(s.has_settled());
        assert!(!s.advance(&mut board).settled);
        assert!(!s.has_settled());
    }

    #[test]
    fn overlays_never_settle() {
        let mut s = scheduler();
        let mut board = Board::new();
        s.enqueue(EffectKind::Score { delta: 4 }, Timeline::new(2));
        assert!(!s.is_blocking());
        assert!(!s.advance(&mut board).settled);
        let report = s.advance(&mut board);
        assert_eq!(report.terminated, 1);
        assert!(!report.settled);
    }

    #[test]
    fn settles_only_when_last_blocker_finishes() {
        let mut s = scheduler();
        let mut board = Board::new();
        s.enqueue(EffectKind::GameWon, Timeline::new(1));
        s.enqueue(EffectKind::GameWon, Timeline::new(2));
        assert!(!s.advance(&mut board).settled);
        assert!(s.advance(&mut board).settled);
    }

    #[test]
    fn delayed_effect_blocks_through_its_delay() {
        let mut s = scheduler();
        let mut board = Board::new();
        board.set_pending((0, 0), CellValue::V2);
        s.enqueue(
            EffectKind::Spawn {
                at: Position::new(0, 0),
                value: CellValue::V2,
            },
            Timeline::new(2).delayed(3),
        );
        for _ in 0..4 {
            assert!(!s.advance(&mut board).settled);
            assert!(s.is_blocking());
        }
        assert!(s.advance(&mut board).settled);
        assert_eq!(board.get((0, 0)), CellValue::V2);
    }

    #[test]
    fn force_terminate_commits_everything_and_settles() {
        let mut s = scheduler();
        let mut board = Board::new();
        board.set_pending((0, 0), CellValue::V4);
        board.set_pending((1, 0), CellValue::V4);
        s.enqueue(
            EffectKind::Merge {
                from: (1, 0).into(),
                to: (0, 0).into(),
                result: CellValue::V4,
            },
            Timeline::new(10),
        );
        s.enqueue(slide((2, 0), (1, 0), CellValue::V4), Timeline::new(5));
        s.enqueue(EffectKind::Score { delta: 4 }, Timeline::new(30));

        assert_eq!(s.force_terminate_blocking(&mut board), 2);
        assert!(s.has_settled());
        assert!(board.is_settled());
        assert_eq!(s.len(), 1);
        assert!(!s.is_blocking());
        assert!(s.effects().all(|e| !e.is_blocking()));
    }

    #[test]
    fn force_terminate_spares_game_over() {
        let mut s = scheduler();
        let mut board = Board::new();
        s.enqueue(EffectKind::GameOver, Timeline::new(8));
        assert_eq!(s.force_terminate_blocking(&mut board), 0);
        assert!(s.is_blocking());
        assert!(!s.has_settled());
        assert!(s.contains(|k| matches!(k, EffectKind::GameOver)));
    }

    #[test]
    fn clear_skips_terminations() {
        let mut s = scheduler();
        let mut board = Board::new();
        board.set_pending((3, 3), CellValue::V8);
        s.enqueue(slide((0, 3), (3, 3), CellValue::V8), Timeline::new(2));
        s.clear();
        assert!(s.is_empty());
        assert!(!s.has_settled());
        assert_eq!(board.get((3, 3)), CellValue::Empty);
    }
}

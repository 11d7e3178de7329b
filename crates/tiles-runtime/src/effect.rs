#![forbid(unsafe_code)]

//! The closed set of visual effects a session schedules.
//!
//! An [`Effect`] pairs an [`EffectKind`] with a [`Timeline`]. The scheduler
//! drives effects only through the [`Animation`] trait plus
//! [`Effect::terminate`], which consumes the effect so its board action can
//! run at most once.
//!
//! # Invariants
//!
//! 1. Score pop-ups and error flashes never block input; every other kind
//!    does.
//! 2. Only tile effects (slide, merge, spawn) touch the board, and only by
//!    committing their destination cell.

use std::fmt;

use tiles_core::{Board, CellValue, Position};

use crate::animation::{Animation, EasingFn, Timeline, ease_in_out, ease_out, linear, pop};

/// Identifier assigned by the scheduler, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an effect shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// A tile travels from `from` to `to`.
    Slide {
        from: Position,
        to: Position,
        value: CellValue,
    },
    /// A tile travels into `to` for the first half, then `to` pops at
    /// `result` for the second half.
    Merge {
        from: Position,
        to: Position,
        result: CellValue,
    },
    /// A new tile grows in at `at`.
    Spawn { at: Position, value: CellValue },
    /// Floating "+delta" next to the score.
    Score { delta: u32 },
    /// Brief error indicator requested by the host.
    ErrorFlash,
    /// "Game over" overlay fading in.
    GameOver,
    /// "You win" overlay fading in.
    GameWon,
}

impl EffectKind {
    /// Whether a live effect of this kind holds back player moves.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        !matches!(self, EffectKind::Score { .. } | EffectKind::ErrorFlash)
    }

    /// Short stable name for logs and snapshots.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            EffectKind::Slide { .. } => "slide",
            EffectKind::Merge { .. } => "merge",
            EffectKind::Spawn { .. } => "spawn",
            EffectKind::Score { .. } => "score",
            EffectKind::ErrorFlash => "error",
            EffectKind::GameOver => "game-over",
            EffectKind::GameWon => "game-won",
        }
    }

    fn easing(&self) -> EasingFn {
        match self {
            EffectKind::Slide { .. } | EffectKind::Spawn { .. } => ease_out,
            EffectKind::Merge { .. } => pop,
            EffectKind::Score { .. } | EffectKind::ErrorFlash => linear,
            EffectKind::GameOver | EffectKind::GameWon => ease_in_out,
        }
    }
}

/// Read-only view of a live effect for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectInfo {
    pub id: EffectId,
    pub kind: EffectKind,
    pub blocking: bool,
    /// Linear progress in [0, 1].
    pub progress: f32,
    /// Progress through this kind's easing curve.
    pub eased: f32,
}

/// A scheduled effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    id: EffectId,
    kind: EffectKind,
    timeline: Timeline,
}

impl Effect {
    pub(crate) fn new(id: EffectId, kind: EffectKind, timeline: Timeline) -> Self {
        Self { id, kind, timeline }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> EffectId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }

    /// Progress shaped by this kind's easing curve.
    ///
    /// For a merge the first half is the incoming slide (eased out), the
    /// second half the pop scale of the fused tile.
    #[must_use]
    pub fn eased(&self) -> f32 {
        let t = self.timeline.progress();
        match self.kind {
            EffectKind::Merge { .. } => {
                if t < 0.5 {
                    ease_out(t * 2.0)
                } else {
                    pop((t - 0.5) * 2.0)
                }
            }
            _ => (self.kind.easing())(t),
        }
    }

    #[must_use]
    pub fn info(&self) -> EffectInfo {
        EffectInfo {
            id: self.id,
            kind: self.kind,
            blocking: self.is_blocking(),
            progress: self.timeline.progress(),
            eased: self.eased(),
        }
    }

    /// Run the effect's board action and drop it.
    pub fn terminate(self, board: &mut Board) {
        match self.kind {
            EffectKind::Slide { to, .. } | EffectKind::Merge { to, .. } => board.commit(to),
            EffectKind::Spawn { at, .. } => board.commit(at),
            EffectKind::Score { .. }
            | EffectKind::ErrorFlash
            | EffectKind::GameOver
            | EffectKind::GameWon => {}
        }
        tracing::trace!(id = %self.id, kind = self.kind.name(), "effect terminated");
    }
}

impl Animation for Effect {
    fn tick(&mut self, ticks: u32) {
        self.timeline.tick(ticks);
    }

    fn is_complete(&self) -> bool {
        self.timeline.is_complete()
    }

    fn progress(&self) -> f32 {
        self.timeline.progress()
    }

    fn finish(&mut self) {
        self.timeline.finish();
    }
}

#![forbid(unsafe_code)]

//! The game session: board, scheduler, score and terminal state behind one
//! lock.
//!
//! Two threads drive a session. The host's input thread calls
//! [`Session::handle`]; its clock thread calls [`Session::tick`] at the
//! configured interval. Both take the same mutex, so a command never
//! observes a half-advanced scheduler and a tick never races a move.
//!
//! # State machine
//!
//! ```text
//!            move accepted            settled, not blocked
//!   Idle ─────────────────▶ AwaitingPlayback ───────────────▶ Idle / Won
//!    ▲                            │ settled, blocked
//!    │ reset                      ▼
//!    └───────────────────────── Blocked
//! ```
//!
//! Directional input during playback interrupts it when
//! [`SessionConfig::interrupt_playback`] is set and is ignored otherwise.
//! Directional input is always ignored once the game is over and while the
//! win overlay is still animating in.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tiles_core::{Board, CellValue, Direction, SIZE, SpawnSelector, Transition, resolve};

use crate::animation::Timeline;
use crate::config::{ConfigError, SessionConfig};
use crate::effect::{EffectInfo, EffectKind};
use crate::scheduler::AnimationScheduler;
use crate::timer::{MonotonicClock, SessionTimer, SystemClock};

/// Player or host command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    /// Finish blocking playback now.
    Cancel,
    /// Start a new game.
    Reset,
}

impl Command {
    /// The slide direction, for directional commands.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Command::Up => Some(Direction::Up),
            Command::Down => Some(Direction::Down),
            Command::Left => Some(Direction::Left),
            Command::Right => Some(Direction::Right),
            Command::Cancel | Command::Reset => None,
        }
    }
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Command::Up,
            Direction::Down => Command::Down,
            Direction::Left => Command::Left,
            Direction::Right => Command::Right,
        }
    }
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The board changed; playback has been scheduled.
    Moved { score_delta: u32 },
    /// The slide had no effect in that direction.
    Unchanged,
    /// Ignored in the current state.
    Rejected,
    /// Blocking playback was cut short.
    Cancelled { terminated: usize },
    Reset,
}

/// Coarse session state for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for input.
    Idle,
    /// Blocking effects are playing.
    AwaitingPlayback,
    /// No legal move remains. Only reset leaves this phase.
    Blocked,
    /// The winning tile exists; play may continue.
    Won,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Phase::Idle => "idle",
            Phase::AwaitingPlayback => "playing",
            Phase::Blocked => "game over",
            Phase::Won => "won",
        })
    }
}

/// Point-in-time copy of everything a renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub committed: [[CellValue; SIZE]; SIZE],
    pub pending: [[CellValue; SIZE]; SIZE],
    pub score: u32,
    pub best: u32,
    pub moves: u32,
    pub elapsed: Duration,
    pub phase: Phase,
    pub over: bool,
    pub won: bool,
    pub effects: Vec<EffectInfo>,
}

struct SessionState {
    config: SessionConfig,
    board: Board,
    selector: SpawnSelector,
    scheduler: AnimationScheduler,
    score: u32,
    best: u32,
    moves: u32,
    over: bool,
    won: bool,
    /// The win overlay is on screen and the timer is held for it.
    win_visible: bool,
}

impl SessionState {
    fn phase(&self) -> Phase {
        if self.over {
            Phase::Blocked
        } else if self.scheduler.is_blocking() {
            Phase::AwaitingPlayback
        } else if self.won {
            Phase::Won
        } else {
            Phase::Idle
        }
    }

    fn win_overlay_animating(&self) -> bool {
        self.scheduler
            .contains(|kind| matches!(kind, EffectKind::GameWon))
    }

    fn handle(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Reset => {
                self.reset();
                CommandOutcome::Reset
            }
            Command::Cancel => {
                if self.win_overlay_animating() {
                    return CommandOutcome::Rejected;
                }
                CommandOutcome::Cancelled {
                    terminated: self.cancel(),
                }
            }
            Command::Up | Command::Down | Command::Left | Command::Right => {
                let Some(direction) = command.direction() else {
                    return CommandOutcome::Rejected;
                };
                self.slide(direction)
            }
        }
    }

    fn slide(&mut self, direction: Direction) -> CommandOutcome {
        if self.over || self.win_overlay_animating() {
            return CommandOutcome::Rejected;
        }
        if self.scheduler.is_blocking() {
            if !self.config.interrupt_playback {
                return CommandOutcome::Rejected;
            }
            self.cancel();
            // Settling may have just ended or won the game.
            if self.over || self.win_overlay_animating() {
                return CommandOutcome::Rejected;
            }
        }
        self.apply_move(direction)
    }

    fn cancel(&mut self) -> usize {
        let terminated = self.scheduler.force_terminate_blocking(&mut self.board);
        if self.scheduler.has_settled() {
            self.evaluate_terminal();
        }
        terminated
    }

    fn apply_move(&mut self, direction: Direction) -> CommandOutcome {
        let result = resolve(&self.board, direction);
        if !result.changed {
            return CommandOutcome::Unchanged;
        }

        let slide_ticks = self.config.slide_ticks;
        let merge_ticks = self.config.merge_ticks;
        let move_ticks = if result.duration_units() >= 2 {
            merge_ticks.max(slide_ticks)
        } else {
            slide_ticks
        };

        self.board = result.board;
        for transition in &result.transitions {
            match *transition {
                Transition::Slide { from, to, value } => {
                    self.board.vacate(from);
                    self.scheduler.enqueue(
                        EffectKind::Slide { from, to, value },
                        Timeline::new(slide_ticks),
                    );
                }
                Transition::Merge { from, to, result } => {
                    self.board.vacate(from);
                    self.scheduler.enqueue(
                        EffectKind::Merge { from, to, result },
                        Timeline::new(merge_ticks),
                    );
                }
                Transition::NoOp => {}
            }
        }

        let delta = result.score_delta;
        if delta > 0 {
            self.score = self.score.saturating_add(delta);
            self.best = self.best.max(self.score);
            self.scheduler.enqueue(
                EffectKind::Score { delta },
                Timeline::new(self.config.score_ticks),
            );
        }
        self.moves += 1;

        if let Some(spawn) = self.selector.spawn(&self.board) {
            self.board.set_pending(spawn.position, spawn.value);
            self.scheduler.enqueue(
                EffectKind::Spawn {
                    at: spawn.position,
                    value: spawn.value,
                },
                Timeline::new(self.config.spawn_ticks).delayed(move_ticks),
            );
        }

        if self.win_visible {
            self.win_visible = false;
            self.scheduler.timer_mut().unfreeze();
        }

        tracing::debug!(
            ?direction,
            transitions = result.transitions.len(),
            delta,
            score = self.score,
            moves = self.moves,
            "move applied"
        );
        CommandOutcome::Moved { score_delta: delta }
    }

    fn tick(&mut self) {
        let report = self.scheduler.advance(&mut self.board);
        if report.settled {
            self.evaluate_terminal();
        }
    }

    /// Game-over first, then game-won. Nothing changes once the game is over.
    fn evaluate_terminal(&mut self) {
        if self.over {
            return;
        }
        if !self.win_visible && self.board.is_blocked() {
            self.over = true;
            self.scheduler.timer_mut().freeze();
            self.scheduler
                .enqueue(EffectKind::GameOver, Timeline::new(self.config.game_over_ticks));
            tracing::info!(
                score = self.score,
                moves = self.moves,
                max_tile = self.board.max_tile().magnitude(),
                "game over"
            );
        } else if !self.won && self.board.has_tile(self.config.win_value) {
            self.won = true;
            self.win_visible = true;
            self.scheduler.timer_mut().freeze();
            self.scheduler
                .enqueue(EffectKind::GameWon, Timeline::new(self.config.game_won_ticks));
            tracing::info!(score = self.score, moves = self.moves, "game won");
        }
    }

    fn dismiss_win(&mut self) -> bool {
        if !self.win_visible {
            return false;
        }
        self.win_visible = false;
        self.scheduler.timer_mut().unfreeze();
        true
    }

    fn reset(&mut self) {
        self.best = self.best.max(self.score);
        self.score = 0;
        self.moves = 0;
        self.scheduler.clear();
        self.board.clear();
        self.over = false;
        self.won = false;
        self.win_visible = false;
        self.scheduler.timer_mut().reset();

        for _ in 0..2 {
            if let Some(spawn) = self.selector.spawn(&self.board) {
                self.board.set_pending(spawn.position, spawn.value);
                self.scheduler.enqueue(
                    EffectKind::Spawn {
                        at: spawn.position,
                        value: spawn.value,
                    },
                    Timeline::new(self.config.spawn_ticks),
                );
            }
        }
        tracing::info!(best = self.best, "new game");
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            committed: self.board.committed_rows(),
            pending: self.board.pending_rows(),
            score: self.score,
            best: self.best,
            moves: self.moves,
            elapsed: self.scheduler.timer().elapsed(),
            phase: self.phase(),
            over: self.over,
            won: self.won,
            effects: self.scheduler.infos(),
        }
    }
}

/// A running game, shareable between an input thread and a clock thread.
pub struct Session {
    inner: Mutex<SessionState>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Session")
            .field("phase", &state.phase())
            .field("score", &state.score)
            .field("moves", &state.moves)
            .field("effects", &state.scheduler.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start configuring a session.
    #[must_use]
    pub fn builder(config: SessionConfig) -> SessionBuilder {
        SessionBuilder {
            config,
            clock: None,
            board: None,
        }
    }

    /// A fresh game on the system clock.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a command from the input side. Never blocks on playback.
    pub fn handle(&self, command: Command) -> CommandOutcome {
        let outcome = self.lock().handle(command);
        tracing::debug!(?command, ?outcome, "command handled");
        outcome
    }

    /// Advance playback by one tick.
    pub fn tick(&self) {
        self.lock().tick();
    }

    /// Continue past the win overlay. Returns false if it was not shown.
    pub fn dismiss_win(&self) -> bool {
        self.lock().dismiss_win()
    }

    /// Show the non-blocking error flash.
    pub fn flash_error(&self) {
        let mut state = self.lock();
        let ticks = state.config.error_ticks;
        state
            .scheduler
            .enqueue(EffectKind::ErrorFlash, Timeline::new(ticks));
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.lock().over
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.lock().won
    }

    /// Whether blocking playback is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.lock().scheduler.is_blocking()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.lock().score
    }

    #[must_use]
    pub fn best(&self) -> u32 {
        self.lock().best
    }

    #[must_use]
    pub fn moves(&self) -> u32 {
        self.lock().moves
    }

    /// Play time, excluding time spent frozen behind terminal overlays.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.lock().scheduler.timer().elapsed()
    }

    /// Copy of the board, both layers.
    #[must_use]
    pub fn board(&self) -> Board {
        self.lock().board.clone()
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.lock().config.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    config: SessionConfig,
    clock: Option<Arc<dyn MonotonicClock>>,
    board: Option<Board>,
}

impl SessionBuilder {
    /// Time source for the session timer.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn MonotonicClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Start from this board instead of two fresh spawns.
    #[must_use]
    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    pub fn build(self) -> Result<Session, ConfigError> {
        self.config.validate()?;
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));
        let selector = match self.config.seed {
            Some(seed) => SpawnSelector::seeded(seed),
            None => SpawnSelector::from_entropy(),
        };

        let mut state = SessionState {
            config: self.config,
            board: Board::new(),
            selector,
            scheduler: AnimationScheduler::new(SessionTimer::new(clock)),
            score: 0,
            best: 0,
            moves: 0,
            over: false,
            won: false,
            win_visible: false,
        };
        match self.board {
            Some(board) => state.board = board,
            None => state.reset(),
        }
        Ok(Session {
            inner: Mutex::new(state),
        })
    }
}

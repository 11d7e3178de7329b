#![forbid(unsafe_code)]

//! Move resolution.
//!
//! [`resolve`] slides every tile toward one edge, fusing equal neighbours,
//! and reports what happened as an ordered list of [`Transition`]s. It is a
//! pure function: the input board is not touched and only pending values of
//! the returned board differ from it.
//!
//! # Algorithm
//!
//! Each of the four lines parallel to the direction is handled on its own.
//! Cells are visited from the one nearest the target edge outward. An
//! occupied cell walks toward the edge over empty pending cells, but never
//! past the line's *merge floor*: the first index still allowed to absorb a
//! merge. If it stops next to an equal pending value at or beyond the floor
//! the two fuse and the floor moves past the fused cell, so each cell
//! accepts at most one merge per move and results never chain.
//!
//! # Invariants
//!
//! 1. `changed` is true iff at least one non-`NoOp` transition exists.
//! 2. The sum of pending magnitudes is unchanged by a move.
//! 3. `score_delta` equals the sum of the merge results' magnitudes.
//! 4. No two merges share a destination.

use crate::board::{Board, Position, SIZE};
use crate::value::CellValue;

/// A cardinal slide direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Positions of line `line`, ordered from the target edge outward.
    fn line(self, line: u8) -> [Position; SIZE] {
        let edge = SIZE as u8 - 1;
        std::array::from_fn(|k| {
            let k = k as u8;
            match self {
                Direction::Up => Position::new(line, k),
                Direction::Down => Position::new(line, edge - k),
                Direction::Left => Position::new(k, line),
                Direction::Right => Position::new(edge - k, line),
            }
        })
    }
}

/// One tile's consequence of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// `value` moves from `from` to `to` unchanged.
    Slide {
        from: Position,
        to: Position,
        value: CellValue,
    },
    /// The tile at `from` fuses into `to`, which now holds `result`.
    Merge {
        from: Position,
        to: Position,
        result: CellValue,
    },
    /// Nothing happens.
    NoOp,
}

impl Transition {
    /// Minimum animation length in slide units (slide 1, merge 2).
    #[must_use]
    pub const fn units(&self) -> u32 {
        match self {
            Transition::Slide { .. } => 1,
            Transition::Merge { .. } => 2,
            Transition::NoOp => 0,
        }
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Transition::NoOp)
    }

    /// Cell the moving tile lands in, if any.
    #[must_use]
    pub const fn destination(&self) -> Option<Position> {
        match *self {
            Transition::Slide { to, .. } | Transition::Merge { to, .. } => Some(to),
            Transition::NoOp => None,
        }
    }
}

/// Output of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// The input board with pending values updated; committed values untouched.
    pub board: Board,
    /// Transitions in resolution order (line by line, edge outward).
    pub transitions: Vec<Transition>,
    pub score_delta: u32,
    pub changed: bool,
}

impl MoveResult {
    /// Longest transition, in slide units: 2 if anything merged, 1 for
    /// slides only, 0 for an unchanged board.
    #[must_use]
    pub fn duration_units(&self) -> u32 {
        self.transitions.iter().map(Transition::units).max().unwrap_or(0)
    }

    /// Number of merges in this move.
    #[must_use]
    pub fn merge_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|t| matches!(t, Transition::Merge { .. }))
            .count()
    }
}

/// Resolve a move of `board` toward `direction`.
///
/// ```
/// use tiles_core::{Board, Direction, Transition, CellValue, Position, resolve};
///
/// let board = Board::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
/// let result = resolve(&board, Direction::Left);
/// assert_eq!(result.score_delta, 4);
/// assert_eq!(
///     result.transitions[0],
///     Transition::Merge {
///         from: Position::new(1, 0),
///         to: Position::new(0, 0),
///         result: CellValue::V4,
///     }
/// );
/// ```
#[must_use]
pub fn resolve(board: &Board, direction: Direction) -> MoveResult {
    let _span = crate::trace_span!("resolve", ?direction).entered();
    let mut next = board.clone();
    let mut transitions = Vec::new();
    let mut score_delta = 0;

    for line in 0..SIZE as u8 {
        resolve_line(
            &mut next,
            direction.line(line),
            &mut transitions,
            &mut score_delta,
        );
    }

    let changed = transitions.iter().any(|t| !t.is_noop());
    crate::trace!(
        ?direction,
        transitions = transitions.len(),
        score_delta,
        changed,
        "move resolved"
    );

    MoveResult {
        board: next,
        transitions,
        score_delta,
        changed,
    }
}

fn resolve_line(
    board: &mut Board,
    line: [Position; SIZE],
    transitions: &mut Vec<Transition>,
    score_delta: &mut u32,
) {
    let mut floor = 0;
    let mut merged = [false; SIZE];

    for k in 1..SIZE {
        let from = line[k];
        let value = board.pending(from);
        if value.is_empty() {
            continue;
        }

        let mut stop = k;
        while stop > floor && board.pending(line[stop - 1]).is_empty() {
            stop -= 1;
        }

        if stop > floor && board.pending(line[stop - 1]) == value && value != CellValue::MAX {
            let target = stop - 1;
            assert!(
                !merged[target],
                "cell {} absorbed two merges in one move",
                line[target]
            );
            merged[target] = true;

            let result = value.next();
            board.set_pending(from, CellValue::Empty);
            board.set_pending(line[target], result);
            *score_delta += result.magnitude();
            transitions.push(Transition::Merge {
                from,
                to: line[target],
                result,
            });
            floor = stop;
        } else if stop < k {
            board.set_pending(from, CellValue::Empty);
            board.set_pending(line[stop], value);
            transitions.push(Transition::Slide {
                from,
                to: line[stop],
                value,
            });
        }
    }
}

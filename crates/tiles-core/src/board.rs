#![forbid(unsafe_code)]

//! The 4x4 grid of double-buffered cells.
//!
//! # Invariants
//!
//! 1. Exactly 16 cells exist, addressed by `(column, row)` in `0..4 x 0..4`.
//! 2. Outside of an in-flight move, `committed == pending` for every cell.
//! 3. Only [`Board::commit`] (and [`Board::set`] on reset) moves a pending
//!    value into the committed slot.
//!
//! # Failure Modes
//!
//! - Out-of-range coordinates panic in [`Position::new`]; callers use the
//!   fixed `0..SIZE` range.

use std::fmt;

use crate::value::{CellValue, InvalidMagnitude};

/// Side length of the board.
pub const SIZE: usize = 4;

/// A cell address: `x` is the column, `y` the row, both in `0..SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    /// Address of column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside `0..SIZE`.
    #[must_use]
    pub fn new(x: u8, y: u8) -> Self {
        assert!(
            (x as usize) < SIZE && (y as usize) < SIZE,
            "cell ({x}, {y}) is outside the {SIZE}x{SIZE} board"
        );
        Self { x, y }
    }

    #[inline]
    fn index(self) -> usize {
        self.x as usize + self.y as usize * SIZE
    }

    /// All 16 positions, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SIZE as u8).flat_map(|y| (0..SIZE as u8).map(move |x| Position { x, y }))
    }
}

impl From<(u8, u8)> for Position {
    fn from((x, y): (u8, u8)) -> Self {
        Position::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One grid position's two value slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    committed: CellValue,
    pending: CellValue,
}

impl Cell {
    /// What a renderer draws when nothing is animating here.
    #[inline]
    #[must_use]
    pub fn committed(self) -> CellValue {
        self.committed
    }

    /// What the last resolved move decided this cell will hold.
    #[inline]
    #[must_use]
    pub fn pending(self) -> CellValue {
        self.pending
    }

    #[inline]
    #[must_use]
    pub fn is_settled(self) -> bool {
        self.committed == self.pending
    }
}

/// Fixed 4x4 array of cells.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Cell; SIZE * SIZE],
}

impl Board {
    /// An empty, settled board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a settled board from magnitudes given row by row (`rows[y][x]`).
    ///
    /// ```
    /// use tiles_core::{Board, CellValue};
    ///
    /// let board = Board::from_rows([
    ///     [2, 2, 4, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 8],
    /// ])
    /// .unwrap();
    /// assert_eq!(board.get((2, 0)), CellValue::V4);
    /// assert_eq!(board.get((3, 3)), CellValue::V8);
    /// ```
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Result<Self, InvalidMagnitude> {
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &magnitude) in row.iter().enumerate() {
                board.set((x as u8, y as u8), CellValue::try_from(magnitude)?);
            }
        }
        Ok(board)
    }

    #[inline]
    #[must_use]
    pub fn cell(&self, pos: impl Into<Position>) -> Cell {
        self.cells[pos.into().index()]
    }

    /// Committed value at `pos`.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: impl Into<Position>) -> CellValue {
        self.cell(pos).committed
    }

    /// Pending value at `pos`.
    #[inline]
    #[must_use]
    pub fn pending(&self, pos: impl Into<Position>) -> CellValue {
        self.cell(pos).pending
    }

    /// Overwrite both slots. Used when clearing the board and in tests.
    #[inline]
    pub fn set(&mut self, pos: impl Into<Position>, value: CellValue) {
        let cell = &mut self.cells[pos.into().index()];
        cell.committed = value;
        cell.pending = value;
    }

    /// Write the pending slot only.
    #[inline]
    pub fn set_pending(&mut self, pos: impl Into<Position>, value: CellValue) {
        self.cells[pos.into().index()].pending = value;
    }

    /// Advance the committed slot to the pending value.
    #[inline]
    pub fn commit(&mut self, pos: impl Into<Position>) {
        let cell = &mut self.cells[pos.into().index()];
        cell.committed = cell.pending;
    }

    /// Clear the committed slot because its tile is now in flight.
    ///
    /// The pending slot is left alone: another tile may already be bound
    /// for this cell.
    #[inline]
    pub fn vacate(&mut self, pos: impl Into<Position>) {
        self.cells[pos.into().index()].committed = CellValue::Empty;
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells = [Cell::default(); SIZE * SIZE];
    }

    /// Whether `committed == pending` everywhere.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.cells.iter().all(|c| c.is_settled())
    }

    /// Committed values, row by row.
    #[must_use]
    pub fn committed_rows(&self) -> [[CellValue; SIZE]; SIZE] {
        self.rows(Cell::committed)
    }

    /// Pending values, row by row.
    #[must_use]
    pub fn pending_rows(&self) -> [[CellValue; SIZE]; SIZE] {
        self.rows(Cell::pending)
    }

    fn rows(&self, slot: fn(Cell) -> CellValue) -> [[CellValue; SIZE]; SIZE] {
        let mut rows = [[CellValue::Empty; SIZE]; SIZE];
        for pos in Position::all() {
            rows[pos.y as usize][pos.x as usize] = slot(self.cell(pos));
        }
        rows
    }

    /// Positions whose pending value is empty, row by row.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(|&pos| self.pending(pos).is_empty())
    }

    /// Sum of pending magnitudes.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.cells.iter().map(|c| c.pending.magnitude()).sum()
    }

    /// True iff no cell is empty and no two orthogonal neighbours match.
    ///
    /// A pair of maximum tiles cannot merge and so does not count as a
    /// match. Reads the pending layer; callers check it once playback has
    /// settled.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        if self.empty_positions().next().is_some() {
            return false;
        }
        for y in 0..SIZE as u8 {
            for x in 0..SIZE as u8 {
                let value = self.pending((x, y));
                if value.checked_next().is_none() {
                    continue;
                }
                if (x as usize) + 1 < SIZE && self.pending((x + 1, y)) == value {
                    return false;
                }
                if (y as usize) + 1 < SIZE && self.pending((x, y + 1)) == value {
                    return false;
                }
            }
        }
        true
    }

    /// Whether any cell holds `target` in its pending slot.
    #[must_use]
    pub fn has_tile(&self, target: CellValue) -> bool {
        self.cells.iter().any(|c| c.pending == target)
    }

    /// Largest pending value on the board.
    #[must_use]
    pub fn max_tile(&self) -> CellValue {
        self.cells
            .iter()
            .map(|c| c.pending)
            .max()
            .unwrap_or_default()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("committed", &self.committed_rows())
            .field("pending", &self.pending_rows())
            .finish()
    }
}

/// Committed values as four right-aligned rows, `.` for empty.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.committed_rows().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{value:>5}")?;
            }
        }
        Ok(())
    }
}

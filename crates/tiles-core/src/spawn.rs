#![forbid(unsafe_code)]

//! Random tile placement.
//!
//! [`SpawnSelector`] owns its random source so a session can be replayed
//! exactly from a seed. Positions are drawn uniformly among cells whose
//! pending value is empty; the value is a 2 nine times in ten, otherwise a 4.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Position};
use crate::value::CellValue;

/// Chance out of ten that a spawned tile is the smaller value.
const SMALL_TILE_WEIGHT: u32 = 9;

/// A tile chosen for placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawn {
    pub position: Position,
    pub value: CellValue,
}

/// Picks where the next tile appears and what it is.
#[derive(Debug, Clone)]
pub struct SpawnSelector<R = StdRng> {
    rng: R,
}

impl SpawnSelector<StdRng> {
    /// Reproducible selector: the same seed yields the same spawns.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Selector seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Restart the random sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl<R: Rng> SpawnSelector<R> {
    /// Wrap an arbitrary random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Choose a tile for `board`, or `None` if no pending cell is empty.
    ///
    /// ```
    /// use tiles_core::{Board, SpawnSelector};
    ///
    /// let mut selector = SpawnSelector::seeded(7);
    /// let spawn = selector.spawn(&Board::new()).unwrap();
    /// assert!(spawn.value.magnitude() == 2 || spawn.value.magnitude() == 4);
    /// ```
    pub fn spawn(&mut self, board: &Board) -> Option<Spawn> {
        let empties: Vec<Position> = board.empty_positions().collect();
        if empties.is_empty() {
            crate::debug!("no empty cell to spawn into");
            return None;
        }
        let position = empties[self.rng.gen_range(0..empties.len())];
        let value = if self.rng.gen_range(0..10) < SMALL_TILE_WEIGHT {
            CellValue::V2
        } else {
            CellValue::V4
        };
        crate::trace!(%position, ?value, candidates = empties.len(), "tile spawned");
        Some(Spawn { position, value })
    }
}

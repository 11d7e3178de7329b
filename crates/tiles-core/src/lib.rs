#![forbid(unsafe_code)]

//! Core: the 4x4 board, deterministic move resolution, and tile spawning.
//!
//! Nothing in this crate touches time or threads. [`engine::resolve`] is a
//! pure function from a board and a direction to the board's next logical
//! state plus the ordered list of tile transitions that produced it; the
//! runtime crate turns those transitions into timed effects.
//!
//! Each [`board::Cell`] is double-buffered: the *committed* value is what a
//! renderer draws when idle, the *pending* value is what the last move
//! computed. The engine only ever writes pending values.

pub mod board;
pub mod engine;
pub mod logging;
pub mod spawn;
pub mod value;

pub use board::{Board, Cell, Position, SIZE};
pub use engine::{Direction, MoveResult, Transition, resolve};
pub use spawn::{Spawn, SpawnSelector};
pub use value::{CellValue, InvalidMagnitude};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, trace_span};

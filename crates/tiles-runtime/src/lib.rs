#![forbid(unsafe_code)]

//! Playback and session state for the tiles puzzle.
//!
//! `tiles-core` decides what a move does; this crate decides when the player
//! sees it. A [`Session`] owns the board, an [`AnimationScheduler`] of
//! [`Effect`]s and the [`SessionTimer`], and serializes the host's input and
//! clock threads under one lock.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tiles_runtime::{Command, ManualClock, Session, SessionConfig};
//!
//! let session = Session::builder(SessionConfig::default().with_seed(1))
//!     .clock(Arc::new(ManualClock::new()))
//!     .build()
//!     .unwrap();
//! while session.is_animating() {
//!     session.tick();
//! }
//! let _ = session.handle(Command::Left);
//! ```

pub mod animation;
pub mod config;
pub mod effect;
pub mod scheduler;
pub mod session;
pub mod timer;

pub use animation::{Animation, Timeline};
pub use config::{ConfigError, SessionConfig};
pub use effect::{Effect, EffectId, EffectInfo, EffectKind};
pub use scheduler::{AnimationScheduler, StepReport};
pub use session::{Command, CommandOutcome, Phase, Session, SessionBuilder, SessionSnapshot};
pub use timer::{ManualClock, MonotonicClock, SessionTimer, SystemClock};

pub use tiles_core::{Board, CellValue, Direction, Position};

#![forbid(unsafe_code)]

//! Session play-time measurement.
//!
//! The timer reads an injected [`MonotonicClock`] so tests can step time by
//! hand. It can be frozen (game over, win overlay) and unfrozen without
//! losing the time already accumulated.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A source of monotonically non-decreasing time.
pub trait MonotonicClock: Send + Sync {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic tests.
///
/// Clones share the same reading, so one handle can be given to a session
/// and another kept to advance it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Accumulating stopwatch over a [`MonotonicClock`].
pub struct SessionTimer {
    clock: Arc<dyn MonotonicClock>,
    accumulated: Duration,
    running_since: Option<Duration>,
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("accumulated", &self.accumulated)
            .field("running_since", &self.running_since)
            .finish_non_exhaustive()
    }
}

impl SessionTimer {
    /// A running timer starting at zero.
    #[must_use]
    pub fn new(clock: Arc<dyn MonotonicClock>) -> Self {
        let now = clock.now();
        Self {
            clock,
            accumulated: Duration::ZERO,
            running_since: Some(now),
        }
    }

    /// Stop accumulating. No-op if already frozen.
    pub fn freeze(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += self.clock.now().saturating_sub(since);
        }
    }

    /// Resume accumulating. No-op if already running.
    pub fn unfreeze(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(self.clock.now());
        }
    }

    /// Back to zero and running.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(self.clock.now());
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.running_since.is_none()
    }

    /// Play time so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + self.clock.now().saturating_sub(since),
            None => self.accumulated,
        }
    }
}

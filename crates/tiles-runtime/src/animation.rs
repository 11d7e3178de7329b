#![forbid(unsafe_code)]

//! Tick-based animation primitives.
//!
//! Effects measure time in whole clock ticks rather than wall time, so a
//! replay driven by the same tick sequence produces the same frames. Output
//! values are normalized to `0.0..=1.0`.

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end). Used for tiles decelerating into place.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Grows past full size then relaxes back: peaks at 1.2 halfway through.
///
/// This is the one curve allowed to leave [0, 1]; it drives the scale of a
/// freshly merged tile.
#[inline]
pub fn pop(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        t * 2.4
    } else {
        1.0 + (1.0 - t) * 0.4
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A tick-driven animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance by `ticks` clock ticks.
    fn tick(&mut self, ticks: u32);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Linear progress through the visible part, clamped to [0.0, 1.0].
    fn progress(&self) -> f32;

    /// Jump straight to the end.
    fn finish(&mut self);
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// An optional delay followed by a fixed-length run, counted in ticks.
///
/// `progress()` stays at 0.0 during the delay. A zero duration is bumped to
/// one tick so progress is always well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    delay: u32,
    duration: u32,
    elapsed: u32,
}

impl Timeline {
    /// A timeline that starts immediately and runs for `duration` ticks.
    #[must_use]
    pub fn new(duration: u32) -> Self {
        Self {
            delay: 0,
            duration: duration.max(1),
            elapsed: 0,
        }
    }

    /// Wait `delay` ticks before starting (builder).
    #[must_use]
    pub fn delayed(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    /// Ticks counted so far, including the delay.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Delay plus duration: ticks from enqueue to completion.
    #[inline]
    #[must_use]
    pub fn total(&self) -> u32 {
        self.delay.saturating_add(self.duration)
    }

    /// Whether the delay has passed.
    #[inline]
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.elapsed >= self.delay
    }

    /// Ticks left until completion.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.total().saturating_sub(self.elapsed)
    }
}

impl Animation for Timeline {
    fn tick(&mut self, ticks: u32) {
        self.elapsed = self.elapsed.saturating_add(ticks);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.total()
    }

    fn progress(&self) -> f32 {
        let run = self.elapsed.saturating_sub(self.delay);
        (run as f32 / self.duration as f32).clamp(0.0, 1.0)
    }

    fn finish(&mut self) {
        self.elapsed = self.elapsed.max(self.total());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

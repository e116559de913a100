//! Fixed-step frame clock.
//!
//! Animations advance in fixed per-frame increments tuned for a 60 Hz display.
//! The terminal redraws at its own rate, so elapsed time is converted into a
//! whole number of steps here.

use nebula_core::AnimationSpeed;

/// Steps per second at medium speed.
pub const REFERENCE_STEP_RATE: f32 = 60.0;
/// Longest stretch of time accounted for in one tick. Covers the slowest
/// redraw rate (1 fps), so only real stalls are cut short.
const MAX_DELTA_MS: u64 = 1000;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<u64>,
    /// Unspent time, in steps.
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps to run for the time elapsed since the previous tick.
    ///
    /// The first tick always yields one step so a new scene is drawn at once.
    pub fn tick(&mut self, elapsed_ms: u64, speed: AnimationSpeed) -> u32 {
        let Some(last) = self.last_ms.replace(elapsed_ms) else {
            return 1;
        };
        let delta_ms = elapsed_ms.saturating_sub(last).min(MAX_DELTA_MS);
        let rate = REFERENCE_STEP_RATE * speed.rate_multiplier();
        self.accumulator += delta_ms as f32 / 1000.0 * rate;

        let steps = self.accumulator.floor() as u32;
        self.accumulator = (self.accumulator - steps as f32).min(1.0);
        steps
    }

    /// Forget timing history, e.g. after a pause.
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.accumulator = 0.0;
    }
}

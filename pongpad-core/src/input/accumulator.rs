//! Paddle target accumulator

use super::sampler::PositionDelta;
use crate::config::{DisplayGeometry, InputTuning};

/// Clamp `value` into `[lo, hi]`
///
/// Returns `lo` if `value < lo`, `hi` if `value > hi`, else `value`.
/// Requires `lo <= hi`.
pub fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Round half away from zero
fn round_half_away(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

/// Desired paddle position, persistent across loop iterations
///
/// The target is clamped to the legal paddle range on every update, so a
/// long push against an edge never builds up hidden travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaddleTarget {
    value: i16,
    max: i16,
}

impl PaddleTarget {
    /// Create a target at the configured starting position
    pub fn new(tuning: &InputTuning, geometry: &DisplayGeometry) -> Self {
        let max = geometry.max_paddle_y().max(0);
        Self {
            value: clamp(tuning.initial_target, 0, max),
            max,
        }
    }

    /// Current target, always in `[0, max]`
    pub fn value(&self) -> i16 {
        self.value
    }

    /// Upper bound of the target
    pub fn max(&self) -> i16 {
        self.max
    }

    /// Integrate one loop's joystick deflection and return the new target
    pub fn apply(&mut self, delta: PositionDelta, tuning: &InputTuning) -> i16 {
        let step = round_half_away(delta.step(tuning));
        let next = i32::from(self.value) + step;
        // Result lies in [0, max] so the narrowing cannot truncate
        self.value = clamp(next, 0, i32::from(self.max)) as i16;
        self.value
    }
}

impl Default for PaddleTarget {
    fn default() -> Self {
        Self::new(&InputTuning::default(), &DisplayGeometry::default())
    }
}

//! Joystick sample normalization and speed shaping

use crate::config::InputTuning;

/// Raw joystick reading in `0..=full_scale`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickSample(pub u16);

/// Signed joystick deflection in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionDelta(f32);

impl JoystickSample {
    /// The neutral (centred) reading for a converter of the given range
    pub fn neutral(full_scale: u16) -> Self {
        Self(full_scale / 2)
    }

    /// Convert to a signed deflection
    ///
    /// Readings above `full_scale` are treated as `full_scale`.
    pub fn normalize(self, tuning: &InputTuning) -> PositionDelta {
        let full_scale = f32::from(tuning.full_scale.max(1));
        let center = full_scale / 2.0;
        let raw = f32::from(self.0.min(tuning.full_scale.max(1)));
        PositionDelta(((raw - center) / center).clamp(-1.0, 1.0))
    }
}

impl PositionDelta {
    /// Deflection value
    pub fn value(self) -> f32 {
        self.0
    }

    /// Paddle movement for this loop, in pixels (not yet rounded)
    ///
    /// Movement grows with the square of the deflection:
    /// `step = delta * max_step * |delta|`.
    pub fn step(self, tuning: &InputTuning) -> f32 {
        let speed = if self.0 < 0.0 { -self.0 } else { self.0 };
        self.0 * tuning.max_step * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extremes() {
        let tuning = InputTuning::default();
        assert_eq!(JoystickSample(0).normalize(&tuning).value(), -1.0);
        assert_eq!(JoystickSample(4095).normalize(&tuning).value(), 1.0);
    }

    #[test]
    fn test_neutral_is_near_zero() {
        let tuning = InputTuning::default();
        let delta = JoystickSample::neutral(4095).normalize(&tuning).value();
        assert!(delta.abs() < 0.001);
        assert!(JoystickSample(2048).normalize(&tuning).step(&tuning).abs() < 0.001);
    }

    #[test]
    fn test_out_of_range_reading_is_clamped() {
        let tuning = InputTuning::default();
        assert_eq!(JoystickSample(u16::MAX).normalize(&tuning).value(), 1.0);
    }

    #[test]
    fn test_step_is_quadratic() {
        let tuning = InputTuning::default();
        assert_eq!(PositionDelta(1.0).step(&tuning), 3.0);
        assert_eq!(PositionDelta(-1.0).step(&tuning), -3.0);
        assert_eq!(PositionDelta(0.5).step(&tuning), 0.75);
        assert_eq!(PositionDelta(-0.5).step(&tuning), -0.75);
    }

    proptest! {
        #[test]
        fn prop_delta_in_range(raw in 0u16..=4095) {
            let tuning = InputTuning::default();
            let delta = JoystickSample(raw).normalize(&tuning).value();
            prop_assert!((-1.0..=1.0).contains(&delta));
        }

        #[test]
        fn prop_step_bounded(raw in 0u16..=4095) {
            let tuning = InputTuning::default();
            let step = JoystickSample(raw).normalize(&tuning).step(&tuning);
            prop_assert!(step.abs() <= tuning.max_step);
        }
    }
}

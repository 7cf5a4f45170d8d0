//! Joystick trait

use crate::input::JoystickSample;

/// Analog joystick axis
///
/// Sampling never fails: an implementation whose converter read fails
/// returns the neutral centre reading, which leaves the paddle still.
pub trait Joystick {
    /// Take one reading of the axis
    fn sample(&mut self) -> JoystickSample;
}

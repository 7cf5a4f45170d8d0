//! Input drivers

pub mod joystick;

pub use joystick::{AdcReader, AnalogJoystick};

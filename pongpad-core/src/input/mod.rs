//! Joystick input processing
//!
//! Raw ADC samples are normalized into a signed delta, shaped so that small
//! deflections give fine control, and integrated into a clamped paddle
//! target that persists across loop iterations.

pub mod accumulator;
pub mod sampler;

pub use accumulator::{clamp, PaddleTarget};
pub use sampler::{JoystickSample, PositionDelta};

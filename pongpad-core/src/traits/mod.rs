//! Hardware abstraction traits
//!
//! These traits define the interface between the session logic and the
//! board-specific joystick, network link and display implementations.

pub mod display;
pub mod joystick;
pub mod link;

pub use display::{DisplayError, GameDisplay};
pub use joystick::Joystick;
pub use link::{Link, LinkError};

//! Board-agnostic core logic for the paddle controller firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (joystick, network link, game display)
//! - Joystick normalization and the paddle position accumulator
//! - Game snapshot and local ball model
//! - Session state machine
//! - Network client (handshake, framing, bounded receive)
//! - Session controller driving the control loop
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod game;
pub mod input;
pub mod net;
pub mod session;
pub mod state;
pub mod traits;

#[cfg(test)]
mod testing;

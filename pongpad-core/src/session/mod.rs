//! Session controller
//!
//! Drives one session: connect, join, then one iteration per state frame
//! until the match ends or the link fails.

pub mod controller;

pub use controller::{Iteration, Session, SessionError, SessionObserver, Step};

//! Session state machine
//!
//! Tracks one connection lifetime from connect through the end of the
//! match. The session controller feeds it events and refuses any operation
//! whose expected state does not match the current one.

pub mod events;
pub mod machine;

pub use events::SessionEvent;
pub use machine::{AbortReason, SessionState};

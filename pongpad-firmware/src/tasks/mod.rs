//! Embassy async tasks
//!
//! The whole control loop runs in one task; there is nothing to share.

pub mod session;

pub use session::session_task;

//! Configuration types
//!
//! Compile-time configuration structures with defaults matching the
//! reference game server.

pub mod types;

pub use types::*;

//! Game model
//!
//! The server owns the game: the controller only mirrors the latest
//! authoritative snapshot and decides, from the scores, when the match is
//! over. The local [`BallMotion`] model drives the lobby animation.

pub mod ball;
pub mod snapshot;

pub use ball::BallMotion;
pub use snapshot::{GameState, Outcome, Side};

//! Game display trait

use crate::game::{BallMotion, GameState, Outcome};

/// Errors that can occur while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer to the panel failed
    Bus,
    /// Panel did not respond
    Timeout,
}

/// Screen that shows the game
///
/// Each call redraws the whole screen and pushes it to the panel. Drawing
/// is a pure function of the arguments: the same state always produces the
/// same picture. Errors are reported but never fatal to the session.
#[allow(async_fn_in_trait)]
pub trait GameDisplay {
    /// Draw paddles, ball and scores from a state frame
    async fn show_frame(&mut self, state: &GameState) -> Result<(), DisplayError>;

    /// Draw the end-of-match message
    async fn show_outcome(&mut self, outcome: Outcome) -> Result<(), DisplayError>;

    /// Draw the waiting screen with the lobby ball
    async fn show_lobby(&mut self, ball: &BallMotion) -> Result<(), DisplayError>;
}

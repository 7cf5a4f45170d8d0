//! Authoritative game snapshot

use pongpad_protocol::StateFrame;

/// Half of the court a player occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    /// The other half of the court
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Result of a finished match, from the local player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    /// Message shown on the terminal screen
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Won => "You Won. :)",
            Outcome::Lost => "You Lost. :/",
        }
    }
}

/// Last state frame received from the server
///
/// Replaced wholesale on every successful receive; never patched.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameState {
    pub left_paddle: i16,
    pub right_paddle: i16,
    pub ball_x: f32,
    pub ball_y: f32,
    pub left_score: u8,
    pub right_score: u8,
}

impl From<StateFrame> for GameState {
    fn from(frame: StateFrame) -> Self {
        Self {
            left_paddle: frame.left_paddle,
            right_paddle: frame.right_paddle,
            ball_x: frame.ball.x,
            ball_y: frame.ball.y,
            left_score: frame.left_score,
            right_score: frame.right_score,
        }
    }
}

impl GameState {
    /// Paddle y of the given side
    pub fn paddle(&self, side: Side) -> i16 {
        match side {
            Side::Left => self.left_paddle,
            Side::Right => self.right_paddle,
        }
    }

    /// Score of the given side
    pub fn score(&self, side: Side) -> u8 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    /// Decide whether the match is over
    ///
    /// The opponent is checked first: if both sides somehow reach the
    /// threshold in one frame the local player has lost.
    pub fn outcome(&self, local: Side, winning_score: u8) -> Option<Outcome> {
        if self.score(local.opponent()) >= winning_score {
            Some(Outcome::Lost)
        } else if self.score(local) >= winning_score {
            Some(Outcome::Won)
        } else {
            None
        }
    }
}

//! Configuration type definitions
//!
//! These types describe the display geometry, joystick tuning, server
//! endpoint and session policy. The firmware fills them from constants
//! generated at build time; the defaults here mirror the reference server.

use crate::game::Side;

/// Display and court geometry, in pixels
///
/// The server uses the same coordinate space as the display, so paddle
/// and ball positions from state frames are drawn without scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayGeometry {
    /// Display width
    pub width: u16,
    /// Display height
    pub height: u16,
    /// Paddle bar width
    pub paddle_width: u16,
    /// Paddle bar height
    pub paddle_height: u16,
    /// Ball square side
    pub ball_size: u16,
    /// Distance of each paddle from its screen edge
    pub paddle_inset: u16,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            paddle_width: 2,
            paddle_height: 16,
            ball_size: 2,
            paddle_inset: 2,
        }
    }
}

impl DisplayGeometry {
    /// Highest legal paddle y (top edge); the lowest is 0
    pub const fn max_paddle_y(&self) -> i16 {
        (self.height as i16) - (self.paddle_height as i16)
    }

    /// X offset of the local paddle (left edge of the screen)
    pub const fn local_paddle_x(&self) -> i32 {
        self.paddle_inset as i32
    }

    /// X offset of the remote paddle (right edge of the screen)
    pub const fn remote_paddle_x(&self) -> i32 {
        self.width as i32 - self.paddle_inset as i32 - self.paddle_width as i32
    }

    /// Centre of the court
    pub const fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Joystick shaping parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputTuning {
    /// Highest raw ADC reading (4095 for a 12-bit converter)
    pub full_scale: u16,
    /// Paddle movement per loop at full deflection, in pixels
    pub max_step: f32,
    /// Paddle target at session start
    pub initial_target: i16,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            full_scale: 4095,
            max_step: 3.0,
            initial_target: 32,
        }
    }
}

/// Game server address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoint {
    /// Host name or dotted IPv4 address
    pub host: &'static str,
    /// TCP port
    pub port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: "127.0.0.1",
            port: 3000,
        }
    }
}

/// Session policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    /// Player identity sent with the join request and every paddle update
    pub player_name: &'static str,
    /// Half of the court the server assigns to this player
    pub local_side: Side,
    /// Score that ends the match
    pub winning_score: u8,
    /// Bounded wait for one state frame while playing
    pub frame_timeout_ms: u32,
    /// Poll interval while waiting in the lobby (lobby animation rate)
    pub lobby_tick_ms: u32,
    /// Give up waiting for the join acknowledgement after this long
    pub join_timeout_ms: u32,
    /// Consecutive inbound faults tolerated before the link counts as lost
    pub max_consecutive_faults: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_name: "pongpad",
            local_side: Side::Left,
            winning_score: 10,
            frame_timeout_ms: 2000,
            lobby_tick_ms: 250,
            join_timeout_ms: 300_000,
            max_consecutive_faults: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let geometry = DisplayGeometry::default();
        assert_eq!(geometry.max_paddle_y(), 48);
        assert_eq!(geometry.local_paddle_x(), 2);
        assert_eq!(geometry.remote_paddle_x(), 124);
        assert_eq!(geometry.center(), (64.0, 32.0));
    }

    #[test]
    fn test_initial_target_is_legal() {
        let tuning = InputTuning::default();
        let geometry = DisplayGeometry::default();
        assert!(tuning.initial_target >= 0);
        assert!(tuning.initial_target <= geometry.max_paddle_y());
    }
}

//! Local ball model
//!
//! While the controller waits in the lobby there is no server state to
//! draw, so a ball bounces around the screen locally. The model keeps the
//! serve rule of the game: after a reset the ball heads back the other way
//! vertically, and its horizontal direction follows the new vertical one.

use crate::config::DisplayGeometry;

/// Velocity magnitude of a freshly served ball, per component
pub const SERVE_SPEED: f32 = 2.0;

/// Speed added to each component by [`BallMotion::increase_speed`]
pub const SPEED_INCREMENT: f32 = 0.2;

/// Upper bound on each velocity component
pub const MAX_SPEED: f32 = 4.0;

/// Ball position and velocity
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BallMotion {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    geometry: DisplayGeometry,
}

fn magnitude(v: f32) -> f32 {
    if v < 0.0 {
        -v
    } else {
        v
    }
}

fn with_sign_of(magnitude: f32, sign: f32) -> f32 {
    if sign > 0.0 {
        magnitude
    } else {
        -magnitude
    }
}

impl BallMotion {
    /// Create a ball at the centre of the court, moving down and right
    pub fn new(geometry: DisplayGeometry) -> Self {
        let (x, y) = geometry.center();
        Self {
            x,
            y,
            dx: SERVE_SPEED,
            dy: SERVE_SPEED,
            geometry,
        }
    }

    /// Return the ball to the centre and serve it again
    ///
    /// The vertical velocity flips sign; the horizontal velocity takes the
    /// sign of the new vertical velocity. Both have magnitude [`SERVE_SPEED`].
    pub fn reset(&mut self) {
        let (x, y) = self.geometry.center();
        self.x = x;
        self.y = y;
        self.dy = if self.dy > 0.0 { -SERVE_SPEED } else { SERVE_SPEED };
        self.dx = with_sign_of(SERVE_SPEED, self.dy);
    }

    /// Add [`SPEED_INCREMENT`] to the magnitude of both components
    ///
    /// A component of exactly zero counts as negative. Magnitudes are
    /// capped at [`MAX_SPEED`].
    pub fn increase_speed(&mut self) {
        let dx = (magnitude(self.dx) + SPEED_INCREMENT).min(MAX_SPEED);
        let dy = (magnitude(self.dy) + SPEED_INCREMENT).min(MAX_SPEED);
        self.dx = with_sign_of(dx, self.dx);
        self.dy = with_sign_of(dy, self.dy);
    }

    /// Move the ball one tick
    ///
    /// Bounces off the top and bottom walls, speeding up on each bounce,
    /// and is served again once it leaves through the left or right edge.
    pub fn advance(&mut self) {
        self.x += self.dx;
        self.y += self.dy;

        let floor = f32::from(self.geometry.height) - f32::from(self.geometry.ball_size);
        if self.y <= 0.0 {
            self.y = 0.0;
            self.dy = magnitude(self.dy);
            self.increase_speed();
        } else if self.y >= floor {
            self.y = floor;
            self.dy = -magnitude(self.dy);
            self.increase_speed();
        }

        let right = f32::from(self.geometry.width) - f32::from(self.geometry.ball_size);
        if self.x < 0.0 || self.x > right {
            self.reset();
        }
    }
}

impl Default for BallMotion {
    fn default() -> Self {
        Self::new(DisplayGeometry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball(dx: f32, dy: f32) -> BallMotion {
        let mut ball = BallMotion::default();
        ball.dx = dx;
        ball.dy = dy;
        ball
    }

    #[test]
    fn test_reset_recenters() {
        let mut b = ball(3.0, 1.0);
        b.x = 5.0;
        b.y = 60.0;
        b.reset();
        assert_eq!((b.x, b.y), (64.0, 32.0));
    }

    #[test]
    fn test_reset_from_downward() {
        let mut b = ball(2.0, 2.0);
        b.reset();
        assert_eq!(b.dy, -2.0);
        assert_eq!(b.dx, -2.0);
    }

    #[test]
    fn test_reset_from_upward() {
        let mut b = ball(-2.6, -2.4);
        b.reset();
        assert_eq!(b.dy, 2.0);
        assert_eq!(b.dx, 2.0);
    }

    #[test]
    fn test_reset_from_zero_vertical() {
        let mut b = ball(1.0, 0.0);
        b.reset();
        assert_eq!(b.dy, 2.0);
        assert_eq!(b.dx, 2.0);
    }

    #[test]
    fn test_increase_speed_keeps_direction() {
        let mut b = ball(2.0, -2.0);
        b.increase_speed();
        assert!((b.dx - 2.2).abs() < 1e-6);
        assert!((b.dy + 2.2).abs() < 1e-6);
    }

    #[test]
    fn test_increase_speed_is_capped() {
        let mut b = ball(-3.9, 3.9);
        b.increase_speed();
        b.increase_speed();
        assert_eq!(b.dx, -MAX_SPEED);
        assert_eq!(b.dy, MAX_SPEED);
    }

    #[test]
    fn test_bounce_off_top_wall() {
        let mut b = ball(1.0, -2.0);
        b.y = 1.0;
        b.advance();
        assert_eq!(b.y, 0.0);
        assert!(b.dy > 0.0);
        assert!((b.dy - 2.2).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_off_bottom_wall() {
        let mut b = ball(1.0, 2.0);
        b.y = 61.0;
        b.advance();
        assert_eq!(b.y, 62.0);
        assert!(b.dy < 0.0);
    }

    #[test]
    fn test_leaving_court_serves_again() {
        let mut b = ball(-2.0, 2.0);
        b.x = 1.0;
        b.advance();
        assert_eq!((b.x, b.y), (64.0, 32.0));
        assert_eq!(b.dy, -2.0);
        assert_eq!(b.dx, -2.0);
    }

    proptest! {
        #[test]
        fn prop_reset_law(dx in -4.0f32..4.0, dy in -4.0f32..4.0) {
            let mut b = ball(dx, dy);
            b.reset();
            prop_assert_eq!(b.dy.abs(), SERVE_SPEED);
            prop_assert_eq!(b.dx.abs(), SERVE_SPEED);
            if dy > 0.0 {
                prop_assert!(b.dy < 0.0);
            } else {
                prop_assert!(b.dy > 0.0);
            }
            prop_assert_eq!(b.dx > 0.0, b.dy > 0.0);
        }

        #[test]
        fn prop_ball_stays_on_screen(steps in 1usize..500) {
            let mut b = BallMotion::default();
            for _ in 0..steps {
                b.advance();
                prop_assert!(b.x >= 0.0 && b.x <= 126.0);
                prop_assert!(b.y >= 0.0 && b.y <= 62.0);
            }
        }
    }
}

//! Game renderer
//!
//! Draws the court from a state frame, the end-of-match message and the
//! lobby screen. Every draw starts from a blank buffer and ends with a
//! flush, so the panel always shows exactly the latest picture.

use core::convert::Infallible;
use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;
use pongpad_core::config::DisplayGeometry;
use pongpad_core::game::{BallMotion, GameState, Outcome, Side};
use pongpad_core::traits::{DisplayError, GameDisplay};

use crate::backend::DisplayBackend;

/// Score positions (top-left of the text)
const LOCAL_SCORE_POS: Point = Point::new(48, 0);
const REMOTE_SCORE_POS: Point = Point::new(78, 0);

/// Top of the end-of-match message
const OUTCOME_Y: i32 = 20;

/// Lobby text lines
const LOBBY_LINES: [(&str, i32); 2] = [("Waiting for", 16), ("opponent", 28)];

fn fill_rect<D>(target: &mut D, x: i32, y: i32, width: u16, height: u16) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(Point::new(x, y), Size::new(u32::from(width), u32::from(height)))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)
}

fn draw_text<D>(target: &mut D, text: &str, position: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_baseline(text, position, style, Baseline::Top).draw(target)?;
    Ok(())
}

fn draw_centered<D>(target: &mut D, text: &str, width: u16, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let layout = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    let position = Point::new(i32::from(width) / 2, y);
    Text::with_text_style(text, position, style, layout).draw(target)?;
    Ok(())
}

fn draw_score<D>(target: &mut D, score: u8, position: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut text: String<4> = String::new();
    // u8 is at most three digits
    let _ = write!(text, "{}", score);
    draw_text(target, &text, position)
}

/// Draw the court for one state frame
///
/// The local paddle is always on the left of the screen, whichever half of
/// the server's court the local player occupies.
pub fn draw_court<D>(
    target: &mut D,
    geometry: &DisplayGeometry,
    state: &GameState,
    local: Side,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let remote = local.opponent();
    fill_rect(
        target,
        geometry.local_paddle_x(),
        i32::from(state.paddle(local)),
        geometry.paddle_width,
        geometry.paddle_height,
    )?;
    fill_rect(
        target,
        geometry.remote_paddle_x(),
        i32::from(state.paddle(remote)),
        geometry.paddle_width,
        geometry.paddle_height,
    )?;
    fill_rect(
        target,
        state.ball_x as i32,
        state.ball_y as i32,
        geometry.ball_size,
        geometry.ball_size,
    )?;
    draw_score(target, state.score(local), LOCAL_SCORE_POS)?;
    draw_score(target, state.score(remote), REMOTE_SCORE_POS)
}

/// Draw the end-of-match message
pub fn draw_outcome<D>(target: &mut D, geometry: &DisplayGeometry, outcome: Outcome) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_centered(target, outcome.message(), geometry.width, OUTCOME_Y)
}

/// Draw the lobby screen
pub fn draw_lobby<D>(target: &mut D, geometry: &DisplayGeometry, ball: &BallMotion) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    for (line, y) in LOBBY_LINES {
        draw_centered(target, line, geometry.width, y)?;
    }
    fill_rect(
        target,
        ball.x as i32,
        ball.y as i32,
        geometry.ball_size,
        geometry.ball_size,
    )
}

fn infallible(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Renderer for the game screens
pub struct Renderer<B> {
    backend: B,
    geometry: DisplayGeometry,
    local: Side,
}

impl<B: DisplayBackend> Renderer<B> {
    /// Create a renderer drawing onto `backend`
    pub fn new(backend: B, geometry: DisplayGeometry, local: Side) -> Self {
        Self {
            backend,
            geometry,
            local,
        }
    }

    /// Access the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: DisplayBackend> GameDisplay for Renderer<B> {
    async fn show_frame(&mut self, state: &GameState) -> Result<(), DisplayError> {
        let frame = self.backend.frame();
        frame.clear_all();
        infallible(draw_court(frame, &self.geometry, state, self.local));
        self.backend.flush().await
    }

    async fn show_outcome(&mut self, outcome: Outcome) -> Result<(), DisplayError> {
        let frame = self.backend.frame();
        frame.clear_all();
        infallible(draw_outcome(frame, &self.geometry, outcome));
        self.backend.flush().await
    }

    async fn show_lobby(&mut self, ball: &BallMotion) -> Result<(), DisplayError> {
        let frame = self.backend.frame();
        frame.clear_all();
        infallible(draw_lobby(frame, &self.geometry, ball));
        self.backend.flush().await
    }
}

//! Display backend trait
//!
//! Defines the interface between the renderer and a physical panel.

use pongpad_core::traits::DisplayError;

use crate::framebuffer::FrameBuffer;

/// Display backend trait
///
/// A backend owns the frame buffer the renderer draws into and knows how
/// to transfer it to the panel.
#[allow(async_fn_in_trait)]
pub trait DisplayBackend {
    /// Frame buffer to draw into
    fn frame(&mut self) -> &mut FrameBuffer;

    /// Send the frame buffer to the panel
    async fn flush(&mut self) -> Result<(), DisplayError>;
}

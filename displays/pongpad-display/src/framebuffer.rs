//! Monochrome frame buffer
//!
//! One bit per pixel, organized as 8 pages of 8 rows each, which is the
//! memory layout SSD1306/SH1106 controllers expect: byte `pages[p][x]` holds
//! the column `x` of rows `8p..8p+8`, least significant bit on top.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Display width in pixels
pub const WIDTH: usize = 128;
/// Display height in pixels
pub const HEIGHT: usize = 64;
/// Number of 8-row pages
pub const PAGES: usize = HEIGHT / 8;

/// 128x64 1bpp frame buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pages: [[u8; WIDTH]; PAGES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Create a blank frame buffer
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
        }
    }

    /// Turn every pixel off
    pub fn clear_all(&mut self) {
        for page in self.pages.iter_mut() {
            page.fill(0);
        }
    }

    /// Set one pixel; coordinates outside the panel are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let bit = 1u8 << (y % 8);
        if on {
            self.pages[y / 8][x] |= bit;
        } else {
            self.pages[y / 8][x] &= !bit;
        }
    }

    /// Read one pixel; coordinates outside the panel read as off
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        self.pages[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Raw page data, one slice per page
    pub fn pages(&self) -> &[[u8; WIDTH]; PAGES] {
        &self.pages
    }

    /// Number of pixels that are on
    pub fn lit_pixels(&self) -> u32 {
        self.pages
            .iter()
            .flat_map(|page| page.iter())
            .map(|byte| byte.count_ones())
            .sum()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_page_layout() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(3, 0, true);
        fb.set_pixel(3, 9, true);
        fb.set_pixel(127, 63, true);
        assert_eq!(fb.pages()[0][3], 0b0000_0001);
        assert_eq!(fb.pages()[1][3], 0b0000_0010);
        assert_eq!(fb.pages()[7][127], 0b1000_0000);
        assert_eq!(fb.lit_pixels(), 3);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(-1, 0, true);
        fb.set_pixel(0, 64, true);
        fb.set_pixel(128, 10, true);
        assert_eq!(fb.lit_pixels(), 0);
        assert!(!fb.pixel(-1, -1));
    }

    #[test]
    fn test_clear_pixel() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(10, 10, true);
        fb.set_pixel(10, 10, false);
        assert!(!fb.pixel(10, 10));
    }

    #[test]
    fn test_draw_target_fill() {
        let mut fb = FrameBuffer::new();
        Rectangle::new(Point::new(2, 5), Size::new(2, 16))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.lit_pixels(), 32);
        assert!(fb.pixel(2, 5));
        assert!(fb.pixel(3, 20));
        assert!(!fb.pixel(3, 21));
        assert!(!fb.pixel(4, 5));

        fb.clear_all();
        assert_eq!(fb.lit_pixels(), 0);
    }
}

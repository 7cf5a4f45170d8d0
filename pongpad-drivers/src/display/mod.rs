//! Display panel drivers

pub mod ssd1306;

pub use ssd1306::{Ssd1306, SSD1306_ADDR};

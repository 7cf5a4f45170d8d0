//! Network link drivers

pub mod esp_at;

pub use esp_at::{EspAtConfig, EspAtError, EspAtLink};

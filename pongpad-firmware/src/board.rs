//! Board wiring helpers
//!
//! Pin assignments for a Raspberry Pi Pico:
//! - Joystick X axis: ADC0 (GPIO26)
//! - SSD1306 OLED: I2C0, SDA GPIO4, SCL GPIO5, address 0x3C
//! - ESP-AT module: UART0, TX GPIO0, RX GPIO1, 115200 8N1

use embassy_rp::adc::{Adc, Blocking, Channel};
use pongpad_drivers::input::AdcReader;

/// Joystick axis on one RP2040 ADC channel
pub struct RpAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl RpAdc {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for RpAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}

//! Analog joystick axis
//!
//! A two-axis thumb joystick is a pair of potentiometers; only the X axis
//! is wired to the ADC. A failed conversion reads as the centre position so
//! the paddle simply holds still.

use pongpad_core::input::JoystickSample;
use pongpad_core::traits::Joystick;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Joystick axis on one ADC channel
pub struct AnalogJoystick<ADC> {
    adc: ADC,
    /// Highest reading the converter produces
    full_scale: u16,
    /// Failed reads since power-on
    read_errors: u32,
}

impl<ADC> AnalogJoystick<ADC> {
    /// Create a joystick on a 12-bit converter
    pub fn new(adc: ADC) -> Self {
        Self::with_full_scale(adc, 4095)
    }

    /// Create a joystick on a converter with a different range
    pub fn with_full_scale(adc: ADC, full_scale: u16) -> Self {
        Self {
            adc,
            full_scale,
            read_errors: 0,
        }
    }

    /// Number of failed reads so far
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }
}

impl<ADC: AdcReader> Joystick for AnalogJoystick<ADC> {
    fn sample(&mut self) -> JoystickSample {
        match self.adc.read() {
            Ok(raw) => JoystickSample(raw.min(self.full_scale)),
            Err(()) => {
                self.read_errors = self.read_errors.saturating_add(1);
                JoystickSample::neutral(self.full_scale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyAdc(Result<u16, ()>);

    impl AdcReader for DummyAdc {
        fn read(&mut self) -> Result<u16, ()> {
            self.0
        }
    }

    #[test]
    fn test_passes_reading_through() {
        let mut joystick = AnalogJoystick::new(DummyAdc(Ok(1234)));
        assert_eq!(joystick.sample(), JoystickSample(1234));
        assert_eq!(joystick.read_errors(), 0);
    }

    #[test]
    fn test_clamps_to_full_scale() {
        let mut joystick = AnalogJoystick::new(DummyAdc(Ok(5000)));
        assert_eq!(joystick.sample(), JoystickSample(4095));
    }

    #[test]
    fn test_read_error_is_neutral() {
        let mut joystick = AnalogJoystick::new(DummyAdc(Err(())));
        assert_eq!(joystick.sample(), JoystickSample(2047));
        assert_eq!(joystick.sample(), JoystickSample(2047));
        assert_eq!(joystick.read_errors(), 2);
    }

    #[test]
    fn test_ten_bit_converter() {
        let mut joystick = AnalogJoystick::with_full_scale(DummyAdc(Err(())), 1023);
        assert_eq!(joystick.sample(), JoystickSample(511));
    }
}

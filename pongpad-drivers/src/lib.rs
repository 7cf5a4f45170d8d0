//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pongpad-core and pongpad-display:
//!
//! - Analog joystick on any 12-bit ADC channel
//! - SSD1306 128x64 OLED panel over async I2C
//! - ESP-AT Wi-Fi co-processor as a TCP link over async UART

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod input;
pub mod link;

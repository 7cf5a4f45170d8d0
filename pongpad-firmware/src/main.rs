//! Pongpad - Networked Paddle Controller Firmware
//!
//! Main firmware binary for RP2040-based boards. Reads a joystick, plays
//! one paddle of a two-player game hosted on a TCP game server reached
//! through an ESP-AT Wi-Fi module, and draws the court on an SSD1306 OLED.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pongpad_display::Renderer;
use pongpad_drivers::display::Ssd1306;
use pongpad_drivers::input::AnalogJoystick;
use pongpad_drivers::link::{EspAtConfig, EspAtLink};

use crate::board::RpAdc;

mod board;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pongpad firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Joystick X axis on ADC0 (GPIO26)
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let x_axis = Channel::new_pin(p.PIN_26, Pull::None);
    let joystick = AnalogJoystick::new(RpAdc::new(adc, x_axis));

    // OLED on I2C0 (SDA GPIO4, SCL GPIO5)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let mut oled = Ssd1306::new(i2c);
    match oled.init().await {
        Ok(()) => info!("OLED initialized"),
        // The session still runs without a screen
        Err(e) => warn!("OLED init failed: {:?}", e),
    }
    let display = Renderer::new(oled, config::geometry(), config::LOCAL_SIDE);

    // ESP-AT module on UART0 (TX GPIO0, RX GPIO1)
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let link = EspAtLink::new(uart, Delay, EspAtConfig::default());

    info!("UART initialized for ESP-AT link");

    // Spawn tasks
    spawner
        .spawn(tasks::session_task(joystick, link, display))
        .unwrap();

    info!("Session task spawned, firmware running");

    // Main task has nothing else to do
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

//! Game session task
//!
//! Runs one session from connect to the end of the match and logs its
//! progress. Faults inside the loop are logged and retried by the session;
//! only fatal errors end the task early.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::uart::BufferedUart;
use embassy_time::Delay;

use pongpad_core::game::Outcome;
use pongpad_core::session::{Iteration, Session, SessionObserver};
use pongpad_core::traits::DisplayError;
use pongpad_display::Renderer;
use pongpad_drivers::display::Ssd1306;
use pongpad_drivers::input::AnalogJoystick;
use pongpad_drivers::link::EspAtLink;

use crate::board::RpAdc;
use crate::config;

pub type ControllerJoystick = AnalogJoystick<RpAdc>;
pub type ControllerLink = EspAtLink<BufferedUart, Delay>;
pub type ControllerDisplay = Renderer<Ssd1306<I2c<'static, I2C0, Async>>>;

/// Logs session progress over defmt
struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_connected(&mut self) {
        info!(
            "Connected to {}:{}",
            config::SERVER_HOST,
            config::SERVER_PORT
        );
    }

    fn on_lobby_tick(&mut self, waited_ms: u32, display: Result<(), DisplayError>) {
        trace!("Waiting for opponent ({} ms)", waited_ms);
        if let Err(e) = display {
            warn!("Lobby draw failed: {:?}", e);
        }
    }

    fn on_joined(&mut self, status: &str) {
        info!("Joined as {}: {}", config::PLAYER_NAME, status);
    }

    fn on_iteration(&mut self, iteration: &Iteration) {
        trace!("Paddle y={}", iteration.paddle_y);
        if let Err(fault) = iteration.frame {
            warn!("Frame fault: {:?} (link {:?})", fault, iteration.link);
        }
        if let Err(e) = iteration.display {
            warn!("Display flush failed: {:?}", e);
        }
        if let Err(e) = iteration.send {
            warn!("Paddle update failed: {:?} (link {:?})", e, iteration.link);
        }
    }

    fn on_finished(&mut self, outcome: Outcome, display: Result<(), DisplayError>) {
        info!("Match over: {:?}", outcome);
        if let Err(e) = display {
            warn!("Outcome draw failed: {:?}", e);
        }
    }
}

/// Session task - connects, joins and plays one match
#[embassy_executor::task]
pub async fn session_task(
    joystick: ControllerJoystick,
    link: ControllerLink,
    display: ControllerDisplay,
) {
    info!("Session task started");

    let mut session = Session::new(
        joystick,
        link,
        display,
        config::endpoint(),
        config::session(),
        config::input_tuning(),
        config::geometry(),
    );

    match session.run(&mut LogObserver).await {
        Ok(outcome) => info!("Session finished: {:?}", outcome),
        Err(e) => error!("Session aborted: {:?} (state {:?})", e, session.state()),
    }
}

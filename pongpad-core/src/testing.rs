//! Test doubles shared by the core test modules

use std::collections::VecDeque;

use crate::config::Endpoint;
use crate::game::{BallMotion, GameState, Outcome};
use crate::input::JoystickSample;
use crate::traits::{DisplayError, GameDisplay, Joystick, Link, LinkError};

/// Scripted link: reads pop from `rx`, an empty script times out
#[derive(Default)]
pub struct MockLink {
    pub rx: VecDeque<Result<Vec<u8>, LinkError>>,
    pub sent: Vec<Vec<u8>>,
    pub fail_connect: bool,
    pub fail_send: bool,
    pub connect_calls: usize,
    pub recv_calls: usize,
    pub close_calls: usize,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rx(&mut self, bytes: &[u8]) {
        self.rx.push_back(Ok(bytes.to_vec()));
    }

    pub fn push_err(&mut self, err: LinkError) {
        self.rx.push_back(Err(err));
    }

    /// Number of I/O operations seen after connecting
    pub fn io_calls(&self) -> usize {
        self.sent.len() + self.recv_calls + self.close_calls
    }
}

impl Link for MockLink {
    async fn connect(&mut self, _endpoint: &Endpoint) -> Result<(), LinkError> {
        self.connect_calls += 1;
        if self.fail_connect {
            Err(LinkError::ConnectFailed)
        } else {
            Ok(())
        }
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        if self.fail_send {
            return Err(LinkError::Io);
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    async fn recv(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize, LinkError> {
        self.recv_calls += 1;
        match self.rx.pop_front() {
            Some(Ok(mut bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    // Keep the remainder for the next read
                    self.rx.push_front(Ok(bytes.split_off(n)));
                }
                Ok(n)
            }
            Some(Err(e)) => Err(e),
            None => Err(LinkError::Timeout),
        }
    }

    async fn close(&mut self) -> Result<(), LinkError> {
        self.close_calls += 1;
        Ok(())
    }
}

/// Joystick that replays a list of readings, then holds the last one
pub struct MockJoystick {
    pub readings: VecDeque<u16>,
    pub last: u16,
    pub samples: usize,
}

impl MockJoystick {
    pub fn new(readings: &[u16]) -> Self {
        Self {
            readings: readings.iter().copied().collect(),
            last: 2048,
            samples: 0,
        }
    }
}

impl Joystick for MockJoystick {
    fn sample(&mut self) -> JoystickSample {
        self.samples += 1;
        if let Some(raw) = self.readings.pop_front() {
            self.last = raw;
        }
        JoystickSample(self.last)
    }
}

/// What the mock display was asked to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drawn {
    Frame(GameState),
    Outcome(Outcome),
    Lobby,
}

/// Display that records every draw call
#[derive(Default)]
pub struct MockDisplay {
    pub drawn: Vec<Drawn>,
    pub fail: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, drawn: Drawn) -> Result<(), DisplayError> {
        self.drawn.push(drawn);
        if self.fail {
            Err(DisplayError::Bus)
        } else {
            Ok(())
        }
    }

    pub fn frames(&self) -> usize {
        self.drawn
            .iter()
            .filter(|d| matches!(d, Drawn::Frame(_)))
            .count()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.drawn
            .iter()
            .filter_map(|d| match d {
                Drawn::Outcome(o) => Some(*o),
                _ => None,
            })
            .collect()
    }
}

impl GameDisplay for MockDisplay {
    async fn show_frame(&mut self, state: &GameState) -> Result<(), DisplayError> {
        self.record(Drawn::Frame(*state))
    }

    async fn show_outcome(&mut self, outcome: Outcome) -> Result<(), DisplayError> {
        self.record(Drawn::Outcome(outcome))
    }

    async fn show_lobby(&mut self, _ball: &BallMotion) -> Result<(), DisplayError> {
        self.record(Drawn::Lobby)
    }
}

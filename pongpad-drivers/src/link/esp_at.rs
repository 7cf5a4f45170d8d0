//! ESP-AT Wi-Fi co-processor link
//!
//! An ESP8266/ESP32 running Espressif's AT firmware acts as a TCP modem on
//! a UART (115200 8N1). The module is expected to be associated with the
//! access point already.
//!
//! # Command Sequence
//!
//! ```text
//! AT+CIPSTART="TCP","<host>",<port>   -> CONNECT / OK
//! AT+CIPMODE=1                        -> OK        (transparent mode)
//! AT+CIPSEND                          -> OK, '>'   (pass-through begins)
//! ... raw stream bytes in both directions ...
//! +++                                 (guard time before and after)
//! AT+CIPCLOSE                         -> OK / ERROR
//! ```
//!
//! In pass-through mode every byte written to the UART goes to the server
//! and every byte from the server comes back on the UART, so `send` and
//! `recv` are plain UART transfers.

use core::fmt::Write as _;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use embedded_io_async::{Read, Write};
use heapless::{String, Vec};
use pongpad_core::config::Endpoint;
use pongpad_core::traits::{Link, LinkError};

/// Longest AT command line
const MAX_COMMAND_LEN: usize = 96;

/// Reply bytes kept while waiting for a final result code
const REPLY_BUFFER_SIZE: usize = 128;

/// Errors from the AT command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EspAtError {
    /// No final result code in time
    Timeout,
    /// Module answered ERROR or FAIL
    Rejected,
    /// Command line did not fit the buffer
    CommandTooLong,
    /// UART failure
    Io,
}

/// ESP-AT timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EspAtConfig {
    /// Wait for the TCP connection to open
    pub connect_timeout_ms: u32,
    /// Wait for simple commands
    pub command_timeout_ms: u32,
    /// Silence required around the `+++` escape
    pub escape_guard_ms: u32,
}

impl Default for EspAtConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            command_timeout_ms: 2_000,
            escape_guard_ms: 1_000,
        }
    }
}

/// Final result of an AT command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Ok,
    Prompt,
    Error,
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Look for a final result code in the reply collected so far
fn classify(reply: &[u8], want_prompt: bool) -> Option<Reply> {
    if contains(reply, b"ERROR") || contains(reply, b"FAIL") {
        Some(Reply::Error)
    } else if want_prompt && reply.contains(&b'>') {
        Some(Reply::Prompt)
    } else if contains(reply, b"OK\r\n") || contains(reply, b"ALREADY CONNECTED") {
        Some(Reply::Ok)
    } else {
        None
    }
}

/// Read until a final result code arrives
async fn read_reply<IO: Read>(io: &mut IO, want_prompt: bool) -> Result<Reply, EspAtError> {
    let mut reply: Vec<u8, REPLY_BUFFER_SIZE> = Vec::new();
    let mut chunk = [0u8; 32];
    loop {
        let n = io.read(&mut chunk).await.map_err(|_| EspAtError::Io)?;
        if n == 0 {
            return Err(EspAtError::Io);
        }
        for &byte in &chunk[..n] {
            if reply.is_full() {
                // Keep the tail, where the result code will be
                reply.remove(0);
            }
            let _ = reply.push(byte);
        }
        if let Some(result) = classify(&reply, want_prompt) {
            return Ok(result);
        }
    }
}

/// TCP link through an ESP-AT module
pub struct EspAtLink<IO, D> {
    io: IO,
    delay: D,
    config: EspAtConfig,
    /// Module is in pass-through mode
    passthrough: bool,
}

impl<IO: Read + Write, D: DelayNs> EspAtLink<IO, D> {
    /// Create a link over a UART and a delay source
    pub fn new(io: IO, delay: D, config: EspAtConfig) -> Self {
        Self {
            io,
            delay,
            config,
            passthrough: false,
        }
    }

    /// Check if the module is in pass-through mode
    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    /// Release the UART and delay
    pub fn release(self) -> (IO, D) {
        (self.io, self.delay)
    }

    /// Send one command line and wait for its final result code
    pub async fn command(&mut self, line: &str, timeout_ms: u32) -> Result<(), EspAtError> {
        self.command_with(line, timeout_ms, false).await
    }

    async fn command_with(
        &mut self,
        line: &str,
        timeout_ms: u32,
        want_prompt: bool,
    ) -> Result<(), EspAtError> {
        self.io
            .write_all(line.as_bytes())
            .await
            .map_err(|_| EspAtError::Io)?;
        self.io.write_all(b"\r\n").await.map_err(|_| EspAtError::Io)?;
        self.io.flush().await.map_err(|_| EspAtError::Io)?;

        match select(
            read_reply(&mut self.io, want_prompt),
            self.delay.delay_ms(timeout_ms),
        )
        .await
        {
            Either::First(Ok(Reply::Error)) => Err(EspAtError::Rejected),
            Either::First(Ok(_)) => Ok(()),
            Either::First(Err(e)) => Err(e),
            Either::Second(()) => Err(EspAtError::Timeout),
        }
    }

    /// Open the TCP connection and enter pass-through mode
    pub async fn open(&mut self, endpoint: &Endpoint) -> Result<(), EspAtError> {
        let mut line: String<MAX_COMMAND_LEN> = String::new();
        write!(
            line,
            "AT+CIPSTART=\"TCP\",\"{}\",{}",
            endpoint.host, endpoint.port
        )
        .map_err(|_| EspAtError::CommandTooLong)?;

        let command_timeout = self.config.command_timeout_ms;
        self.command(&line, self.config.connect_timeout_ms).await?;
        self.command("AT+CIPMODE=1", command_timeout).await?;
        self.command_with("AT+CIPSEND", command_timeout, true).await?;
        self.passthrough = true;
        Ok(())
    }

    /// Leave pass-through mode and close the TCP connection
    pub async fn shutdown(&mut self) -> Result<(), EspAtError> {
        if self.passthrough {
            let guard = self.config.escape_guard_ms;
            self.delay.delay_ms(guard).await;
            self.io.write_all(b"+++").await.map_err(|_| EspAtError::Io)?;
            self.io.flush().await.map_err(|_| EspAtError::Io)?;
            self.delay.delay_ms(guard).await;
            self.passthrough = false;
        }

        let command_timeout = self.config.command_timeout_ms;
        self.command("AT+CIPMODE=0", command_timeout).await?;
        match self.command("AT+CIPCLOSE", command_timeout).await {
            // ERROR here means the server already closed the connection
            Ok(()) | Err(EspAtError::Rejected) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl<IO: Read + Write, D: DelayNs> Link for EspAtLink<IO, D> {
    async fn connect(&mut self, endpoint: &Endpoint) -> Result<(), LinkError> {
        self.open(endpoint)
            .await
            .map_err(|_| LinkError::ConnectFailed)
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        if !self.passthrough {
            return Err(LinkError::Closed);
        }
        self.io.write_all(bytes).await.map_err(|_| LinkError::Io)?;
        self.io.flush().await.map_err(|_| LinkError::Io)
    }

    async fn recv(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, LinkError> {
        if !self.passthrough {
            return Err(LinkError::Closed);
        }
        match select(self.io.read(buf), self.delay.delay_ms(timeout_ms)).await {
            Either::First(Ok(0)) => Err(LinkError::Closed),
            Either::First(Ok(n)) => Ok(n),
            Either::First(Err(_)) => Err(LinkError::Io),
            Either::Second(()) => Err(LinkError::Timeout),
        }
    }

    async fn close(&mut self) -> Result<(), LinkError> {
        self.shutdown().await.map_err(|_| LinkError::Io)
    }
}

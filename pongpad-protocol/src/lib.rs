//! Pongpad Game Server Protocol
//!
//! This crate defines the JSON messages exchanged between the paddle
//! controller and the game server over a single persistent TCP stream.
//!
//! # Protocol Overview
//!
//! Every message is one compact JSON object. The server writes objects
//! back-to-back with no delimiter or length prefix, so the receiving side
//! runs a [`FrameParser`] that splits the byte stream on top-level object
//! boundaries.
//!
//! ```text
//! controller                                   server
//!     │ {"event":"player:join","data":{...}}      │
//!     │ ────────────────────────────────────────► │
//!     │                  {"status":"game is ready"}│
//!     │ ◄──────────────────────────────────────── │
//!     │     {"leftPaddle":..,"ball":{..},...}      │
//!     │ ◄──────────────────────────────────────── │
//!     │ {"event":"game:paddle","data":{...}}      │
//!     │ ────────────────────────────────────────► │
//!     │                    ... one frame per tick │
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, MAX_MESSAGE_SIZE};
pub use messages::{
    BallPosition, ClientMessage, JoinAck, ProtocolError, ServerMessage, StateFrame,
    WinnerNotice, MAX_OUTBOUND_SIZE,
};

//! Message types for the game server protocol
//!
//! Message types are divided into two categories:
//! - Controller → Server: join request, paddle updates (event envelopes)
//! - Server → Controller: join acknowledgement, state frames, winner notice

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Event name of the join request
pub const EVENT_JOIN: &str = "player:join";
/// Event name of the paddle update
pub const EVENT_PADDLE: &str = "game:paddle";

/// Largest encoded outbound message
pub const MAX_OUTBOUND_SIZE: usize = 128;

/// Errors from encoding or decoding messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Output buffer too small for the encoded message
    BufferTooSmall,
    /// Message is not valid JSON or lacks a required field
    Malformed,
}

#[derive(Serialize)]
struct Envelope<'a, D> {
    event: &'a str,
    data: D,
}

#[derive(Serialize)]
struct JoinData<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaddleData<'a> {
    y: i16,
    player_name: &'a str,
}

/// Messages from the controller to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClientMessage<'a> {
    /// Register the local player with the server
    Join { name: &'a str },
    /// Report the desired paddle position
    Paddle { y: i16, player_name: &'a str },
}

impl<'a> ClientMessage<'a> {
    /// Event name carried in the envelope
    pub fn event(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => EVENT_JOIN,
            ClientMessage::Paddle { .. } => EVENT_PADDLE,
        }
    }

    /// Encode this message into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        let result = match *self {
            ClientMessage::Join { name } => serde_json_core::to_slice(
                &Envelope {
                    event: EVENT_JOIN,
                    data: JoinData { name },
                },
                buffer,
            ),
            ClientMessage::Paddle { y, player_name } => serde_json_core::to_slice(
                &Envelope {
                    event: EVENT_PADDLE,
                    data: PaddleData { y, player_name },
                },
                buffer,
            ),
        };
        result.map_err(|_| ProtocolError::BufferTooSmall)
    }

    /// Encode this message into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_OUTBOUND_SIZE>, ProtocolError> {
        let mut buffer = [0u8; MAX_OUTBOUND_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| ProtocolError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Join acknowledgement; any status value admits the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoinAck<'a> {
    pub status: &'a str,
}

/// Ball position as sent by the server
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BallPosition {
    pub x: f32,
    pub y: f32,
}

/// Authoritative game snapshot, broadcast once per server tick
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "camelCase")]
pub struct StateFrame {
    pub left_paddle: i16,
    pub right_paddle: i16,
    pub ball: BallPosition,
    pub left_score: u8,
    pub right_score: u8,
}

/// Sent by the server after the final state frame of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "camelCase")]
pub struct WinnerNotice<'a> {
    pub winner: &'a str,
    #[serde(default, borrow)]
    pub winner_name: Option<&'a str>,
}

fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, ProtocolError> {
    serde_json_core::from_slice::<T>(bytes)
        .map(|(value, _consumed)| value)
        .map_err(|_| ProtocolError::Malformed)
}

impl<'a> JoinAck<'a> {
    /// Parse a join acknowledgement
    pub fn decode(bytes: &'a [u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

impl StateFrame {
    /// Parse a state frame; every field is required
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

impl<'a> WinnerNotice<'a> {
    /// Parse a winner notice
    pub fn decode(bytes: &'a [u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

/// Any message the server may send
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServerMessage<'a> {
    /// Join acknowledgement / lobby status
    Status(JoinAck<'a>),
    /// Game state snapshot
    State(StateFrame),
    /// End of match
    Winner(WinnerNotice<'a>),
}

impl<'a> ServerMessage<'a> {
    /// Classify and parse one framed message
    ///
    /// The shapes are disjoint in their required fields, so trying each in
    /// turn is unambiguous.
    pub fn decode(bytes: &'a [u8]) -> Result<Self, ProtocolError> {
        if let Ok(frame) = StateFrame::decode(bytes) {
            return Ok(ServerMessage::State(frame));
        }
        if let Ok(notice) = WinnerNotice::decode(bytes) {
            return Ok(ServerMessage::Winner(notice));
        }
        JoinAck::decode(bytes).map(ServerMessage::Status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_encoding() {
        let msg = ClientMessage::Join {
            name: "esp32-playerTwo",
        };
        let encoded = msg.encode_to_vec().unwrap();
        assert_eq!(
            &encoded[..],
            br#"{"event":"player:join","data":{"name":"esp32-playerTwo"}}"#
        );
        assert_eq!(msg.event(), EVENT_JOIN);
    }

    #[test]
    fn test_paddle_encoding() {
        let msg = ClientMessage::Paddle {
            y: 48,
            player_name: "esp32-playerTwo",
        };
        let encoded = msg.encode_to_vec().unwrap();
        assert_eq!(
            &encoded[..],
            br#"{"event":"game:paddle","data":{"y":48,"playerName":"esp32-playerTwo"}}"#
        );
        assert_eq!(msg.event(), EVENT_PADDLE);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let msg = ClientMessage::Paddle {
            y: 0,
            player_name: "p",
        };
        let mut buffer = [0u8; 8];
        assert_eq!(msg.encode(&mut buffer), Err(ProtocolError::BufferTooSmall));
    }

    #[test]
    fn test_state_frame_decoding() {
        let bytes = br#"{"leftPaddle":24,"rightPaddle":30,"ball":{"x":64,"y":31.5},"leftScore":3,"rightScore":7}"#;
        let frame = StateFrame::decode(bytes).unwrap();
        assert_eq!(frame.left_paddle, 24);
        assert_eq!(frame.right_paddle, 30);
        assert_eq!(frame.ball.x, 64.0);
        assert_eq!(frame.ball.y, 31.5);
        assert_eq!(frame.left_score, 3);
        assert_eq!(frame.right_score, 7);
    }

    #[test]
    fn test_state_frame_missing_field() {
        let bytes = br#"{"leftPaddle":24,"rightPaddle":30,"ball":{"x":64,"y":32},"leftScore":3}"#;
        assert_eq!(StateFrame::decode(bytes), Err(ProtocolError::Malformed));
    }

    #[test]
    fn test_state_frame_garbage() {
        assert_eq!(StateFrame::decode(b"{\"leftPad"), Err(ProtocolError::Malformed));
        assert_eq!(StateFrame::decode(b""), Err(ProtocolError::Malformed));
    }

    #[test]
    fn test_join_ack_any_status() {
        let ack = JoinAck::decode(br#"{"status":"game is ready"}"#).unwrap();
        assert_eq!(ack.status, "game is ready");

        let ack = JoinAck::decode(br#"{"status":""}"#).unwrap();
        assert_eq!(ack.status, "");

        assert_eq!(
            JoinAck::decode(br#"{"state":"ok"}"#),
            Err(ProtocolError::Malformed)
        );
    }

    #[test]
    fn test_server_message_classification() {
        let status = ServerMessage::decode(br#"{"status":"ok"}"#).unwrap();
        assert!(matches!(status, ServerMessage::Status(JoinAck { status: "ok" })));

        let state = ServerMessage::decode(
            br#"{"leftPaddle":0,"rightPaddle":48,"ball":{"x":1,"y":2},"leftScore":0,"rightScore":10}"#,
        )
        .unwrap();
        assert!(matches!(state, ServerMessage::State(f) if f.right_score == 10));

        let winner =
            ServerMessage::decode(br#"{"winner":"pongpad","winnerName":"pongpad"}"#).unwrap();
        assert!(matches!(
            winner,
            ServerMessage::Winner(WinnerNotice {
                winner: "pongpad",
                winner_name: Some("pongpad")
            })
        ));

        assert_eq!(
            ServerMessage::decode(b"not json"),
            Err(ProtocolError::Malformed)
        );
    }
}

//! Protocol client
//!
//! Wraps a [`Link`] with the game protocol: join handshake, state frame
//! receive and paddle update send. The client owns the connection and
//! closes it at most once.

use heapless::String;
use pongpad_protocol::{ClientMessage, FrameError, ProtocolError, ServerMessage};

use super::inbound::InboundStream;
use crate::config::Endpoint;
use crate::game::{GameState, Outcome};
use crate::traits::{Link, LinkError};

/// Longest join status text kept
pub const MAX_STATUS_LEN: usize = 32;

/// Status text from the join acknowledgement, truncated to fit
pub type JoinStatus = String<MAX_STATUS_LEN>;

/// Reasons a single inbound message could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameFault {
    /// Nothing arrived within the frame timeout
    Timeout,
    /// Transport failure
    Link(LinkError),
    /// Stream could not be split into messages
    Framing(FrameError),
    /// Message was not valid JSON or lacked a required field
    Malformed,
    /// Well-formed message of the wrong kind for the current phase
    Unexpected,
}

impl From<ProtocolError> for FrameFault {
    fn from(_: ProtocolError) -> Self {
        FrameFault::Malformed
    }
}

/// Useful message received while playing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServerUpdate {
    /// New authoritative snapshot
    State(GameState),
    /// Server declared a winner
    Winner(Outcome),
}

fn truncated(text: &str) -> JoinStatus {
    let mut status = JoinStatus::new();
    for c in text.chars() {
        if status.push(c).is_err() {
            break;
        }
    }
    status
}

/// Game protocol over one link
pub struct NetClient<L: Link> {
    link: L,
    inbound: InboundStream,
    player_name: &'static str,
    open: bool,
}

impl<L: Link> NetClient<L> {
    /// Create a client that will identify itself as `player_name`
    pub fn new(link: L, player_name: &'static str) -> Self {
        Self {
            link,
            inbound: InboundStream::new(),
            player_name,
            open: false,
        }
    }

    /// Check if the connection is open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Access the underlying link
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutable access to the underlying link
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Open the connection to the server
    pub async fn connect(&mut self, endpoint: &Endpoint) -> Result<(), LinkError> {
        self.inbound.clear();
        self.link.connect(endpoint).await?;
        self.open = true;
        Ok(())
    }

    async fn send_message(&mut self, msg: ClientMessage<'_>) -> Result<(), LinkError> {
        if !self.open {
            return Err(LinkError::Closed);
        }
        // Names are bounded by config validation, so this only fails on misuse
        let bytes = msg.encode_to_vec().map_err(|_| LinkError::Io)?;
        self.link.send(&bytes).await
    }

    /// Send the join request
    pub async fn send_join(&mut self) -> Result<(), LinkError> {
        let name = self.player_name;
        self.send_message(ClientMessage::Join { name }).await
    }

    /// Send a paddle update
    pub async fn send_paddle(&mut self, y: i16) -> Result<(), LinkError> {
        let player_name = self.player_name;
        self.send_message(ClientMessage::Paddle { y, player_name })
            .await
    }

    /// Wait at most `timeout_ms` for the join acknowledgement
    ///
    /// Any `status` value admits the player. A message of another kind is
    /// [`FrameFault::Unexpected`].
    pub async fn poll_join_ack(&mut self, timeout_ms: u32) -> Result<JoinStatus, FrameFault> {
        if !self.open {
            return Err(FrameFault::Link(LinkError::Closed));
        }
        let frame = self.inbound.next_frame(&mut self.link, timeout_ms).await?;
        match ServerMessage::decode(frame.as_bytes())? {
            ServerMessage::Status(ack) => Ok(truncated(ack.status)),
            _ => Err(FrameFault::Unexpected),
        }
    }

    /// Wait at most `timeout_ms` for exactly one message while playing
    pub async fn receive_update(&mut self, timeout_ms: u32) -> Result<ServerUpdate, FrameFault> {
        if !self.open {
            return Err(FrameFault::Link(LinkError::Closed));
        }
        let frame = self.inbound.next_frame(&mut self.link, timeout_ms).await?;
        match ServerMessage::decode(frame.as_bytes())? {
            ServerMessage::State(state) => Ok(ServerUpdate::State(GameState::from(state))),
            ServerMessage::Winner(notice) => {
                let winner = notice.winner_name.unwrap_or(notice.winner);
                let outcome = if winner == self.player_name || notice.winner == self.player_name {
                    Outcome::Won
                } else {
                    Outcome::Lost
                };
                Ok(ServerUpdate::Winner(outcome))
            }
            ServerMessage::Status(_) => Err(FrameFault::Unexpected),
        }
    }

    /// Close the connection
    ///
    /// Only the first call reaches the link; later calls return `Ok(false)`.
    pub async fn close(&mut self) -> Result<bool, LinkError> {
        if !self.open {
            return Ok(false);
        }
        self.open = false;
        self.inbound.clear();
        self.link.close().await.map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLink;
    use embassy_futures::block_on;

    const FRAME: &[u8] =
        br#"{"leftPaddle":24,"rightPaddle":30,"ball":{"x":64,"y":32},"leftScore":1,"rightScore":2}"#;

    fn client(link: MockLink) -> NetClient<MockLink> {
        let mut client = NetClient::new(link, "esp32-playerTwo");
        block_on(client.connect(&Endpoint::default())).unwrap();
        client
    }

    #[test]
    fn test_connect_failure() {
        let mut link = MockLink::new();
        link.fail_connect = true;
        let mut client = NetClient::new(link, "p");
        assert_eq!(
            block_on(client.connect(&Endpoint::default())),
            Err(LinkError::ConnectFailed)
        );
        assert!(!client.is_open());
        assert_eq!(block_on(client.send_join()), Err(LinkError::Closed));
    }

    #[test]
    fn test_join_bytes() {
        let mut client = client(MockLink::new());
        block_on(client.send_join()).unwrap();
        assert_eq!(
            client.link().sent[0],
            br#"{"event":"player:join","data":{"name":"esp32-playerTwo"}}"#.to_vec()
        );
    }

    #[test]
    fn test_paddle_bytes() {
        let mut client = client(MockLink::new());
        block_on(client.send_paddle(17)).unwrap();
        assert_eq!(
            client.link().sent[0],
            br#"{"event":"game:paddle","data":{"y":17,"playerName":"esp32-playerTwo"}}"#.to_vec()
        );
    }

    #[test]
    fn test_join_ack_any_status() {
        let mut link = MockLink::new();
        link.push_rx(br#"{"status":"game is ready"}"#);
        let mut client = client(link);
        let status = block_on(client.poll_join_ack(250)).unwrap();
        assert_eq!(status.as_str(), "game is ready");
    }

    #[test]
    fn test_join_ack_timeout() {
        let mut client = client(MockLink::new());
        assert_eq!(block_on(client.poll_join_ack(250)), Err(FrameFault::Timeout));
    }

    #[test]
    fn test_join_ack_garbage() {
        let mut link = MockLink::new();
        link.push_rx(br#"{"nope":1}"#);
        let mut client = client(link);
        assert_eq!(block_on(client.poll_join_ack(250)), Err(FrameFault::Malformed));
    }

    #[test]
    fn test_long_status_is_truncated() {
        let mut link = MockLink::new();
        link.push_rx(br#"{"status":"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"}"#);
        let mut client = client(link);
        let status = block_on(client.poll_join_ack(250)).unwrap();
        assert_eq!(status.len(), MAX_STATUS_LEN);
    }

    #[test]
    fn test_receive_state() {
        let mut link = MockLink::new();
        link.push_rx(FRAME);
        let mut client = client(link);
        let update = block_on(client.receive_update(2000)).unwrap();
        match update {
            ServerUpdate::State(state) => {
                assert_eq!(state.left_paddle, 24);
                assert_eq!(state.right_score, 2);
            }
            other => panic!("unexpected update {:?}", other),
        }
    }

    #[test]
    fn test_one_message_per_receive() {
        let mut link = MockLink::new();
        let mut both = FRAME.to_vec();
        both.extend_from_slice(br#"{"winner":"esp32-playerTwo"}"#);
        link.push_rx(&both);
        let mut client = client(link);

        assert!(matches!(
            block_on(client.receive_update(2000)),
            Ok(ServerUpdate::State(_))
        ));
        assert_eq!(
            block_on(client.receive_update(2000)),
            Ok(ServerUpdate::Winner(Outcome::Won))
        );
        assert_eq!(client.link().recv_calls, 1);
    }

    #[test]
    fn test_frame_split_across_reads() {
        let mut link = MockLink::new();
        link.push_rx(&FRAME[..20]);
        link.push_rx(&FRAME[20..]);
        let mut client = client(link);
        assert!(matches!(
            block_on(client.receive_update(2000)),
            Ok(ServerUpdate::State(_))
        ));
    }

    #[test]
    fn test_winner_is_someone_else() {
        let mut link = MockLink::new();
        link.push_rx(br#"{"winner":"other","winnerName":"other"}"#);
        let mut client = client(link);
        assert_eq!(
            block_on(client.receive_update(2000)),
            Ok(ServerUpdate::Winner(Outcome::Lost))
        );
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let mut link = MockLink::new();
        link.push_rx(br#"{"leftPaddle":24,"rightPaddle":30,"ball":{"x":64,"y":32},"leftScore":1}"#);
        let mut client = client(link);
        assert_eq!(block_on(client.receive_update(2000)), Err(FrameFault::Malformed));
    }

    #[test]
    fn test_status_while_playing_is_unexpected() {
        let mut link = MockLink::new();
        link.push_rx(br#"{"status":"game is ready"}"#);
        let mut client = client(link);
        assert_eq!(block_on(client.receive_update(2000)), Err(FrameFault::Unexpected));
    }

    #[test]
    fn test_transport_error() {
        let mut link = MockLink::new();
        link.push_err(LinkError::Io);
        let mut client = client(link);
        assert_eq!(
            block_on(client.receive_update(2000)),
            Err(FrameFault::Link(LinkError::Io))
        );
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut client = client(MockLink::new());
        assert_eq!(block_on(client.close()), Ok(true));
        assert_eq!(block_on(client.close()), Ok(false));
        assert_eq!(client.link().close_calls, 1);
        assert_eq!(block_on(client.send_paddle(1)), Err(LinkError::Closed));
        assert_eq!(
            block_on(client.receive_update(10)),
            Err(FrameFault::Link(LinkError::Closed))
        );
        assert_eq!(client.link().recv_calls, 0);
    }
}

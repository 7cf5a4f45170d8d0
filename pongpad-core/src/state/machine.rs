//! State machine definition

use super::events::SessionEvent;
use crate::game::Outcome;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Opening the transport to the server
    #[default]
    Connecting,
    /// Join request sent, waiting for the server to admit us
    AwaitingJoinAck,
    /// Exchanging state frames and paddle updates
    Playing,
    /// Match finished; connection closed
    GameOver(Outcome),
    /// Fatal failure; connection closed
    Aborted(AbortReason),
}

/// Reasons a session can abort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbortReason {
    /// Transport could not be opened
    ConnectFailed,
    /// Join request failed or the acknowledgement was unreadable
    JoinFailed,
    /// No acknowledgement within the join timeout
    JoinTimeout,
    /// Too many consecutive inbound faults
    LinkLost,
}

impl SessionState {
    /// Process an event and return the next state
    pub fn transition(self, event: SessionEvent) -> Self {
        use SessionEvent::*;
        use SessionState::*;

        match (self, event) {
            (Connecting, Connected) => AwaitingJoinAck,
            (AwaitingJoinAck, JoinAcknowledged) => Playing,
            (Playing, MatchDecided(outcome)) => GameOver(outcome),

            // Any live state can fail; terminal states are final
            (Connecting | AwaitingJoinAck | Playing, Fatal(reason)) => Aborted(reason),

            // Default: stay in current state
            _ => self,
        }
    }
}

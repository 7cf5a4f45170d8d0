//! Session events

use super::machine::AbortReason;
use crate::game::Outcome;

/// Events that drive session state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// Transport to the server is open
    Connected,
    /// Server acknowledged the join request
    JoinAcknowledged,
    /// A score reached the threshold, or the server named a winner
    MatchDecided(Outcome),
    /// Unrecoverable failure
    Fatal(AbortReason),
}

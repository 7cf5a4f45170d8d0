//! Network client
//!
//! Owns the connection to the game server: the join handshake, the
//! per-iteration receive/send exchange, inbound framing and the health of
//! the link.

pub mod client;
pub mod inbound;
pub mod monitor;

pub use client::{FrameFault, JoinStatus, NetClient, ServerUpdate};
pub use inbound::{InboundStream, RX_CHUNK_SIZE};
pub use monitor::{LinkMonitor, LinkStatus};

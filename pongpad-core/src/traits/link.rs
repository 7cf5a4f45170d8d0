//! Network link trait

use crate::config::Endpoint;

/// Errors from the stream transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Connection could not be established
    ConnectFailed,
    /// No data arrived within the allowed time
    Timeout,
    /// Peer closed the connection, or it was never opened
    Closed,
    /// Underlying transport failure
    Io,
}

/// One persistent, ordered byte stream to the game server
#[allow(async_fn_in_trait)]
pub trait Link {
    /// Open the stream
    async fn connect(&mut self, endpoint: &Endpoint) -> Result<(), LinkError>;

    /// Write all of `bytes` to the stream
    async fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Read whatever is available into `buf`, waiting at most `timeout_ms`
    ///
    /// Returns the number of bytes read, which is never zero; an idle
    /// stream reports [`LinkError::Timeout`] and a closed one
    /// [`LinkError::Closed`].
    async fn recv(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, LinkError>;

    /// Close the stream
    async fn close(&mut self) -> Result<(), LinkError>;
}

//! Inbound stream buffering
//!
//! Reads from the link arrive in arbitrary chunks. Bytes left over after a
//! complete frame stay buffered so the next receive starts from them, and
//! each call yields at most one frame.

use pongpad_protocol::{Frame, FrameError, FrameParser};

use super::client::FrameFault;
use crate::traits::{Link, LinkError};

/// Size of one read from the link
pub const RX_CHUNK_SIZE: usize = 128;

/// Reads allowed per frame before giving up on this iteration
pub const MAX_READS_PER_FRAME: usize = 8;

/// Receive buffer plus framer
pub struct InboundStream {
    buf: [u8; RX_CHUNK_SIZE],
    /// Next unconsumed byte
    start: usize,
    /// End of valid data
    end: usize,
    parser: FrameParser,
}

impl Default for InboundStream {
    fn default() -> Self {
        Self::new()
    }
}

impl InboundStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self {
            buf: [0; RX_CHUNK_SIZE],
            start: 0,
            end: 0,
            parser: FrameParser::new(),
        }
    }

    /// Drop buffered bytes and any partial frame
    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
        self.parser.reset();
    }

    /// Frame from already buffered bytes only
    pub fn next_buffered(&mut self) -> Result<Option<Frame>, FrameError> {
        while self.start < self.end {
            let (used, result) = self.parser.feed_bytes(&self.buf[self.start..self.end]);
            self.start += used;
            if let Some(frame) = result? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Return the next complete frame, reading from the link as needed
    ///
    /// Each read waits at most `timeout_ms`; a stream that stays silent
    /// that long reports [`FrameFault::Timeout`]. A stream that keeps
    /// sending bytes without completing an object also reports `Timeout`
    /// after [`MAX_READS_PER_FRAME`] reads. A partial frame survives a
    /// timeout and is completed by later reads.
    pub async fn next_frame<L: Link>(
        &mut self,
        link: &mut L,
        timeout_ms: u32,
    ) -> Result<Frame, FrameFault> {
        let mut reads = 0;
        loop {
            if let Some(frame) = self.next_buffered().map_err(FrameFault::Framing)? {
                return Ok(frame);
            }
            if reads == MAX_READS_PER_FRAME {
                return Err(FrameFault::Timeout);
            }
            reads += 1;

            let n = match link.recv(&mut self.buf, timeout_ms).await {
                Ok(0) => return Err(FrameFault::Link(LinkError::Closed)),
                Ok(n) => n.min(RX_CHUNK_SIZE),
                Err(LinkError::Timeout) => return Err(FrameFault::Timeout),
                Err(e) => return Err(FrameFault::Link(e)),
            };
            self.start = 0;
            self.end = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLink;
    use embassy_futures::block_on;

    const STATUS: &[u8] = br#"{"status":"ok"}"#;

    #[test]
    fn test_leftover_bytes_stay_buffered() {
        let mut link = MockLink::new();
        link.push_rx(br#"{"status":"a"}{"status":"b"}"#);
        let mut stream = InboundStream::new();

        let first = block_on(stream.next_frame(&mut link, 100)).unwrap();
        assert_eq!(first.as_bytes(), br#"{"status":"a"}"#);
        let second = block_on(stream.next_frame(&mut link, 100)).unwrap();
        assert_eq!(second.as_bytes(), br#"{"status":"b"}"#);
        assert_eq!(link.recv_calls, 1);
    }

    #[test]
    fn test_endless_noise_is_bounded() {
        let mut link = MockLink::new();
        for _ in 0..MAX_READS_PER_FRAME + 2 {
            link.push_rx(b"noise noise noise");
        }
        link.push_rx(STATUS);
        let mut stream = InboundStream::new();

        assert_eq!(
            block_on(stream.next_frame(&mut link, 100)),
            Err(FrameFault::Timeout)
        );
        assert_eq!(link.recv_calls, MAX_READS_PER_FRAME);

        let frame = block_on(stream.next_frame(&mut link, 100)).unwrap();
        assert_eq!(frame.as_bytes(), STATUS);
    }

    #[test]
    fn test_partial_frame_survives_timeout() {
        let mut link = MockLink::new();
        link.push_rx(br#"{"sta"#);
        link.push_err(LinkError::Timeout);
        link.push_rx(br#"tus":"ok"}"#);
        let mut stream = InboundStream::new();

        assert_eq!(
            block_on(stream.next_frame(&mut link, 100)),
            Err(FrameFault::Timeout)
        );
        let frame = block_on(stream.next_frame(&mut link, 100)).unwrap();
        assert_eq!(frame.as_bytes(), STATUS);
    }

    #[test]
    fn test_closed_stream() {
        let mut link = MockLink::new();
        link.push_rx(b"");
        let mut stream = InboundStream::new();
        assert_eq!(
            block_on(stream.next_frame(&mut link, 100)),
            Err(FrameFault::Link(LinkError::Closed))
        );
    }
}

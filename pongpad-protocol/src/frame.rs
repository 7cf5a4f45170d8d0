//! Stream framing for server messages.
//!
//! The server writes JSON objects back-to-back on the stream:
//! - no delimiter between objects
//! - no length prefix
//! - one object may be split across reads, or several may share one read
//!
//! The parser tracks brace depth outside string literals and emits a frame
//! each time the depth returns to zero. Bytes outside an object (whitespace,
//! stray separators, unmatched closing braces, line noise) are skipped until
//! the next `{`. An object that is too large or too deep is reported once and
//! then skipped up to its own closing brace.

use heapless::Vec;

/// Maximum size of a single framed message in bytes
pub const MAX_MESSAGE_SIZE: usize = 256;

/// Maximum nesting depth accepted inside one message
const MAX_DEPTH: u16 = 8;

/// Errors that can occur while framing the inbound stream
///
/// Each error is reported once per dropped object; the rest of that object
/// is skipped without further errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Object exceeded [`MAX_MESSAGE_SIZE`]; it was discarded
    MessageTooLarge,
    /// Object nested deeper than any valid message; it was discarded
    TooDeep,
}

/// One complete top-level JSON object taken from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8, MAX_MESSAGE_SIZE>,
}

impl Frame {
    /// Raw bytes of the object, braces included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the object in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the frame is empty (never true for parser output)
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Position relative to string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    /// Outside any string
    Structure,
    /// Inside a string literal
    String,
    /// Just read a backslash inside a string literal
    Escape,
}

impl Lexeme {
    /// Step over one byte; returns true when the byte is structural
    fn advance(&mut self, byte: u8) -> bool {
        match *self {
            Lexeme::Structure => {
                if byte == b'"' {
                    *self = Lexeme::String;
                    false
                } else {
                    true
                }
            }
            Lexeme::String => {
                match byte {
                    b'\\' => *self = Lexeme::Escape,
                    b'"' => *self = Lexeme::Structure,
                    _ => {}
                }
                false
            }
            Lexeme::Escape => {
                *self = Lexeme::String;
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for an opening brace
    WaitingForStart,
    /// Collecting an object
    InObject,
    /// Dropped object; skipping until its closing brace
    Discarding,
}

/// State machine for splitting the inbound stream into messages
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    lexeme: Lexeme,
    buffer: Vec<u8, MAX_MESSAGE_SIZE>,
    /// Open braces and brackets of the current object
    depth: u16,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            lexeme: Lexeme::Structure,
            buffer: Vec::new(),
            depth: 0,
        }
    }

    /// Reset the parser state, dropping any partial object
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.lexeme = Lexeme::Structure;
        self.buffer.clear();
        self.depth = 0;
    }

    /// Check if the parser holds part of an object
    pub fn in_progress(&self) -> bool {
        self.state != ParseState::WaitingForStart
    }

    /// Check if the parser is skipping a dropped object
    pub fn is_discarding(&self) -> bool {
        self.state == ParseState::Discarding
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete object has been framed,
    /// `Ok(None)` when more bytes are needed, or `Err` when the current
    /// object had to be dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == b'{' {
                    self.buffer.clear();
                    // Cannot fail: buffer was just cleared
                    let _ = self.buffer.push(byte);
                    self.depth = 1;
                    self.lexeme = Lexeme::Structure;
                    self.state = ParseState::InObject;
                }
                // Silently ignore anything else between objects
                Ok(None)
            }
            ParseState::Discarding => {
                self.track_depth(byte);
                if self.depth == 0 {
                    self.reset();
                }
                Ok(None)
            }
            ParseState::InObject => {
                if self.buffer.push(byte).is_err() {
                    // Keep skipping until the oversized object closes
                    self.discard();
                    self.track_depth(byte);
                    if self.depth == 0 {
                        self.reset();
                    }
                    return Err(FrameError::MessageTooLarge);
                }
                if self.lexeme == Lexeme::Structure
                    && matches!(byte, b'{' | b'[')
                    && self.depth >= MAX_DEPTH
                {
                    self.discard();
                    self.depth += 1;
                    return Err(FrameError::TooDeep);
                }
                self.track_depth(byte);
                if self.depth == 0 {
                    let frame = Frame {
                        bytes: self.buffer.clone(),
                    };
                    self.reset();
                    return Ok(Some(frame));
                }
                Ok(None)
            }
        }
    }

    /// Drop the collected bytes but keep depth and string state
    fn discard(&mut self) {
        self.buffer.clear();
        self.state = ParseState::Discarding;
    }

    fn track_depth(&mut self, byte: u8) {
        if !self.lexeme.advance(byte) {
            return;
        }
        match byte {
            b'{' | b'[' => self.depth = self.depth.saturating_add(1),
            b'}' | b']' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the number of bytes consumed together with the first complete
    /// frame, if any. Bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Result<Option<Frame>, FrameError>) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                Ok(Some(frame)) => return (i + 1, Ok(Some(frame))),
                Err(e) => return (i + 1, Err(e)),
            }
        }
        (bytes.len(), Ok(None))
    }
}

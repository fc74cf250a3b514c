//! Line framing
//!
//! Reassembles CRLF-terminated lines from byte chunks of arbitrary size.
//! Each connection owns one `LineFramer`; the bound on line length changes
//! when a connection moves from naming itself to guessing.

/// Network line terminator
pub const TERMINATOR: &[u8] = b"\r\n";

/// Outcome of framing one logical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete line with the terminator stripped
    Line(String),
    /// A line longer than the current bound; its bytes were discarded
    Overlong,
}

/// Per-connection byte accumulator.
///
/// Never holds more than `limit + 2` bytes. Bytes past the bound are dropped
/// up to the next terminator so one oversized line yields exactly one
/// `Frame::Overlong` and the following line frames normally.
#[derive(Debug)]
pub struct LineFramer {
    buf: Vec<u8>,
    limit: usize,
    discarding: bool,
    last_was_cr: bool,
}

impl LineFramer {
    /// Creates a framer accepting lines of at most `limit` bytes
    pub fn new(limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(limit + TERMINATOR.len()),
            limit,
            discarding: false,
            last_was_cr: false,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Changes the line bound. Bytes already buffered are kept.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// Number of bytes of an unfinished line currently held
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Bytes that can still be accepted before the current line overflows
    pub fn room(&self) -> usize {
        (self.limit + TERMINATOR.len()).saturating_sub(self.buf.len())
    }

    /// Consumes bytes from the front of `input` until one line completes.
    ///
    /// Returns `None` once `input` is exhausted without a terminator; the
    /// partial line stays buffered for the next call. Any bytes after a
    /// completed line are left in `input`.
    pub fn feed(&mut self, input: &mut &[u8]) -> Option<Frame> {
        while let Some((&byte, rest)) = input.split_first() {
            *input = rest;

            if self.discarding {
                let terminated = self.last_was_cr && byte == b'\n';
                self.last_was_cr = byte == b'\r';
                if terminated {
                    self.discarding = false;
                    self.last_was_cr = false;
                    return Some(Frame::Overlong);
                }
                continue;
            }

            self.buf.push(byte);
            if self.buf.ends_with(TERMINATOR) {
                let end = self.buf.len() - TERMINATOR.len();
                let line = String::from_utf8_lossy(&self.buf[..end]).into_owned();
                self.reset();
                return Some(Frame::Line(line));
            }

            if self.buf.len() >= self.limit + TERMINATOR.len() {
                self.reset();
                self.discarding = true;
                self.last_was_cr = byte == b'\r';
            }
        }
        None
    }

    /// Drops any partial line
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
        self.last_was_cr = false;
    }
}

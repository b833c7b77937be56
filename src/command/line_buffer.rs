//! Newline-delimited line accumulator.
//!
//! The serial link hands over whatever bytes have arrived; a single read
//! may hold part of a line, exactly one line, or several.  `LineBuffer`
//! accumulates bytes one at a time and yields a complete line when the
//! `\n` terminator arrives.  Nothing here ever waits for more input.
//!
//! A line longer than [`LINE_CAPACITY`] is never handed out truncated:
//! the rest of it is swallowed up to its newline and reported as
//! [`Intake::Discarded`].

use heapless::Vec;

/// Longest accepted line, excluding the terminator.  Enough for a full
/// 32-entry batch with maximal field widths.
pub const LINE_CAPACITY: usize = 1024;

/// Why a line was dropped instead of being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Exceeded [`LINE_CAPACITY`].
    TooLong,
    /// Not valid UTF-8.
    NotUtf8,
}

/// Outcome of feeding a terminator byte.
#[derive(Debug, PartialEq, Eq)]
pub enum Intake<'a> {
    /// A complete line with `\r\n` / `\n` stripped.
    Line(&'a str),
    Discarded(DiscardReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Collecting,
    /// Capacity exceeded; skipping to the next newline.
    Overflowed,
    /// A line was handed out and is still borrowed from `buf`.
    Complete,
}

/// Room for a full line plus the `\r` of a CRLF terminator.
const BUF_CAPACITY: usize = LINE_CAPACITY + 1;

/// Streaming line decoder.
pub struct LineBuffer {
    buf: Vec<u8, BUF_CAPACITY>,
    state: State,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            state: State::Collecting,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some` only on a `\n`.  A returned line is valid until the
    /// next call to `feed`.
    pub fn feed(&mut self, byte: u8) -> Option<Intake<'_>> {
        if self.state == State::Complete {
            self.buf.clear();
            self.state = State::Collecting;
        }

        if byte == b'\n' {
            if self.state == State::Overflowed {
                self.reset();
                return Some(Intake::Discarded(DiscardReason::TooLong));
            }
            let mut len = self.buf.len();
            if self.buf.last() == Some(&b'\r') {
                len -= 1;
            }
            if len > LINE_CAPACITY {
                self.reset();
                return Some(Intake::Discarded(DiscardReason::TooLong));
            }
            self.state = State::Complete;
            let line = &self.buf[..len];
            return Some(match core::str::from_utf8(line) {
                Ok(text) => Intake::Line(text),
                Err(_) => Intake::Discarded(DiscardReason::NotUtf8),
            });
        }

        if self.state == State::Collecting && self.buf.push(byte).is_err() {
            self.state = State::Overflowed;
        }
        None
    }

    /// Bytes buffered for the line in progress.
    #[cfg(test)]
    fn pending_len(&self) -> usize {
        match self.state {
            State::Complete => 0,
            _ => self.buf.len(),
        }
    }

    /// Drop any partial line (e.g. after the link is re-opened).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = State::Collecting;
    }
}

//! Batch line parser.
//!
//! Permissive by policy: an unrecognised line is ignored, and each entry
//! is validated on its own.  [`Batch`] is a lazy iterator over the
//! comma-separated tokens; cloning it restarts the walk from the first
//! entry.

use core::fmt;
use core::str::Split;

use crate::error::EntryError;
use crate::relay::RelayId;
use crate::time::MAX_WAIT_MS;

/// Marker that opens a batch line.
pub const BATCH_PREFIX: &str = "OPEN:";

/// Acknowledgement written once per batch line.
pub const BATCH_ACK: &str = "Relays queued for activation";

/// One decoded `relay:wait:duration` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayEntry {
    pub relay: RelayId,
    /// Delay from receipt before the relay is energised.
    pub wait_ms: u32,
    /// How long the relay stays energised; 0 = no operation.
    pub duration_ms: u32,
}

impl fmt::Display for RelayEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.relay, self.wait_ms, self.duration_ms)
    }
}

/// Entries of one batch line.
#[derive(Debug, Clone)]
pub struct Batch<'a> {
    tokens: Split<'a, char>,
}

impl Iterator for Batch<'_> {
    type Item = Result<RelayEntry, EntryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let token = self.tokens.next()?;
            // Empty tokens come from ",," or a trailing comma; they carry
            // no entry at all rather than a malformed one.
            if token.trim().is_empty() {
                continue;
            }
            return Some(parse_entry(token));
        }
    }
}

/// Recognise a batch line.  Returns `None` for anything without the
/// [`BATCH_PREFIX`].
pub fn parse_batch(line: &str) -> Option<Batch<'_>> {
    let body = line.strip_prefix(BATCH_PREFIX)?;
    Some(Batch {
        tokens: body.split(','),
    })
}

/// Decode one `relay:wait:duration` token.
pub fn parse_entry(token: &str) -> Result<RelayEntry, EntryError> {
    let mut fields = token.splitn(3, ':');
    let (Some(relay), Some(wait), Some(duration)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(EntryError::MissingSeparator);
    };

    let number = parse_field(relay).ok_or(EntryError::InvalidRelayNumber)?;
    let relay = RelayId::new(number).ok_or(EntryError::RelayOutOfRange(number))?;

    let wait_ms = parse_field(wait).ok_or(EntryError::InvalidWait)?;
    if wait_ms > MAX_WAIT_MS {
        return Err(EntryError::WaitTooLong(wait_ms));
    }

    let duration_ms = parse_field(duration).ok_or(EntryError::InvalidDuration)?;

    Ok(RelayEntry {
        relay,
        wait_ms,
        duration_ms,
    })
}

fn parse_field(field: &str) -> Option<u32> {
    field.trim().parse().ok()
}

//! Host-side batch encoding.
//!
//! The controller on the other end of the serial link builds one `OPEN:`
//! line per group of doors and reads back a single acknowledgement.
//! These helpers produce byte-identical lines so host tools and tests
//! share the firmware's own definition of the wire format.

use core::fmt::{self, Write};

use super::parser::{RelayEntry, BATCH_PREFIX};
use crate::relay::RelayId;

/// Default gap between consecutive doors in a staggered batch.
pub const DEFAULT_STAGGER_MS: u32 = 500;
/// Default unlock duration per door.
pub const DEFAULT_OPEN_MS: u32 = 5_000;

/// Write a complete, newline-terminated batch line.
pub fn encode_batch<'a, W: Write>(
    entries: impl IntoIterator<Item = &'a RelayEntry>,
    out: &mut W,
) -> fmt::Result {
    out.write_str(BATCH_PREFIX)?;
    for (i, entry) in entries.into_iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write!(out, "{entry}")?;
    }
    out.write_char('\n')
}

/// Open `relays` one after another: the i-th relay waits `i * stagger_ms`.
///
/// Spreading activations keeps the inrush current of several solenoid
/// locks from landing on the supply at once.
pub fn staggered_batch(
    relays: &[RelayId],
    stagger_ms: u32,
    duration_ms: u32,
) -> impl Iterator<Item = RelayEntry> + '_ {
    relays.iter().enumerate().map(move |(i, &relay)| RelayEntry {
        relay,
        wait_ms: (i as u32).saturating_mul(stagger_ms),
        duration_ms,
    })
}

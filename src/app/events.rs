//! Outbound application events.
//!
//! The [`RelayController`](super::service::RelayController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  None of them
//! reach the serial peer; they exist for the developer console and tests.

use crate::command::DiscardReason;
use crate::error::EntryError;
use crate::relay::RelayId;
use crate::time::Millis;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller released all relays and is accepting commands.
    Started { relays: usize },

    /// A batch line was processed and acknowledged.
    BatchQueued(BatchSummary),

    /// One entry of a batch was dropped; `position` counts non-empty
    /// tokens from 0.
    EntryRejected { position: usize, reason: EntryError },

    /// A relay was (re)scheduled by a batch entry.
    RelayScheduled {
        relay: RelayId,
        deadline: Millis,
        duration_ms: u32,
    },

    /// A zero-duration entry cleared a relay.
    RelayCleared(RelayId),

    /// A relay reached its deadline and was energised.
    RelayEnergized { relay: RelayId, at: Millis },

    /// A relay ran its duration and was released.
    RelayReleased { relay: RelayId, at: Millis },

    /// An incoming line was dropped before parsing.
    LineDiscarded(DiscardReason),
}

/// Per-batch entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub accepted: usize,
    pub rejected: usize,
}

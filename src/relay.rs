//! Relay registry: the per-channel timing state shared by the command
//! parser and the scheduler.
//!
//! One record per relay instead of parallel arrays: each slot is a
//! [`Phase`] that carries exactly the timing data meaningful in that
//! phase, so a PENDING relay has no `activated_at` and an OFF relay has
//! no duration to go stale.
//!
//! ```text
//!            schedule()               deadline reached
//!   ┌─────┐ ───────────▶ ┌─────────┐ ────────────────▶ ┌────┐
//!   │ Off │              │ Pending │                   │ On │
//!   └─────┘ ◀─────────── └─────────┘                   └────┘
//!      ▲     duration 0                                   │
//!      └──────────────────────────────────────────────────┘
//!                       duration elapsed
//! ```

use core::fmt;

use crate::pins::{self, RELAY_COUNT};
use crate::time::{self, Millis};

// ═══════════════════════════════════════════════════════════════
//  Relay identifier
// ═══════════════════════════════════════════════════════════════

/// Logical relay channel, numbered 1..=32 as addressed by commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelayId(u8);

impl RelayId {
    pub const FIRST: Self = Self(1);
    pub const LAST: Self = Self(RELAY_COUNT as u8);

    /// Validate a command-level relay number.
    pub fn new(number: u32) -> Option<Self> {
        if (1..=RELAY_COUNT as u32).contains(&number) {
            Some(Self(number as u8))
        } else {
            None
        }
    }

    /// Relay for a zero-based registry index.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < RELAY_COUNT).then(|| Self(index as u8 + 1))
    }

    /// The 1-based number used on the wire.
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based registry index.
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Physical output pin driving this relay.
    pub const fn pin(self) -> u8 {
        pins::relay_gpio(self.index())
    }

    /// Every relay in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=RELAY_COUNT as u8).map(Self)
    }
}

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Per-relay state
// ═══════════════════════════════════════════════════════════════

/// Coarse lifecycle state of a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Off,
    Pending,
    On,
}

/// Lifecycle phase together with the timing data it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Idle, no operation scheduled.
    #[default]
    Off,
    /// Waiting for `deadline` before energising for `duration_ms`.
    Pending { deadline: Millis, duration_ms: u32 },
    /// Energised since `activated_at`, for `duration_ms` in total.
    On { activated_at: Millis, duration_ms: u32 },
}

impl Phase {
    pub fn state(&self) -> RelayState {
        match self {
            Self::Off => RelayState::Off,
            Self::Pending { .. } => RelayState::Pending,
            Self::On { .. } => RelayState::On,
        }
    }

    /// Scheduled on-time; 0 means no operation.
    pub fn duration_ms(&self) -> u32 {
        match *self {
            Self::Off => 0,
            Self::Pending { duration_ms, .. } | Self::On { duration_ms, .. } => duration_ms,
        }
    }

    /// Activation deadline, meaningful only while pending.
    pub fn activation_deadline(&self) -> Option<Millis> {
        match *self {
            Self::Pending { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Activation timestamp, meaningful only while on.
    pub fn activated_at(&self) -> Option<Millis> {
        match *self {
            Self::On { activated_at, .. } => Some(activated_at),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Registry
// ═══════════════════════════════════════════════════════════════

/// Fixed-size table of all relay slots, indexed by [`RelayId::index`].
#[derive(Debug, Clone)]
pub struct RelayRegistry {
    slots: [Phase; RELAY_COUNT],
}

impl Default for RelayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayRegistry {
    pub fn new() -> Self {
        Self {
            slots: [Phase::Off; RELAY_COUNT],
        }
    }

    /// Install a schedule, overwriting whatever the relay was doing.
    ///
    /// A zero duration installs "no operation": the slot returns to
    /// [`Phase::Off`] and will never be activated.
    pub fn schedule(&mut self, relay: RelayId, now: Millis, wait_ms: u32, duration_ms: u32) -> Phase {
        let phase = if duration_ms == 0 {
            Phase::Off
        } else {
            Phase::Pending {
                deadline: time::deadline_after(now, wait_ms),
                duration_ms,
            }
        };
        self.slots[relay.index()] = phase;
        phase
    }

    pub fn phase(&self, relay: RelayId) -> Phase {
        self.slots[relay.index()]
    }

    pub fn state(&self, relay: RelayId) -> RelayState {
        self.phase(relay).state()
    }

    /// `(relay, phase)` for every slot, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (RelayId, Phase)> + '_ {
        RelayId::all().zip(self.slots.iter().copied())
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = (RelayId, &mut Phase)> {
        RelayId::all().zip(self.slots.iter_mut())
    }

    pub fn pending_count(&self) -> usize {
        self.count(RelayState::Pending)
    }

    pub fn on_count(&self) -> usize {
        self.count(RelayState::On)
    }

    /// No relay is pending or energised.
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(|p| *p == Phase::Off)
    }

    fn count(&self, state: RelayState) -> usize {
        self.slots.iter().filter(|p| p.state() == state).count()
    }
}

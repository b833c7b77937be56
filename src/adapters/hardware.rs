//! Hardware adapter: bridges relay output pins to the domain port.
//!
//! Owns one `embedded-hal` output pin per relay and exposes them through
//! [`RelayDriver`].  This is the only place that knows about electrical
//! polarity: the domain says energise / de-energise, the adapter picks
//! the level.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::RelayDriver;
use crate::drivers::relay_pin::RelayPin;
use crate::pins::RELAY_COUNT;
use crate::relay::RelayId;

/// Concrete adapter driving all relay coils.
pub struct RelayOutputs<P: OutputPin> {
    pins: [P; RELAY_COUNT],
    active_low: bool,
    /// Bit `i` set = relay index `i` commanded on.
    energized: u32,
}

impl RelayOutputs<RelayPin> {
    /// The board's own relay header, pins parked at the idle level.
    pub fn board(active_low: bool) -> Self {
        Self::new(RelayPin::bank(active_low), active_low)
    }
}

impl<P: OutputPin> RelayOutputs<P> {
    pub fn new(pins: [P; RELAY_COUNT], active_low: bool) -> Self {
        Self {
            pins,
            active_low,
            energized: 0,
        }
    }

    /// Output level that produces the requested coil state.
    fn level_for(&self, energized: bool) -> PinState {
        PinState::from(energized != self.active_low)
    }

    pub fn pin(&self, relay: RelayId) -> &P {
        &self.pins[relay.index()]
    }

    /// Bitmask of energised relays (bit 0 = relay 1).
    pub fn energized_mask(&self) -> u32 {
        self.energized
    }

    fn drive(&mut self, relay: RelayId, energized: bool) {
        let level = self.level_for(energized);
        if let Err(e) = self.pins[relay.index()].set_state(level) {
            // Coil state is unknown after a failed write; the next
            // command for this relay retries the level.
            warn!("Relay {}: GPIO {} write failed: {:?}", relay, relay.pin(), e);
            return;
        }
        let bit = 1u32 << relay.index();
        if energized {
            self.energized |= bit;
        } else {
            self.energized &= !bit;
        }
    }
}

// ── RelayDriver implementation ─────────────────────────────────

impl<P: OutputPin> RelayDriver for RelayOutputs<P> {
    fn energize(&mut self, relay: RelayId) {
        self.drive(relay, true);
    }

    fn de_energize(&mut self, relay: RelayId) {
        self.drive(relay, false);
    }

    fn is_energized(&self, relay: RelayId) -> bool {
        self.energized & (1 << relay.index()) != 0
    }
}

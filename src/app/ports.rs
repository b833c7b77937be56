//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RelayController (domain)
//! ```
//!
//! Driven adapters (relay outputs, clock, serial responder, event sinks)
//! implement these traits.  The [`RelayController`](super::service::RelayController)
//! consumes them via generics, so the domain core never touches hardware
//! directly and tests run against recording mocks.

use crate::relay::RelayId;
use crate::time::Millis;

// ───────────────────────────────────────────────────────────────
// Relay output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the relay coils.
///
/// Speaks in energise / de-energise; electrical polarity (the board is
/// active-low) is the adapter's business.
pub trait RelayDriver {
    /// Energise the relay coil.
    fn energize(&mut self, relay: RelayId);

    /// Release the relay coil.
    fn de_energize(&mut self, relay: RelayId);

    /// Whether the coil is currently commanded on.
    fn is_energized(&self, relay: RelayId) -> bool;

    /// Release every relay: the startup and safe-shutdown state.
    fn all_off(&mut self) {
        for relay in RelayId::all() {
            self.de_energize(relay);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock, wrapping at `u32::MAX`.
pub trait ClockPort {
    fn now_ms(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Responder port (driven adapter: domain → serial peer)
// ───────────────────────────────────────────────────────────────

/// The only output the serial peer ever sees.
pub trait Responder {
    /// Send one line; the adapter appends the line terminator.
    fn send_line(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (developer log,
/// test recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from event system)
// ───────────────────────────────────────────────────────────────

/// Callback trait the scheduler invokes on every relay transition.
///
/// The scheduler knows nothing about events or sinks; the controller
/// bridges these calls to its [`EventSink`].
pub trait SchedulerDelegate {
    /// A pending relay reached its deadline and was energised.
    fn on_relay_energized(&mut self, relay: RelayId, at: Millis);

    /// An energised relay ran its duration and was released.
    fn on_relay_released(&mut self, relay: RelayId, at: Millis);
}

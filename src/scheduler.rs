//! Relay scheduler: the polling half of the controller.
//!
//! Called once per loop iteration with the current clock reading.  Two
//! fixed-cost passes over all 32 slots:
//!
//! ```text
//!   activation pass     Pending ──(deadline reached)──▶ On      coil energised
//!   deactivation pass   On ──(elapsed >= duration)──▶ Off       coil released
//! ```
//!
//! Both passes scan all 32 slots every iteration.  There are no error
//! paths; a relay that never transitions is either unscheduled or not
//! yet due.
//!
//! The scheduler notifies a [`SchedulerDelegate`] on every transition;
//! it knows nothing about events or logging sinks.

use log::debug;

use crate::app::ports::{RelayDriver, SchedulerDelegate};
use crate::relay::{Phase, RelayRegistry};
use crate::time::{self, Millis};

/// Transitions made by one [`tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub energized: usize,
    pub released: usize,
}

impl TickReport {
    pub fn is_quiet(&self) -> bool {
        self.energized == 0 && self.released == 0
    }
}

/// Advance every relay against `now`: activation pass, then deactivation pass.
pub fn tick(
    registry: &mut RelayRegistry,
    now: Millis,
    driver: &mut impl RelayDriver,
    delegate: &mut dyn SchedulerDelegate,
) -> TickReport {
    TickReport {
        energized: activation_pass(registry, now, driver, delegate),
        released: deactivation_pass(registry, now, driver, delegate),
    }
}

/// Energise every pending relay whose deadline has been reached.
pub fn activation_pass(
    registry: &mut RelayRegistry,
    now: Millis,
    driver: &mut impl RelayDriver,
    delegate: &mut dyn SchedulerDelegate,
) -> usize {
    let mut count = 0;
    for (relay, slot) in registry.slots_mut() {
        let Phase::Pending {
            deadline,
            duration_ms,
        } = *slot
        else {
            continue;
        };
        // Zero duration means "no operation" and never activates.
        if duration_ms == 0 || !time::deadline_reached(now, deadline) {
            continue;
        }

        driver.energize(relay);
        *slot = Phase::On {
            activated_at: now,
            duration_ms,
        };
        debug!("Scheduler: relay {} on for {}ms (pin {})", relay, duration_ms, relay.pin());
        delegate.on_relay_energized(relay, now);
        count += 1;
    }
    count
}

/// Release every energised relay whose duration has elapsed.
pub fn deactivation_pass(
    registry: &mut RelayRegistry,
    now: Millis,
    driver: &mut impl RelayDriver,
    delegate: &mut dyn SchedulerDelegate,
) -> usize {
    let mut count = 0;
    for (relay, slot) in registry.slots_mut() {
        let Phase::On {
            activated_at,
            duration_ms,
        } = *slot
        else {
            continue;
        };
        if time::elapsed(now, activated_at) < duration_ms {
            continue;
        }

        driver.de_energize(relay);
        // Back to "no operation"; nothing stale is left to re-qualify.
        *slot = Phase::Off;
        debug!("Scheduler: relay {} off after {}ms", relay, time::elapsed(now, activated_at));
        delegate.on_relay_released(relay, now);
        count += 1;
    }
    count
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

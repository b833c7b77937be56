//! Task watchdog for the relay poll loop.
//!
//! A stalled loop would leave energised relays stuck on, so the loop task
//! subscribes to the ESP-IDF Task Watchdog Timer and the board panics and
//! reboots (all relays released by the boot sequence) if it stops feeding.
//! On the host the watchdog is inert.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{
    esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure, esp_task_wdt_reset, ESP_OK,
};
use log::{info, warn};

/// Subscription of the calling task to the TWDT.
pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Subscribe the current task with a `timeout_ms` deadline.
    ///
    /// Failure to subscribe is logged, not fatal: relays still run, they
    /// just lose the stall guard.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: plain FFI calls with a valid config; a null handle means
        // "the calling task".
        let (reconf, add) = unsafe {
            (
                esp_task_wdt_reconfigure(&cfg),
                esp_task_wdt_add(core::ptr::null_mut()),
            )
        };
        if reconf != ESP_OK as i32 {
            warn!("Watchdog: reconfigure returned {} (already running?)", reconf);
        }
        let subscribed = add == ESP_OK as i32;
        if subscribed {
            info!("Watchdog: poll loop guarded, {}ms timeout", timeout_ms);
        } else {
            warn!("Watchdog: poll loop unguarded, subscribe returned {}", add);
        }
        Self { subscribed }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(timeout_ms: u32) -> Self {
        info!("Watchdog(sim): inert ({}ms)", timeout_ms);
        if timeout_ms == 0 {
            warn!("Watchdog(sim): zero timeout would reset a real board at once");
        }
        Self {}
    }

    /// Reset the countdown; called once per loop iteration.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the task subscribed in `new`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}

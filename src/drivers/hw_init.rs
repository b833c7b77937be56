//! One-shot hardware peripheral initialization.
//!
//! Configures the 32 relay GPIOs as push-pull outputs parked at the
//! released level, using raw ESP-IDF sys calls.  Called once from
//! `main()` before the polling loop starts, so no relay can chatter
//! while the firmware boots.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::PinError;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    GpioLevelFailed { pin: u8 },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "relay GPIO config failed (rc={})", rc),
            Self::GpioLevelFailed { pin } => write!(f, "GPIO {} idle level not applied", pin),
        }
    }
}

impl std::error::Error for HwInitError {}

/// Output level that keeps a relay released.
pub const fn idle_level_high(active_low: bool) -> bool {
    active_low
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_relay_outputs(active_low: bool) -> Result<(), HwInitError> {
    let idle_high = idle_level_high(active_low);
    let mask = pins::RELAY_GPIOS.iter().fold(0u64, |m, &pin| m | (1u64 << pin));

    // Latch the idle level before the driver is enabled so the pins come
    // up released rather than floating low for a moment.
    for &pin in &pins::RELAY_GPIOS {
        gpio_write(pin, idle_high).map_err(|_| HwInitError::GpioLevelFailed { pin })?;
    }

    let cfg = gpio_config_t {
        pin_bit_mask: mask,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: called once from main() before the polling loop; single-threaded.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    for &pin in &pins::RELAY_GPIOS {
        gpio_write(pin, idle_high).map_err(|_| HwInitError::GpioLevelFailed { pin })?;
    }

    info!(
        "hw_init: {} relay outputs configured, idle level {}",
        pins::RELAY_COUNT,
        if idle_high { "HIGH" } else { "LOW" }
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_relay_outputs(active_low: bool) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): relay outputs parked {}",
        if idle_level_high(active_low) { "HIGH" } else { "LOW" }
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: u8, high: bool) -> Result<(), PinError> {
    // SAFETY: gpio_set_level writes to a relay pin owned exclusively by
    // this firmware; main-loop only.
    let ret = unsafe { gpio_set_level(pin as i32, u32::from(high)) };
    if ret == ESP_OK as i32 {
        Ok(())
    } else {
        Err(PinError::WriteFailed { pin })
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: u8, _high: bool) -> Result<(), PinError> {
    Ok(())
}

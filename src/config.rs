//! System configuration parameters
//!
//! Tunables for the relay bank.  Defaults match the serial protocol used
//! by the door controller (9600 baud, active-low relay boards).  A JSON
//! override can be supplied to the host simulator; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Serial link ---
    /// UART baud rate
    pub baud_rate: u32,
    /// Bytes read from the UART per loop iteration
    pub uart_read_chunk: usize,

    // --- Relay outputs ---
    /// Relay boards energise on a LOW input
    pub relay_active_low: bool,

    // --- Timing ---
    /// Sleep between loop iterations (milliseconds, 0 = busy poll)
    pub poll_interval_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Serial
            baud_rate: 9600,
            uart_read_chunk: 64,

            // Relays
            relay_active_low: true,

            // Timing
            poll_interval_ms: 1,
            watchdog_timeout_ms: 10_000,
        }
    }
}

/// Largest read chunk; bounds the stack buffer in the main loop.
pub const MAX_READ_CHUNK: usize = 256;

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(300..=921_600).contains(&self.baud_rate) {
            return Err(ConfigError::ValidationFailed("baud_rate must be 300..=921600"));
        }
        if self.uart_read_chunk == 0 || self.uart_read_chunk > MAX_READ_CHUNK {
            return Err(ConfigError::ValidationFailed("uart_read_chunk must be 1..=256"));
        }
        if self.watchdog_timeout_ms < 1_000 {
            return Err(ConfigError::ValidationFailed("watchdog_timeout_ms must be >= 1000"));
        }
        if self.poll_interval_ms >= self.watchdog_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_ms must be below watchdog_timeout_ms",
            ));
        }
        Ok(())
    }

    /// Parse a JSON override and validate it.  Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }
}

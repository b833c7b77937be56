//! Relay output pin driver.
//!
//! A single GPIO behind the `embedded-hal` [`OutputPin`] trait, so the
//! relay bank adapter is generic over any HAL's pins and tests can drop
//! in their own.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the GPIO level via hw_init.
//! On host/test: tracks the level in-memory only.

use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin, StatefulOutputPin};

use crate::drivers::hw_init;
use crate::error::PinError;
use crate::pins::{self, RELAY_COUNT};

impl digital::Error for PinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct RelayPin {
    gpio: u8,
    high: bool,
}

impl RelayPin {
    /// Wrap `gpio`, assumed already configured at `high` by hw_init.
    pub fn new(gpio: u8, high: bool) -> Self {
        Self { gpio, high }
    }

    /// One pin per relay, in index order, all at the idle level.
    pub fn bank(active_low: bool) -> [Self; RELAY_COUNT] {
        let idle_high = hw_init::idle_level_high(active_low);
        core::array::from_fn(|i| Self::new(pins::RELAY_GPIOS[i], idle_high))
    }

    pub fn gpio(&self) -> u8 {
        self.gpio
    }

    fn write(&mut self, high: bool) -> Result<(), PinError> {
        hw_init::gpio_write(self.gpio, high)?;
        self.high = high;
        Ok(())
    }
}

impl ErrorType for RelayPin {
    type Error = PinError;
}

impl OutputPin for RelayPin {
    fn set_low(&mut self) -> Result<(), PinError> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), PinError> {
        self.write(true)
    }
}

impl StatefulOutputPin for RelayPin {
    fn is_set_high(&mut self) -> Result<bool, PinError> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, PinError> {
        Ok(!self.high)
    }
}

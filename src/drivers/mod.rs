//! Hardware drivers.
//!
//! Each driver is dual-target: real ESP-IDF calls on `target_os = "espidf"`,
//! in-memory simulation everywhere else so the crate tests on the host.

pub mod hw_init;
pub mod relay_pin;
pub mod watchdog;

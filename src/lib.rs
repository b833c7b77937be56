//! Relaybank firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod pins;
pub mod relay;
pub mod scheduler;
pub mod time;
pub mod transport;

// Dual-target modules; the ESP-IDF implementations are guarded by cfg
// attributes inside.
pub mod adapters;
pub mod drivers;

//! Unified error types for the relaybank firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! bootstrap path's error handling uniform.  All variants are `Copy` so
//! they can be passed through events and logs without allocation.
//!
//! None of these are fatal once the polling loop runs: entry errors are
//! dropped by omission, pin and serial errors are logged and the loop
//! carries on.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A batch entry could not be decoded.
    Entry(EntryError),
    /// A relay output pin could not be driven.
    Pin(PinError),
    /// The serial link failed.
    Serial(SerialError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry(e) => write!(f, "entry: {e}"),
            Self::Pin(e) => write!(f, "pin: {e}"),
            Self::Serial(e) => write!(f, "serial: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Batch entry errors
// ---------------------------------------------------------------------------

/// Why a single `relay:wait:duration` token was dropped from a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryError {
    /// Fewer than two `:` separators in the token.
    MissingSeparator,
    /// Relay field is not an unsigned integer.
    InvalidRelayNumber,
    /// Relay number outside 1..=32.
    RelayOutOfRange(u32),
    /// Wait field is not an unsigned integer.
    InvalidWait,
    /// Wait is beyond the wrap-safe comparison horizon.
    WaitTooLong(u32),
    /// Duration field is not an unsigned integer.
    InvalidDuration,
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing ':' separator"),
            Self::InvalidRelayNumber => write!(f, "relay number is not numeric"),
            Self::RelayOutOfRange(n) => write!(f, "relay {n} out of range 1..=32"),
            Self::InvalidWait => write!(f, "wait is not numeric"),
            Self::WaitTooLong(ms) => write!(f, "wait {ms}ms exceeds clock horizon"),
            Self::InvalidDuration => write!(f, "duration is not numeric"),
        }
    }
}

impl From<EntryError> for Error {
    fn from(e: EntryError) -> Self {
        Self::Entry(e)
    }
}

// ---------------------------------------------------------------------------
// Pin errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// Setting the output level failed on the given physical pin.
    WriteFailed { pin: u8 },
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed { pin } => write!(f, "GPIO {pin} write failed"),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

// ---------------------------------------------------------------------------
// Serial errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// The UART driver could not be installed.
    OpenFailed(i32),
    /// UART read returned an error code.
    ReadFailed(i32),
    /// UART write returned an error code.
    WriteFailed(i32),
    /// The peer side of the link has gone away.
    Disconnected,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed(rc) => write!(f, "driver install failed (rc={rc})"),
            Self::ReadFailed(rc) => write!(f, "read failed (rc={rc})"),
            Self::WriteFailed(rc) => write!(f, "write failed (rc={rc})"),
            Self::Disconnected => write!(f, "link disconnected"),
        }
    }
}

impl From<SerialError> for Error {
    fn from(e: SerialError) -> Self {
        Self::Serial(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document is not valid JSON for [`SystemConfig`](crate::config::SystemConfig).
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

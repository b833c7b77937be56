//! GPIO / peripheral pin assignments for the relaybank board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! The relay header occupies the contiguous block GPIO 22–53, split into
//! two interleaved banks so that each 16-channel relay board sits on one
//! row of the dual-row connector.

// ---------------------------------------------------------------------------
// Relay banks
// ---------------------------------------------------------------------------

/// Number of relay channels on the board.
pub const RELAY_COUNT: usize = 32;

/// Channels per relay board (one bank).
pub const BANK_SIZE: usize = 16;

/// First pin of bank A (relays 1–16, even pins 22..=52).
pub const BANK_A_FIRST_GPIO: u8 = 22;
/// First pin of bank B (relays 17–32, odd pins 23..=53).
pub const BANK_B_FIRST_GPIO: u8 = 23;

/// Physical pin for a zero-based relay index.
///
/// Indices 0–15 land on the even row, 16–31 on the odd row.  Callers
/// pass indices already validated against [`RELAY_COUNT`]; use
/// [`RelayId::pin`](crate::relay::RelayId::pin) from outside this module.
pub const fn relay_gpio(index: usize) -> u8 {
    if index < BANK_SIZE {
        BANK_A_FIRST_GPIO + (index as u8) * 2
    } else {
        BANK_B_FIRST_GPIO + ((index - BANK_SIZE) as u8) * 2
    }
}

/// All relay pins in index order.
pub const RELAY_GPIOS: [u8; RELAY_COUNT] = {
    let mut pins = [0u8; RELAY_COUNT];
    let mut i = 0;
    while i < RELAY_COUNT {
        pins[i] = relay_gpio(i);
        i += 1;
    }
    pins
};

// ---------------------------------------------------------------------------
// UART command link
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 10;
pub const UART_RX_GPIO: i32 = 11;

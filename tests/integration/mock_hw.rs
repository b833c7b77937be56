//! Mock adapters for integration tests.
//!
//! Records every coil command, response line and event so tests can
//! assert on the full history without touching real GPIO or a UART.

use relaybank::app::events::AppEvent;
use relaybank::app::ports::{EventSink, RelayDriver, Responder};
use relaybank::pins::RELAY_COUNT;
use relaybank::relay::RelayId;
use relaybank::transport::Transport;

// ── Coil call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoilCall {
    Energize(RelayId),
    DeEnergize(RelayId),
}

impl CoilCall {
    pub fn relay(self) -> RelayId {
        match self {
            Self::Energize(r) | Self::DeEnergize(r) => r,
        }
    }
}

// ── MockRelays ────────────────────────────────────────────────

pub struct MockRelays {
    pub calls: Vec<CoilCall>,
    on: [bool; RELAY_COUNT],
}

#[allow(dead_code)]
impl MockRelays {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            on: [false; RELAY_COUNT],
        }
    }

    /// Calls addressed to one relay, in order.
    pub fn calls_for(&self, relay: RelayId) -> Vec<CoilCall> {
        self.calls
            .iter()
            .copied()
            .filter(|c| c.relay() == relay)
            .collect()
    }

    /// Number of off→on or on→off level changes seen by a relay's pin.
    pub fn toggles(&self, relay: RelayId) -> usize {
        let mut level = false;
        let mut toggles = 0;
        for call in self.calls_for(relay) {
            let next = matches!(call, CoilCall::Energize(_));
            if next != level {
                toggles += 1;
                level = next;
            }
        }
        toggles
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockRelays {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayDriver for MockRelays {
    fn energize(&mut self, relay: RelayId) {
        self.on[relay.index()] = true;
        self.calls.push(CoilCall::Energize(relay));
    }

    fn de_energize(&mut self, relay: RelayId) {
        self.on[relay.index()] = false;
        self.calls.push(CoilCall::DeEnergize(relay));
    }

    fn is_energized(&self, relay: RelayId) -> bool {
        self.on[relay.index()]
    }
}

// ── Responder ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockResponder {
    pub lines: Vec<String>,
}

impl Responder for MockResponder {
    fn send_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct EventLog {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Loopback transport ────────────────────────────────────────

/// Serves `input` in reads of at most `chunk` bytes and captures writes.
pub struct Loopback {
    input: Vec<u8>,
    cursor: usize,
    chunk: usize,
    pub written: Vec<u8>,
}

impl Loopback {
    pub fn new(input: &[u8], chunk: usize) -> Self {
        Self {
            input: input.to_vec(),
            cursor: 0,
            chunk,
            written: Vec::new(),
        }
    }
}

impl Transport for Loopback {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf
            .len()
            .min(self.chunk)
            .min(self.input.len() - self.cursor);
        buf[..n].copy_from_slice(&self.input[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

pub fn relay(n: u32) -> RelayId {
    RelayId::new(n).expect("relay number in range")
}

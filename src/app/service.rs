//! Application service: the hexagonal core.
//!
//! [`RelayController`] owns the relay registry and the line accumulator.
//! It exposes a hardware-agnostic API; all I/O flows through port traits
//! injected at call sites, so the whole controller is testable with mock
//! adapters and an injected clock.
//!
//! ```text
//!   serial bytes ──▶ ┌──────────────────────────┐ ──▶ Responder (ack)
//!                    │     RelayController      │
//!   now (ClockPort)─▶│ LineBuffer · Registry ·  │ ──▶ EventSink
//!                    │ Scheduler                │
//!                    └────────────┬─────────────┘
//!                                 ▼
//!                            RelayDriver
//! ```
//!
//! Both halves run on one cooperative loop: [`ingest`](RelayController::ingest)
//! mutates the registry between scheduler passes, never during one.

use log::{debug, info};

use crate::command::{parse_batch, Intake, LineBuffer, RelayEntry, BATCH_ACK};
use crate::relay::{Phase, RelayId, RelayRegistry};
use crate::scheduler::{self, TickReport};
use crate::time::Millis;

use super::events::{AppEvent, BatchSummary};
use super::ports::{EventSink, RelayDriver, Responder, SchedulerDelegate};

// ───────────────────────────────────────────────────────────────
// Counters
// ───────────────────────────────────────────────────────────────

/// Running totals since start, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub batches: u32,
    pub entries_accepted: u32,
    pub entries_rejected: u32,
    /// Complete lines without the batch prefix.
    pub lines_ignored: u32,
    /// Lines dropped by the accumulator (too long / not UTF-8).
    pub lines_discarded: u32,
    pub activations: u32,
}

// ───────────────────────────────────────────────────────────────
// RelayController
// ───────────────────────────────────────────────────────────────

/// Command intake plus scheduling for the whole relay bank.
pub struct RelayController {
    registry: RelayRegistry,
    lines: LineBuffer,
    stats: ControllerStats,
}

impl Default for RelayController {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayController {
    pub fn new() -> Self {
        Self {
            registry: RelayRegistry::new(),
            lines: LineBuffer::new(),
            stats: ControllerStats::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every relay to the released level before any command runs.
    pub fn start(&mut self, driver: &mut impl RelayDriver, sink: &mut impl EventSink) {
        self.registry = RelayRegistry::new();
        self.lines.reset();
        driver.all_off();
        let relays = RelayId::all().count();
        sink.emit(&AppEvent::Started { relays });
        info!("RelayController started, {} relays released", relays);
    }

    // ── Command intake ────────────────────────────────────────

    /// Feed bytes read from the serial link.
    ///
    /// Every line completed by these bytes is handled immediately; a
    /// trailing partial line stays buffered for the next call.
    pub fn ingest(
        &mut self,
        bytes: &[u8],
        now: Millis,
        driver: &mut impl RelayDriver,
        responder: &mut impl Responder,
        sink: &mut impl EventSink,
    ) {
        let Self {
            registry,
            lines,
            stats,
        } = self;

        for &byte in bytes {
            match lines.feed(byte) {
                Some(Intake::Line(line)) => {
                    dispatch_line(registry, stats, line, now, driver, responder, sink);
                }
                Some(Intake::Discarded(reason)) => {
                    stats.lines_discarded += 1;
                    sink.emit(&AppEvent::LineDiscarded(reason));
                }
                None => {}
            }
        }
    }

    /// Handle one complete line.
    ///
    /// Returns the batch summary, or `None` if the line was not a batch
    /// (in which case nothing is changed and nothing is acknowledged).
    pub fn handle_line(
        &mut self,
        line: &str,
        now: Millis,
        driver: &mut impl RelayDriver,
        responder: &mut impl Responder,
        sink: &mut impl EventSink,
    ) -> Option<BatchSummary> {
        dispatch_line(
            &mut self.registry,
            &mut self.stats,
            line,
            now,
            driver,
            responder,
            sink,
        )
    }

    // ── Polling ───────────────────────────────────────────────

    /// Run the scheduler's activation and deactivation passes.
    pub fn poll(
        &mut self,
        now: Millis,
        driver: &mut impl RelayDriver,
        sink: &mut impl EventSink,
    ) -> TickReport {
        let mut delegate = SinkDelegate(sink);
        let report = scheduler::tick(&mut self.registry, now, driver, &mut delegate);
        self.stats.activations += report.energized as u32;
        report
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn registry(&self) -> &RelayRegistry {
        &self.registry
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// No relay is pending or energised.
    pub fn is_idle(&self) -> bool {
        self.registry.is_idle()
    }

    /// Reconstruct the entry that would produce a pending relay's current
    /// schedule, relative to `received_at`.
    ///
    /// `None` unless the relay is pending.
    pub fn pending_entry(&self, relay: RelayId, received_at: Millis) -> Option<RelayEntry> {
        match self.registry.phase(relay) {
            Phase::Pending {
                deadline,
                duration_ms,
            } => Some(RelayEntry {
                relay,
                wait_ms: deadline.wrapping_sub(received_at),
                duration_ms,
            }),
            _ => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Internal
// ───────────────────────────────────────────────────────────────

fn dispatch_line(
    registry: &mut RelayRegistry,
    stats: &mut ControllerStats,
    line: &str,
    now: Millis,
    driver: &mut impl RelayDriver,
    responder: &mut impl Responder,
    sink: &mut impl EventSink,
) -> Option<BatchSummary> {
    let Some(batch) = parse_batch(line) else {
        stats.lines_ignored += 1;
        debug!("Intake: ignoring non-batch line ({} bytes)", line.len());
        return None;
    };

    let mut summary = BatchSummary::default();
    for (position, item) in batch.enumerate() {
        match item {
            Ok(entry) => {
                install_entry(registry, entry, now, driver, sink);
                summary.accepted += 1;
            }
            Err(reason) => {
                sink.emit(&AppEvent::EntryRejected { position, reason });
                summary.rejected += 1;
            }
        }
    }

    // Exactly one acknowledgement per batch line, however many entries held.
    responder.send_line(BATCH_ACK);

    stats.batches += 1;
    stats.entries_accepted += summary.accepted as u32;
    stats.entries_rejected += summary.rejected as u32;
    sink.emit(&AppEvent::BatchQueued(summary));
    Some(summary)
}

fn install_entry(
    registry: &mut RelayRegistry,
    entry: RelayEntry,
    now: Millis,
    driver: &mut impl RelayDriver,
    sink: &mut impl EventSink,
) {
    // Released at once; the scheduler energises it when the wait is over.
    driver.de_energize(entry.relay);
    match registry.schedule(entry.relay, now, entry.wait_ms, entry.duration_ms) {
        Phase::Pending {
            deadline,
            duration_ms,
        } => sink.emit(&AppEvent::RelayScheduled {
            relay: entry.relay,
            deadline,
            duration_ms,
        }),
        _ => sink.emit(&AppEvent::RelayCleared(entry.relay)),
    }
}

/// Bridges scheduler callbacks onto the event sink.
struct SinkDelegate<'a, S: EventSink>(&'a mut S);

impl<S: EventSink> SchedulerDelegate for SinkDelegate<'_, S> {
    fn on_relay_energized(&mut self, relay: RelayId, at: Millis) {
        self.0.emit(&AppEvent::RelayEnergized { relay, at });
    }

    fn on_relay_released(&mut self, relay: RelayId, at: Millis) {
        self.0.emit(&AppEvent::RelayReleased { relay, at });
    }
}

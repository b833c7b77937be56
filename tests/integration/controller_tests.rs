//! Integration tests for the serial bytes → RelayController → coils pipeline.
//!
//! Commands enter exactly as they would off the wire (raw bytes through
//! `ingest`) and time advances only through the injected `now` values.

use crate::mock_hw::{relay, CoilCall, EventLog, MockRelays, MockResponder};

use relaybank::app::events::{AppEvent, BatchSummary};
use relaybank::app::ports::RelayDriver;
use relaybank::app::service::RelayController;
use relaybank::command::{BATCH_ACK, LINE_CAPACITY};
use relaybank::error::EntryError;
use relaybank::relay::{Phase, RelayId, RelayState};

struct Rig {
    ctl: RelayController,
    coils: MockRelays,
    acks: MockResponder,
    events: EventLog,
}

impl Rig {
    fn new() -> Self {
        let mut rig = Self {
            ctl: RelayController::new(),
            coils: MockRelays::new(),
            acks: MockResponder::default(),
            events: EventLog::default(),
        };
        rig.ctl.start(&mut rig.coils, &mut rig.events);
        rig.coils.clear();
        rig
    }

    fn send(&mut self, line: &str, now: u32) {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.ctl.ingest(
            &bytes,
            now,
            &mut self.coils,
            &mut self.acks,
            &mut self.events,
        );
    }

    fn poll(&mut self, now: u32) {
        self.ctl.poll(now, &mut self.coils, &mut self.events);
    }

    fn state(&self, n: u32) -> RelayState {
        self.ctl.registry().state(relay(n))
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_releases_every_relay_once() {
    let mut ctl = RelayController::new();
    let mut coils = MockRelays::new();
    let mut events = EventLog::default();
    ctl.start(&mut coils, &mut events);

    assert_eq!(coils.calls.len(), 32);
    for id in RelayId::all() {
        assert_eq!(coils.calls_for(id), vec![CoilCall::DeEnergize(id)]);
    }
    assert_eq!(events.events, vec![AppEvent::Started { relays: 32 }]);
    assert!(ctl.is_idle());
}

// ── Single relay full cycle ───────────────────────────────────

#[test]
fn single_relay_full_cycle() {
    let mut rig = Rig::new();
    rig.send("OPEN:1:0:100", 1_000);
    assert_eq!(rig.state(1), RelayState::Pending);

    rig.poll(1_000);
    assert_eq!(rig.state(1), RelayState::On);
    assert!(rig.coils.is_energized(relay(1)));

    rig.poll(1_099);
    assert_eq!(rig.state(1), RelayState::On);

    rig.poll(1_100);
    assert_eq!(rig.state(1), RelayState::Off);
    assert_eq!(
        rig.coils.calls,
        vec![
            CoilCall::DeEnergize(relay(1)),
            CoilCall::Energize(relay(1)),
            CoilCall::DeEnergize(relay(1)),
        ],
        "only relay 1 is touched"
    );
    assert_eq!(rig.acks.lines, vec![BATCH_ACK.to_owned()]);
}

// ── Mixed batch with an out-of-range entry ────────────────────

#[test]
fn out_of_range_entry_does_not_abort_batch() {
    let mut rig = Rig::new();
    rig.send("OPEN:5:50:200,99:10:10,7:0:30", 0);

    assert_eq!(
        rig.ctl.registry().phase(relay(5)),
        Phase::Pending {
            deadline: 50,
            duration_ms: 200
        }
    );
    assert_eq!(
        rig.ctl.registry().phase(relay(7)),
        Phase::Pending {
            deadline: 0,
            duration_ms: 30
        }
    );
    assert_eq!(rig.ctl.registry().pending_count(), 2);
    assert_eq!(rig.acks.lines.len(), 1);

    assert!(rig.events.events.contains(&AppEvent::EntryRejected {
        position: 1,
        reason: EntryError::RelayOutOfRange(99),
    }));
    assert!(rig.events.events.contains(&AppEvent::BatchQueued(BatchSummary {
        accepted: 2,
        rejected: 1,
    })));

    rig.poll(0);
    assert_eq!(rig.state(7), RelayState::On);
    assert_eq!(rig.state(5), RelayState::Pending);
    rig.poll(30);
    assert_eq!(rig.state(7), RelayState::Off);
    rig.poll(50);
    assert_eq!(rig.state(5), RelayState::On);
    rig.poll(250);
    assert_eq!(rig.state(5), RelayState::Off);
    assert!(rig.ctl.is_idle());
}

#[test]
fn each_rejection_and_batch_is_reported_once() {
    let mut rig = Rig::new();
    rig.send("OPEN:0:1:1,3:x:5,4:0:10", 0);

    let rejected: Vec<_> = rig
        .events
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::EntryRejected { .. }))
        .collect();
    assert_eq!(
        rejected,
        [
            &AppEvent::EntryRejected {
                position: 0,
                reason: EntryError::RelayOutOfRange(0),
            },
            &AppEvent::EntryRejected {
                position: 1,
                reason: EntryError::InvalidWait,
            },
        ]
    );
    let batches = rig
        .events
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::BatchQueued(_)))
        .count();
    assert_eq!(batches, 1);
    assert_eq!(rig.ctl.stats().entries_rejected, 2);
}

// ── Last write wins ───────────────────────────────────────────

#[test]
fn new_command_replaces_pending_schedule() {
    let mut rig = Rig::new();
    rig.send("OPEN:3:100:500", 0);
    rig.send("OPEN:3:300:50", 50);

    rig.poll(100);
    assert_eq!(rig.state(3), RelayState::Pending, "old deadline discarded");
    rig.poll(350);
    assert_eq!(rig.state(3), RelayState::On);
    rig.poll(400);
    assert_eq!(rig.state(3), RelayState::Off, "new duration applies");
}

#[test]
fn new_command_releases_energised_relay() {
    let mut rig = Rig::new();
    rig.send("OPEN:3:0:1000", 0);
    rig.poll(0);
    assert!(rig.coils.is_energized(relay(3)));

    rig.send("OPEN:3:100:20", 10);
    assert!(!rig.coils.is_energized(relay(3)), "released while pending");
    assert_eq!(rig.state(3), RelayState::Pending);

    rig.poll(109);
    assert_eq!(rig.state(3), RelayState::Pending);
    rig.poll(110);
    assert_eq!(rig.state(3), RelayState::On);
    rig.poll(130);
    assert_eq!(rig.state(3), RelayState::Off);
}

#[test]
fn duplicate_relay_in_one_batch_keeps_last_entry() {
    let mut rig = Rig::new();
    rig.send("OPEN:4:10:100,4:500:20", 0);
    assert_eq!(
        rig.ctl.registry().phase(relay(4)),
        Phase::Pending {
            deadline: 500,
            duration_ms: 20
        }
    );
}

// ── Zero duration ─────────────────────────────────────────────

#[test]
fn zero_duration_never_energises() {
    let mut rig = Rig::new();
    rig.send("OPEN:2:0:0", 0);
    for now in [0, 1, 100, 10_000, u32::MAX / 2] {
        rig.poll(now);
    }
    assert!(!rig
        .coils
        .calls_for(relay(2))
        .contains(&CoilCall::Energize(relay(2))));
    assert_eq!(rig.state(2), RelayState::Off);
    assert!(rig.events.events.contains(&AppEvent::RelayCleared(relay(2))));
    assert_eq!(rig.acks.lines.len(), 1, "still acknowledged");
}

#[test]
fn zero_duration_cancels_active_relay() {
    let mut rig = Rig::new();
    rig.send("OPEN:8:0:5000", 0);
    rig.poll(0);
    assert!(rig.coils.is_energized(relay(8)));

    rig.send("OPEN:8:0:0", 100);
    assert!(!rig.coils.is_energized(relay(8)));
    rig.poll(200);
    rig.poll(6_000);
    assert_eq!(rig.state(8), RelayState::Off);
    assert!(!rig.coils.is_energized(relay(8)));
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn completed_cycle_is_quiet_afterwards() {
    let mut rig = Rig::new();
    rig.send("OPEN:12:5:10", 0);
    rig.poll(5);
    rig.poll(15);
    assert_eq!(rig.ctl.registry().phase(relay(12)), Phase::Off);

    let before = rig.coils.calls.len();
    for now in (16..5_000).step_by(97) {
        let report = rig.ctl.poll(now, &mut rig.coils, &mut rig.events);
        assert!(report.is_quiet());
    }
    assert_eq!(rig.coils.calls.len(), before);
    assert_eq!(rig.ctl.stats().activations, 1);
}

// ── Acknowledgement policy ────────────────────────────────────

#[test]
fn one_ack_per_batch_line() {
    let mut rig = Rig::new();
    rig.send("OPEN:", 0);
    rig.send("OPEN:99:1:1", 0);
    rig.send("OPEN:1:0:10,2:0:10,3:0:10", 0);
    assert_eq!(rig.acks.lines, vec![BATCH_ACK.to_owned(); 3]);
    assert_eq!(rig.ctl.stats().batches, 3);
}

#[test]
fn unrecognised_lines_are_silent() {
    let mut rig = Rig::new();
    rig.send("HELLO", 0);
    rig.send("open:1:0:10", 0);
    rig.send("", 0);
    assert!(rig.acks.lines.is_empty());
    assert!(rig.coils.calls.is_empty());
    assert!(rig.ctl.is_idle());
    assert_eq!(rig.ctl.stats().lines_ignored, 3);
}

#[test]
fn malformed_entries_are_counted_not_surfaced() {
    let mut rig = Rig::new();
    rig.send("OPEN:1:10,x:0:10,2:-5:10,3:0:abc,4:0:10", 0);
    assert_eq!(rig.acks.lines.len(), 1);
    assert_eq!(rig.ctl.registry().pending_count(), 1);
    assert_eq!(rig.ctl.stats().entries_rejected, 4);
    assert_eq!(rig.ctl.stats().entries_accepted, 1);
}

// ── Framing ───────────────────────────────────────────────────

#[test]
fn line_split_across_reads() {
    let mut rig = Rig::new();
    for part in [&b"OPE"[..], b"N:6:0:4", b"0\r", b"\n"] {
        rig.ctl
            .ingest(part, 0, &mut rig.coils, &mut rig.acks, &mut rig.events);
    }
    assert_eq!(
        rig.ctl.registry().phase(relay(6)),
        Phase::Pending {
            deadline: 0,
            duration_ms: 40
        }
    );
    assert_eq!(rig.acks.lines.len(), 1);
}

#[test]
fn several_lines_in_one_read() {
    let mut rig = Rig::new();
    rig.ctl.ingest(
        b"OPEN:1:0:10\nOPEN:2:0:10\n",
        0,
        &mut rig.coils,
        &mut rig.acks,
        &mut rig.events,
    );
    assert_eq!(rig.acks.lines.len(), 2);
    assert_eq!(rig.ctl.registry().pending_count(), 2);
}

#[test]
fn overlong_line_is_dropped_and_stream_recovers() {
    let mut rig = Rig::new();
    let mut junk = b"OPEN:".to_vec();
    junk.extend(std::iter::repeat_n(b'1', LINE_CAPACITY + 10));
    junk.push(b'\n');
    rig.ctl
        .ingest(&junk, 0, &mut rig.coils, &mut rig.acks, &mut rig.events);
    assert!(rig.acks.lines.is_empty());
    assert_eq!(rig.ctl.stats().lines_discarded, 1);

    rig.send("OPEN:9:0:10", 0);
    assert_eq!(rig.acks.lines.len(), 1);
    assert_eq!(rig.state(9), RelayState::Pending);
}

// ── Clock wrap ────────────────────────────────────────────────

#[test]
fn schedule_across_clock_wrap() {
    let mut rig = Rig::new();
    let t0 = u32::MAX - 10;
    rig.send("OPEN:1:20:5", t0);

    rig.poll(u32::MAX);
    assert_eq!(rig.state(1), RelayState::Pending);
    rig.poll(9);
    assert_eq!(rig.state(1), RelayState::On);
    rig.poll(13);
    assert_eq!(rig.state(1), RelayState::On);
    rig.poll(14);
    assert_eq!(rig.state(1), RelayState::Off);
}

// ── Round trip ────────────────────────────────────────────────

#[test]
fn pending_schedule_reproduces_entry() {
    let mut rig = Rig::new();
    let received_at = 77_000;
    rig.send("OPEN:30:1500:250,2:0:9", received_at);

    let e30 = rig.ctl.pending_entry(relay(30), received_at).unwrap();
    assert_eq!((e30.wait_ms, e30.duration_ms), (1500, 250));
    let e2 = rig.ctl.pending_entry(relay(2), received_at).unwrap();
    assert_eq!(e2.to_string(), "2:0:9");
    assert!(rig.ctl.pending_entry(relay(3), received_at).is_none());
}

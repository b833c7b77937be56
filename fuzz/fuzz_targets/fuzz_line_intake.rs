//! Fuzz target: serial intake
//!
//! Drives arbitrary byte sequences through `LineBuffer` and every line it
//! yields through the batch parser and the controller, then polls the
//! scheduler across the whole clock range.  Asserts that nothing panics,
//! that accepted entries are always in range, and that each batch line
//! produces exactly one acknowledgement.
//!
//! cargo fuzz run fuzz_line_intake

#![no_main]

use libfuzzer_sys::fuzz_target;
use relaybank::app::events::AppEvent;
use relaybank::app::ports::{EventSink, RelayDriver, Responder};
use relaybank::app::service::RelayController;
use relaybank::command::{parse_batch, Intake, LineBuffer, LINE_CAPACITY};
use relaybank::relay::RelayId;
use relaybank::time::MAX_WAIT_MS;

struct Null;

impl RelayDriver for Null {
    fn energize(&mut self, _relay: RelayId) {}
    fn de_energize(&mut self, _relay: RelayId) {}
    fn is_energized(&self, _relay: RelayId) -> bool {
        false
    }
}

impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

#[derive(Default)]
struct Acks(usize);

impl Responder for Acks {
    fn send_line(&mut self, _line: &str) {
        self.0 += 1;
    }
}

fuzz_target!(|data: &[u8]| {
    // Parser invariants, line by line.
    let mut lines = LineBuffer::new();
    let mut batch_lines = 0;
    for &byte in data {
        if let Some(Intake::Line(line)) = lines.feed(byte) {
            assert!(line.len() <= LINE_CAPACITY);
            if let Some(batch) = parse_batch(line) {
                batch_lines += 1;
                for entry in batch.flatten() {
                    assert!((1..=32).contains(&entry.relay.number()));
                    assert!(entry.wait_ms <= MAX_WAIT_MS);
                }
            }
        }
    }

    // Same bytes through the controller.
    let mut ctl = RelayController::new();
    let mut acks = Acks::default();
    ctl.ingest(data, 0, &mut Null, &mut acks, &mut Null);
    assert_eq!(acks.0, batch_lines, "one acknowledgement per batch line");

    for now in (0..=u32::MAX).step_by(1 << 26) {
        ctl.poll(now, &mut Null, &mut Null);
    }
});

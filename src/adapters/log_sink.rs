//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF logger in production, which goes to the
//! debug console, never to the command UART).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { relays } => {
                info!("START | {} relays released", relays);
            }
            AppEvent::BatchQueued(s) => {
                info!("BATCH | accepted={} rejected={}", s.accepted, s.rejected);
            }
            AppEvent::EntryRejected { position, reason } => {
                debug!("BATCH | entry #{} dropped: {}", position, reason);
            }
            AppEvent::RelayScheduled {
                relay,
                deadline,
                duration_ms,
            } => {
                debug!(
                    "RELAY | {:>2} pending, due t={} for {}ms",
                    relay, deadline, duration_ms
                );
            }
            AppEvent::RelayCleared(relay) => {
                debug!("RELAY | {:>2} cleared (zero duration)", relay);
            }
            AppEvent::RelayEnergized { relay, at } => {
                info!("RELAY | {:>2} ON  t={} (GPIO {})", relay, at, relay.pin());
            }
            AppEvent::RelayReleased { relay, at } => {
                info!("RELAY | {:>2} OFF t={} (GPIO {})", relay, at, relay.pin());
            }
            AppEvent::LineDiscarded(reason) => {
                debug!("INTAKE | line discarded: {:?}", reason);
            }
        }
    }
}

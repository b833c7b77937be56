//! Relaybank Firmware: Main Entry Point
//!
//! Hexagonal architecture driven by a single cooperative polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  RelayOutputs     LogEventSink   SerialResponder  MonotonicClock│
//! │  (RelayDriver)    (EventSink)    (Responder)      (ClockPort)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           RelayController (pure logic)                 │    │
//! │  │  LineBuffer · Batch parser · Relay registry            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven) · Watchdog                        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use relaybank::adapters::hardware::RelayOutputs;
use relaybank::adapters::log_sink::LogEventSink;
use relaybank::adapters::serial::SerialResponder;
use relaybank::adapters::time::MonotonicClock;
use relaybank::app::ports::ClockPort;
use relaybank::app::service::RelayController;
use relaybank::config::{SystemConfig, MAX_READ_CHUNK};
use relaybank::drivers::hw_init;
use relaybank::drivers::watchdog::Watchdog;
use relaybank::error::SerialError;
use relaybank::pins::RELAY_COUNT;
use relaybank::transport::Transport;

#[cfg(target_os = "espidf")]
use relaybank::adapters::serial::UartTransport;
#[cfg(not(target_os = "espidf"))]
use relaybank::adapters::serial::StdioTransport;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Relaybank v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    info!(
        "Config: {} baud, active-{} relays, poll every {}ms",
        config.baud_rate,
        if config.relay_active_low { "low" } else { "high" },
        config.poll_interval_ms
    );

    // ── 3. Hardware ───────────────────────────────────────────
    // Pins are parked at the OFF level before they become outputs, so
    // no coil clicks during boot.
    hw_init::init_relay_outputs(config.relay_active_low)?;
    let mut relays = RelayOutputs::board(config.relay_active_low);
    let mut link = open_link(&config)?;
    let clock = MonotonicClock::new();
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 4. Controller ─────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut controller = RelayController::new();
    controller.start(&mut relays, &mut sink);

    info!("{} relays ready. Entering poll loop.", RELAY_COUNT);

    // ── 5. Poll loop ──────────────────────────────────────────
    let mut buf = [0u8; MAX_READ_CHUNK];
    let chunk = config.uart_read_chunk.min(MAX_READ_CHUNK);
    let mut link_open = true;

    loop {
        if link_open {
            let now = clock.now_ms();
            match link.read(&mut buf[..chunk]) {
                Ok(0) => {}
                Ok(n) => {
                    let mut responder = SerialResponder::new(&mut link);
                    controller.ingest(&buf[..n], now, &mut relays, &mut responder, &mut sink);
                }
                Err(SerialError::Disconnected) => {
                    info!("Serial link closed; finishing scheduled relays");
                    link_open = false;
                }
                Err(e) => warn!("Serial read failed: {}", e),
            }
        }

        controller.poll(clock.now_ms(), &mut relays, &mut sink);
        watchdog.feed();

        if !link_open && controller.is_idle() {
            break;
        }

        if config.poll_interval_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.poll_interval_ms,
            )));
        }
    }

    info!("All relays released. Stats: {:?}", controller.stats());
    Ok(())
}

// ── Bootstrap helpers ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

/// Log to stderr; stdout carries the serial protocol in the simulator.
#[cfg(not(target_os = "espidf"))]
fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("logger init failed: {e}"))
}

/// Built-in defaults, or a JSON override from `RELAYBANK_CONFIG` on the
/// host.  A rejected override falls back to defaults.
fn load_config() -> SystemConfig {
    #[cfg(not(target_os = "espidf"))]
    {
        if let Ok(json) = std::env::var("RELAYBANK_CONFIG") {
            match SystemConfig::from_json(&json) {
                Ok(config) => {
                    info!("Config loaded from RELAYBANK_CONFIG");
                    return config;
                }
                Err(e) => warn!("RELAYBANK_CONFIG rejected ({}), using defaults", e),
            }
        }
    }
    SystemConfig::default()
}

#[cfg(target_os = "espidf")]
fn open_link(config: &SystemConfig) -> Result<UartTransport> {
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let uart = UartTransport::new(peripherals.uart1, config.baud_rate)
        .map_err(relaybank::error::Error::from)?;
    Ok(uart)
}

#[cfg(not(target_os = "espidf"))]
fn open_link(config: &SystemConfig) -> Result<StdioTransport> {
    info!("Serial(sim): stdin/stdout at nominal {} baud", config.baud_rate);
    Ok(StdioTransport::new())
}

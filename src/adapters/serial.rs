//! Serial link adapters.
//!
//! - **`target_os = "espidf"`**: [`UartTransport`] over the ESP-IDF UART
//!   driver, non-blocking reads on UART1.
//! - **`not(target_os = "espidf")`**: [`StdioTransport`] so the host
//!   simulator can be driven from a terminal or a pipe.
//!
//! [`SerialResponder`] sits on top of either and implements the
//! [`Responder`] port.

use log::warn;

use crate::app::ports::Responder;
use crate::transport::{write_all, Transport};

#[cfg(not(target_os = "espidf"))]
use crate::error::SerialError;

// ───────────────────────────────────────────────────────────────
// Responder over any transport
// ───────────────────────────────────────────────────────────────

/// Line terminator the host reads up to.
pub const LINE_END: &[u8] = b"\r\n";

/// Writes response lines to a [`Transport`].
pub struct SerialResponder<'a, T: Transport> {
    link: &'a mut T,
}

impl<'a, T: Transport> SerialResponder<'a, T> {
    pub fn new(link: &'a mut T) -> Self {
        Self { link }
    }
}

impl<T: Transport> Responder for SerialResponder<'_, T> {
    fn send_line(&mut self, line: &str) {
        if let Err(e) = write_line(self.link, line) {
            warn!("Serial: response dropped: {:?}", e);
        }
    }
}

fn write_line<T: Transport>(link: &mut T, line: &str) -> Result<(), T::Error> {
    write_all(link, line.as_bytes())?;
    write_all(link, LINE_END)?;
    link.flush()
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF UART
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_hal::delay::{BLOCK, NON_BLOCK};
    use esp_idf_hal::gpio::AnyIOPin;
    use esp_idf_hal::uart::{config::Config, UartDriver, UART1};
    use esp_idf_hal::units::Hertz;
    use log::info;

    use crate::error::SerialError;
    use crate::pins::{UART_RX_GPIO, UART_TX_GPIO};
    use crate::transport::Transport;

    /// Command link on UART1.
    pub struct UartTransport {
        driver: UartDriver<'static>,
    }

    impl UartTransport {
        pub fn new(uart: UART1, baud_rate: u32) -> Result<Self, SerialError> {
            // SAFETY: the UART pins are reserved for this driver and
            // never handed out through `Peripherals`.
            let (tx, rx) = unsafe { (AnyIOPin::new(UART_TX_GPIO), AnyIOPin::new(UART_RX_GPIO)) };
            let config = Config::default().baudrate(Hertz(baud_rate));
            let driver = UartDriver::new(
                uart,
                tx,
                rx,
                Option::<AnyIOPin>::None,
                Option::<AnyIOPin>::None,
                &config,
            )
            .map_err(|e| SerialError::OpenFailed(e.code()))?;
            info!(
                "UART1 up: {} baud, TX GPIO {}, RX GPIO {}",
                baud_rate, UART_TX_GPIO, UART_RX_GPIO
            );
            Ok(Self { driver })
        }
    }

    impl Transport for UartTransport {
        type Error = SerialError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
            self.driver
                .read(buf, NON_BLOCK)
                .map_err(|e| SerialError::ReadFailed(e.code()))
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
            self.driver
                .write(data)
                .map_err(|e| SerialError::WriteFailed(e.code()))
        }

        fn flush(&mut self) -> Result<(), SerialError> {
            self.driver
                .wait_tx_done(BLOCK)
                .map_err(|e| SerialError::WriteFailed(e.code()))
        }
    }
}

#[cfg(target_os = "espidf")]
pub use uart::UartTransport;

// ───────────────────────────────────────────────────────────────
// Host stdio
// ───────────────────────────────────────────────────────────────

/// Stdin/stdout link for the host simulator.
///
/// A reader thread forwards stdin chunks over a channel so `read` never
/// blocks the polling loop.  Once stdin hits EOF and every chunk has been
/// consumed, `read` reports [`SerialError::Disconnected`].
#[cfg(not(target_os = "espidf"))]
pub struct StdioTransport {
    rx: std::sync::mpsc::Receiver<Vec<u8>>,
    carry: Vec<u8>,
}

#[cfg(not(target_os = "espidf"))]
impl StdioTransport {
    pub fn new() -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            use std::io::Read;
            let mut stdin = std::io::stdin().lock();
            let mut chunk = [0u8; 256];
            loop {
                match stdin.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(chunk[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        Self {
            rx,
            carry: Vec::new(),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl Transport for StdioTransport {
    type Error = SerialError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        use std::sync::mpsc::TryRecvError;

        if self.carry.is_empty() {
            match self.rx.try_recv() {
                Ok(chunk) => self.carry = chunk,
                Err(TryRecvError::Empty) => return Ok(0),
                Err(TryRecvError::Disconnected) => return Err(SerialError::Disconnected),
            }
        }
        let n = buf.len().min(self.carry.len());
        buf[..n].copy_from_slice(&self.carry[..n]);
        self.carry.drain(..n);
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        use std::io::Write;
        std::io::stdout()
            .write(data)
            .map_err(|e| SerialError::WriteFailed(e.raw_os_error().unwrap_or(-1)))
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        use std::io::Write;
        std::io::stdout()
            .flush()
            .map_err(|e| SerialError::WriteFailed(e.raw_os_error().unwrap_or(-1)))
    }
}

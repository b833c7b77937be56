//! Transport abstraction: any byte-oriented channel.
//!
//! Concrete implementations:
//! - UART serial (ESP-IDF UART driver)
//! - stdin/stdout (host simulator)
//!
//! The main loop is generic over `Transport`, so a new link (USB CDC,
//! TCP) plugs in without touching the controller.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Write all of `data`, retrying partial writes.
///
/// Gives up (returning the count written so far) if the transport
/// accepts zero bytes, rather than spinning.
pub fn write_all<T: Transport + ?Sized>(link: &mut T, mut data: &[u8]) -> Result<usize, T::Error> {
    let total = data.len();
    while !data.is_empty() {
        let n = link.write(data)?;
        if n == 0 {
            return Ok(total - data.len());
        }
        data = &data[n..];
    }
    Ok(total)
}

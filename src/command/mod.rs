//! Serial command protocol.
//!
//! ```text
//! OPEN:<relay>:<wait_ms>:<duration_ms>[,<relay>:<wait_ms>:<duration_ms>...]\n
//! ```
//!
//! Bytes from the link are accumulated by [`LineBuffer`]; each completed
//! line goes to [`parse_batch`], which yields one result per entry so a
//! malformed entry never takes its siblings down with it.  The encoder
//! half builds the same lines on the host side.

pub mod encode;
pub mod line_buffer;
pub mod parser;

pub use encode::{encode_batch, staggered_batch, DEFAULT_OPEN_MS, DEFAULT_STAGGER_MS};
pub use line_buffer::{DiscardReason, Intake, LineBuffer, LINE_CAPACITY};
pub use parser::{parse_batch, parse_entry, Batch, RelayEntry, BATCH_ACK, BATCH_PREFIX};

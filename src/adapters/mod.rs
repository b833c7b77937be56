//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                         |
//! |------------|--------------|-------------------------------------|
//! | `hardware` | RelayDriver  | Relay GPIO bank (embedded-hal pins) |
//! | `log_sink` | EventSink    | `log` facade                        |
//! | `serial`   | Transport    | UART1 / host stdio                  |
//! |            | Responder    | Any `Transport`                     |
//! | `time`     | ClockPort    | ESP32 system timer                  |

pub mod hardware;
pub mod log_sink;
pub mod serial;
pub mod time;

//! Millisecond clock arithmetic.
//!
//! The relay clock is a `u32` millisecond counter that wraps roughly every
//! 49.7 days.  Deadlines are compared by signed difference, so a comparison
//! is correct as long as the two instants are less than `2^31` ms apart
//! (about 24.8 days).  Waits longer than that are rejected at parse time
//! ([`MAX_WAIT_MS`]); durations may use the full `u32` range because
//! elapsed time is measured with wrapping subtraction.
//!
//! Known limitation: a relay left PENDING for more than [`MAX_WAIT_MS`]
//! past its deadline without being polled would read as "not yet due".
//! The polling loop runs continuously, so this cannot happen in practice.

/// Milliseconds since boot, wrapping.
pub type Millis = u32;

/// Longest wait that can be compared unambiguously against the clock.
pub const MAX_WAIT_MS: u32 = i32::MAX as u32;

/// Absolute deadline `wait_ms` after `now`.
pub const fn deadline_after(now: Millis, wait_ms: u32) -> Millis {
    now.wrapping_add(wait_ms)
}

/// `true` once `now` is at or past `deadline`, tolerating one wraparound.
pub const fn deadline_reached(now: Millis, deadline: Millis) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Milliseconds elapsed since `since`.
pub const fn elapsed(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}

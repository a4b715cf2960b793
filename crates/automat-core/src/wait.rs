//! Blocking wait and settle helpers shared by all contexts.
//!
//! The whole engine is synchronous: resolution polls a backend at a bounded
//! rate until its effective timeout elapses, and settle delays are plain
//! sleeps. Timeout is the only bound on blocking duration.

use std::time::{Duration, Instant};

/// Polls `f` at `interval` until it yields a value or `timeout` elapses.
/// `f` always runs at least once, so a zero timeout still probes the
/// backend exactly once.
pub fn wait_until<T>(
    timeout: Duration,
    interval: Duration,
    mut f: impl FnMut() -> Option<T>,
) -> Option<T> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = f() {
            return Some(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        std::thread::sleep(interval.min(deadline - now));
    }
}

/// Settle delay ("differ") applied once immediately before a mutating
/// native action. Never applied before pure queries.
pub fn settle(differ: Duration) {
    if !differ.is_zero() {
        std::thread::sleep(differ);
    }
}

/// Descriptor override if present, otherwise the context default.
pub fn effective(override_value: Option<Duration>, default: Duration) -> Duration {
    override_value.unwrap_or(default)
}

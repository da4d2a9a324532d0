//! Host-side clock and delay for running on a desktop.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::traits::Clock;

/// Monotonic clock counting from its creation.
///
/// Clones share the same starting point.
///
/// ```rust
/// use numtx::hal::SystemClock;
/// use numtx::traits::Clock;
///
/// let clock = SystemClock::new();
/// assert!(clock.now_ms() < 1_000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Start counting now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Instant the clock counts from.
    pub fn start_time(&self) -> Instant {
        self.start
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Blocking delay backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

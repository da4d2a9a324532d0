//! Rotating number source: 1 through 9, advancing on a fixed interval.
//!
//! The value is a pure function of time elapsed since the source was created:
//! `((elapsed_ms / interval_ms) % 9) + 1`.
//!
//! # Example
//!
//! ```rust
//! use numtx::hal::MockClock;
//! use numtx::number::{NumberSource, RotatingNumber};
//!
//! let clock = MockClock::new();
//! let numbers = RotatingNumber::new(clock.clone());
//! assert_eq!(numbers.now(), 1);
//!
//! clock.advance(4_500);
//! assert_eq!(numbers.now(), 5);
//! assert_eq!(numbers.next_change_in_ms(), 500);
//! ```

use crate::traits::Clock;

/// The full sequence, in order.
pub const SEQUENCE: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Default time each number is shown.
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

/// Anything that can report the current number.
pub trait NumberSource {
    /// Current number, always within `1..=9`.
    fn now(&self) -> u8;
}

/// Clock-driven rotating number.
#[derive(Debug, Clone)]
pub struct RotatingNumber<C> {
    clock: C,
    start_ms: u64,
    interval_ms: u32,
}

impl<C: Clock> RotatingNumber<C> {
    /// Start rotating now, at the default interval.
    pub fn new(clock: C) -> Self {
        Self::with_interval(clock, DEFAULT_INTERVAL_MS)
    }

    /// Start rotating now, changing every `interval_ms` (zero is treated as 1).
    pub fn with_interval(clock: C, interval_ms: u32) -> Self {
        let start_ms = clock.now_ms();
        Self {
            clock,
            start_ms,
            interval_ms: interval_ms.max(1),
        }
    }

    /// Milliseconds since the rotation started.
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.start_ms)
    }

    /// Milliseconds until the number changes (1..=interval).
    pub fn next_change_in_ms(&self) -> u64 {
        let interval = u64::from(self.interval_ms);
        interval - self.elapsed_ms() % interval
    }

    /// Full passes through the sequence completed so far.
    pub fn total_cycles(&self) -> u64 {
        self.elapsed_ms() / (u64::from(self.interval_ms) * SEQUENCE.len() as u64)
    }

    /// Interval between changes.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// The underlying clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> NumberSource for RotatingNumber<C> {
    fn now(&self) -> u8 {
        let step = self.elapsed_ms() / u64::from(self.interval_ms);
        SEQUENCE[(step % SEQUENCE.len() as u64) as usize]
    }
}

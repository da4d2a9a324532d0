//! Shared state behind the number API.
//!
//! `NumberState` owns the rotating number and an optional link-quality
//! sampler. It is wrapped in an `Arc` and handed to every request handler.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use numtx::hal::{MockSignal, SystemClock};
//! use numtx::services::NumberState;
//!
//! let state = Arc::new(NumberState::new(SystemClock::new(), 1000).with_sampler(MockSignal::new(Some(-48))));
//!
//! assert!((1..=9).contains(&state.current_number()));
//! assert_eq!(state.sample_signal().unwrap().rssi, -48);
//! ```

use std::sync::{Mutex, PoisonError};

use crate::number::{NumberSource, RotatingNumber};
use crate::signal::SignalReport;
use crate::traits::{Clock, SignalSampler};

type BoxedSampler = Box<dyn SignalSampler + Send>;

/// Rotating number plus an optional signal sampler, shared across handlers.
///
/// The sampler sits behind a `Mutex` because sampling needs `&mut`; the
/// number needs no lock since it is computed from the clock on each read.
pub struct NumberState<C> {
    numbers: RotatingNumber<C>,
    sampler: Mutex<Option<BoxedSampler>>,
}

impl<C: Clock> NumberState<C> {
    /// Start the rotation now, changing every `interval_ms`.
    pub fn new(clock: C, interval_ms: u32) -> Self {
        Self {
            numbers: RotatingNumber::with_interval(clock, interval_ms),
            sampler: Mutex::new(None),
        }
    }

    /// Attach a link-quality sampler.
    pub fn with_sampler<S>(self, sampler: S) -> Self
    where
        S: SignalSampler + Send + 'static,
    {
        Self {
            sampler: Mutex::new(Some(Box::new(sampler))),
            ..self
        }
    }

    /// Current number (1-9).
    #[inline]
    pub fn current_number(&self) -> u8 {
        self.numbers.now()
    }

    /// Milliseconds since the state was created.
    #[inline]
    pub fn uptime_ms(&self) -> u64 {
        self.numbers.elapsed_ms()
    }

    /// The rotation itself, for timing details.
    pub fn numbers(&self) -> &RotatingNumber<C> {
        &self.numbers
    }

    /// Take and classify one signal sample.
    ///
    /// `None` when no sampler is attached or the sampler had no reading.
    pub fn sample_signal(&self) -> Option<SignalReport> {
        let mut guard = self
            .sampler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        guard.as_mut().and_then(|sampler| SignalReport::sample(&mut **sampler))
    }

    /// Whether a sampler is attached.
    pub fn has_sampler(&self) -> bool {
        self.sampler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

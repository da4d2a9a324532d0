//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware and network traits,
//! so the router, activation logic and accept loop can be exercised on a
//! desktop without a board or a radio.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockLed`] | [`Actuator`] | Records every write, can be made to fail |
//! | [`MockPin`] | [`OutputPin`] | Bare GPIO for [`PinLed`](crate::led::PinLed) |
//! | [`MockClock`] | [`Clock`] + [`DelayNs`] | Time that only moves when slept on |
//! | [`MockRadio`] | [`AccessPointRadio`] | Scripted activation behaviour |
//! | [`MockSignal`] | [`SignalSampler`] | Fixed or absent RSSI |
//! | `MockListener` | `Listener` | Queued connections (`std` only) |
//! | `MockConnection` | `Read` + `Write` | Canned request, captured response |
//!
//! # Example
//!
//! ```rust
//! use numtx::hal::MockLed;
//! use numtx::router::{LedRouter, PageInfo};
//! use numtx::traits::Actuator;
//!
//! let mut router = LedRouter::new(MockLed::new(), PageInfo::new("net", "dev"));
//! router.respond(b"GET /led/on HTTP/1.1\r\n\r\n");
//!
//! let led = router.into_inner();
//! assert!(led.read());
//! assert_eq!(led.history, vec![true]);
//! ```
//!
//! [`Actuator`]: crate::traits::Actuator
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`Clock`]: crate::traits::Clock
//! [`DelayNs`]: embedded_hal::delay::DelayNs
//! [`AccessPointRadio`]: crate::traits::AccessPointRadio
//! [`SignalSampler`]: crate::traits::SignalSampler

extern crate alloc;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use crate::config::AccessPointConfig;
use crate::traits::{AccessPointRadio, Actuator, Clock, InterfaceStatus, SignalSampler};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock LED for testing.
///
/// Records every successful write. Use the public fields to inspect what the
/// code under test did.
///
/// # Example
///
/// ```rust
/// use numtx::hal::MockLed;
/// use numtx::traits::Actuator;
///
/// let mut led = MockLed::new();
/// led.set(true).unwrap();
/// led.toggle().unwrap();
///
/// assert!(!led.read());
/// assert_eq!(led.writes, 2);
/// assert_eq!(led.history, vec![true, false]);
/// ```
#[derive(Debug, Default)]
pub struct MockLed {
    /// Current output level.
    pub on: bool,
    /// Number of successful writes.
    pub writes: usize,
    /// Every level written, in order.
    pub history: Vec<bool>,
    /// When set, every write fails and the level is left alone.
    pub fail: bool,
}

impl MockLed {
    /// Creates a new mock LED, off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Actuator for MockLed {
    type Error = &'static str;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        if self.fail {
            return Err("led write failed");
        }
        self.on = on;
        self.writes += 1;
        self.history.push(on);
        Ok(())
    }

    fn read(&self) -> bool {
        self.on
    }
}

/// Error returned by [`MockPin`] when writes are set to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Mock GPIO output pin.
///
/// # Example
///
/// ```rust
/// use embedded_hal::digital::OutputPin;
/// use numtx::hal::MockPin;
///
/// let mut pin = MockPin::new();
/// assert_eq!(pin.level(), None);
/// pin.set_high().unwrap();
/// assert_eq!(pin.level(), Some(true));
/// ```
#[derive(Debug, Default)]
pub struct MockPin {
    level: Option<bool>,
    fail: bool,
}

impl MockPin {
    /// Creates a pin that has never been driven.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level driven, `None` if never written.
    pub fn level(&self) -> Option<bool> {
        self.level
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail = fail;
    }

    fn drive(&mut self, high: bool) -> Result<(), MockPinError> {
        if self.fail {
            return Err(MockPinError);
        }
        self.level = Some(high);
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// Mock clock for testing.
///
/// Time only moves when something sleeps on it (it is also a [`DelayNs`])
/// or when the test moves it. Clones share the same time, so one copy can be
/// handed out as the clock and another as the delay.
///
/// # Example
///
/// ```rust
/// use embedded_hal::delay::DelayNs;
/// use numtx::hal::MockClock;
/// use numtx::traits::Clock;
///
/// let clock = MockClock::new();
/// let mut delay = clock.clone();
/// assert_eq!(clock.now_ms(), 0);
///
/// delay.delay_ms(500);
/// assert_eq!(clock.now_ms(), 500);
///
/// clock.set(1000);
/// clock.advance(250);
/// assert_eq!(clock.now_ms(), 1250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    elapsed_ns: Rc<Cell<u64>>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.elapsed_ns.set(ms.saturating_mul(1_000_000));
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance(&self, ms: u64) {
        self.advance_ns(ms.saturating_mul(1_000_000));
    }

    fn advance_ns(&self, ns: u64) {
        self.elapsed_ns
            .set(self.elapsed_ns.get().saturating_add(ns));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance_ns(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(u64::from(ms));
    }
}

// ============================================================================
// Network Mocks
// ============================================================================

/// Mock access-point radio.
///
/// By default the interface is up as soon as it is enabled. Builders script
/// slower or failing radios.
///
/// # Example
///
/// ```rust
/// use numtx::config::AccessPointConfig;
/// use numtx::hal::MockRadio;
/// use numtx::traits::AccessPointRadio;
///
/// let mut radio = MockRadio::new().activates_after_polls(1);
/// radio.enable().unwrap();
/// radio.apply(&AccessPointConfig::default()).unwrap();
///
/// assert!(!radio.is_active()); // first poll
/// assert!(radio.is_active());
/// ```
#[derive(Debug, Default)]
pub struct MockRadio {
    /// Whether the radio is powered.
    pub enabled: bool,
    /// Number of `enable` calls.
    pub enable_calls: usize,
    /// Number of `apply` calls.
    pub apply_calls: usize,
    /// Number of `disable` calls.
    pub disable_calls: usize,
    /// Last configuration applied.
    pub applied_config: Option<AccessPointConfig>,
    /// Polls answered "not yet" before reporting active (`None` = never).
    polls_before_active: Option<usize>,
    polls: Cell<usize>,
    apply_error: Option<&'static str>,
    disable_error: Option<&'static str>,
}

impl MockRadio {
    /// Radio that is active as soon as it is enabled.
    pub fn new() -> Self {
        Self {
            polls_before_active: Some(0),
            ..Default::default()
        }
    }

    /// Report inactive for the first `polls` checks after enabling.
    pub fn activates_after_polls(mut self, polls: usize) -> Self {
        self.polls_before_active = Some(polls);
        self
    }

    /// Never report active.
    pub fn never_activates(mut self) -> Self {
        self.polls_before_active = None;
        self
    }

    /// Fail every `apply` with `message`.
    pub fn failing_apply(mut self, message: &'static str) -> Self {
        self.apply_error = Some(message);
        self
    }

    /// Fail every `disable` with `message`, leaving the radio powered.
    pub fn failing_disable(mut self, message: &'static str) -> Self {
        self.disable_error = Some(message);
        self
    }

    /// Number of `is_active` checks made while enabled.
    pub fn polls(&self) -> usize {
        self.polls.get()
    }
}

impl AccessPointRadio for MockRadio {
    type Error = &'static str;

    fn enable(&mut self) -> Result<(), Self::Error> {
        self.enable_calls += 1;
        self.enabled = true;
        self.polls.set(0);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.disable_calls += 1;
        if let Some(message) = self.disable_error {
            return Err(message);
        }
        self.enabled = false;
        Ok(())
    }

    fn apply(&mut self, config: &AccessPointConfig) -> Result<(), Self::Error> {
        self.apply_calls += 1;
        if let Some(message) = self.apply_error {
            return Err(message);
        }
        self.applied_config = Some(config.clone());
        Ok(())
    }

    fn is_active(&self) -> bool {
        if !self.enabled {
            return false;
        }
        let polls = self.polls.get();
        self.polls.set(polls + 1);
        self.polls_before_active
            .is_some_and(|needed| polls >= needed)
    }

    fn interface_status(&self) -> Result<InterfaceStatus, Self::Error> {
        if self.enabled && self.applied_config.is_some() {
            Ok(InterfaceStatus::soft_ap_default())
        } else {
            Ok(InterfaceStatus::inactive())
        }
    }
}

/// Mock link-quality sampler.
///
/// # Example
///
/// ```rust
/// use numtx::hal::MockSignal;
/// use numtx::traits::SignalSampler;
///
/// let mut signal = MockSignal::new(Some(-62));
/// assert_eq!(signal.read_rssi(), Some(-62));
/// assert_eq!(signal.reads, 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockSignal {
    /// Reading returned by every sample.
    pub rssi: Option<i16>,
    /// Number of samples taken.
    pub reads: usize,
}

impl MockSignal {
    /// Sampler that always returns `rssi`.
    pub fn new(rssi: Option<i16>) -> Self {
        Self { rssi, reads: 0 }
    }
}

impl SignalSampler for MockSignal {
    fn read_rssi(&mut self) -> Option<i16> {
        self.reads += 1;
        self.rssi
    }
}

// ============================================================================
// Socket Mocks (std)
// ============================================================================

#[cfg(feature = "std")]
pub use self::net::{ConnectionProbe, MockConnection, MockListener};

#[cfg(feature = "std")]
mod net {
    use std::collections::VecDeque;
    use std::io::{self, Read, Write};
    use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};

    use crate::server::Listener;

    /// Observer for a [`MockConnection`] that outlives it.
    ///
    /// The accept loop drops each connection when it is done with it; the
    /// probe keeps the written bytes and records that the drop happened.
    #[derive(Debug, Clone, Default)]
    pub struct ConnectionProbe {
        output: Arc<Mutex<Vec<u8>>>,
        closed: Arc<AtomicBool>,
    }

    impl ConnectionProbe {
        /// Everything written to the connection.
        pub fn output(&self) -> Vec<u8> {
            self.output
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Written bytes as text (lossy).
        pub fn output_text(&self) -> String {
            String::from_utf8_lossy(&self.output()).into_owned()
        }

        /// Whether the connection has been dropped.
        pub fn is_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }

    /// In-memory client connection.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::io::{Read, Write};
    /// use numtx::hal::MockConnection;
    ///
    /// let mut conn = MockConnection::new(b"GET / HTTP/1.1\r\n\r\n");
    /// let probe = conn.probe();
    ///
    /// let mut buf = [0u8; 64];
    /// let n = conn.read(&mut buf).unwrap();
    /// assert_eq!(&buf[..n], b"GET / HTTP/1.1\r\n\r\n");
    ///
    /// conn.write_all(b"reply").unwrap();
    /// drop(conn);
    /// assert_eq!(probe.output(), b"reply");
    /// assert!(probe.is_closed());
    /// ```
    #[derive(Debug)]
    pub struct MockConnection {
        input: Vec<u8>,
        pos: usize,
        read_error: Option<io::ErrorKind>,
        write_error: Option<io::ErrorKind>,
        probe: ConnectionProbe,
    }

    impl MockConnection {
        /// Connection whose client sends `request` and then waits.
        pub fn new(request: &[u8]) -> Self {
            Self {
                input: request.to_vec(),
                pos: 0,
                read_error: None,
                write_error: None,
                probe: ConnectionProbe::default(),
            }
        }

        /// Every read fails with `kind`.
        pub fn failing_read(mut self, kind: io::ErrorKind) -> Self {
            self.read_error = Some(kind);
            self
        }

        /// Every write fails with `kind`.
        pub fn failing_write(mut self, kind: io::ErrorKind) -> Self {
            self.write_error = Some(kind);
            self
        }

        /// Observer that stays valid after the connection is dropped.
        pub fn probe(&self) -> ConnectionProbe {
            self.probe.clone()
        }
    }

    impl Read for MockConnection {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(kind) = self.read_error {
                return Err(io::Error::new(kind, "mock read failure"));
            }
            let remaining = &self.input[self.pos..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl Write for MockConnection {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Some(kind) = self.write_error {
                return Err(io::Error::new(kind, "mock write failure"));
            }
            self.probe
                .output
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for MockConnection {
        fn drop(&mut self) {
            self.probe.closed.store(true, Ordering::SeqCst);
        }
    }

    /// Listener that hands out queued connections.
    ///
    /// Once the queue is empty, `accept` fails with `Interrupted`, which the
    /// accept loop treats as a shutdown signal.
    ///
    /// # Example
    ///
    /// ```rust
    /// use numtx::hal::{MockConnection, MockListener};
    ///
    /// let mut listener = MockListener::new();
    /// listener.push(MockConnection::new(b"GET / HTTP/1.1\r\n\r\n"));
    /// assert_eq!(listener.pending(), 1);
    /// ```
    #[derive(Debug, Default)]
    pub struct MockListener {
        queue: VecDeque<io::Result<MockConnection>>,
        /// Number of `accept` calls made.
        pub accepts: usize,
    }

    impl MockListener {
        /// Listener with nothing queued.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a connection and return a probe for it.
        pub fn push(&mut self, connection: MockConnection) -> ConnectionProbe {
            let probe = connection.probe();
            self.queue.push_back(Ok(connection));
            probe
        }

        /// Queue a client sending `request`.
        pub fn push_request(&mut self, request: &[u8]) -> ConnectionProbe {
            self.push(MockConnection::new(request))
        }

        /// Queue an `accept` failure.
        pub fn push_error(&mut self, kind: io::ErrorKind) {
            self.queue
                .push_back(Err(io::Error::new(kind, "mock accept failure")));
        }

        /// Entries still queued.
        pub fn pending(&self) -> usize {
            self.queue.len()
        }
    }

    impl Listener for MockListener {
        type Connection = MockConnection;

        fn accept(&mut self) -> io::Result<(MockConnection, SocketAddr)> {
            self.accepts += 1;
            let peer = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(192, 168, 4, 2), 49152));
            match self.queue.pop_front() {
                Some(Ok(connection)) => Ok((connection, peer)),
                Some(Err(e)) => Err(e),
                None => Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "no more mock connections",
                )),
            }
        }
    }
}

//! Device I/O driver: the single LED output and its indicator patterns.
//!
//! [`PinLed`] turns any `embedded-hal` output pin into an [`Actuator`]. The
//! output state is tracked in software, so [`Actuator::read`] always reports
//! the last successfully applied value.
//!
//! # Example
//!
//! ```rust
//! use numtx::led::{blink, PinLed, STARTUP_PATTERN};
//! use numtx::hal::{MockClock, MockPin};
//! use numtx::traits::Actuator;
//!
//! let mut led = PinLed::new(MockPin::new()).unwrap();
//! let mut delay = MockClock::new();
//!
//! blink(&mut led, &mut delay, STARTUP_PATTERN).unwrap();
//! assert!(!led.read());
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::traits::Actuator;

/// A blink pattern: `times` pulses of `on_ms` followed by `off_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlinkPattern {
    /// Number of pulses.
    pub times: u8,
    /// Time on per pulse.
    pub on_ms: u32,
    /// Time off after each pulse.
    pub off_ms: u32,
}

impl BlinkPattern {
    /// Total time the pattern takes.
    pub const fn duration_ms(&self) -> u32 {
        self.times as u32 * (self.on_ms + self.off_ms)
    }
}

/// Shown once the access point is up and the server is about to listen.
pub const STARTUP_PATTERN: BlinkPattern = BlinkPattern {
    times: 3,
    on_ms: 200,
    off_ms: 200,
};

/// Shown when startup fails (no display to report on).
pub const FAILURE_PATTERN: BlinkPattern = BlinkPattern {
    times: 5,
    on_ms: 100,
    off_ms: 100,
};

/// Play `pattern` on `led`. The LED is off when this returns `Ok`.
pub fn blink<A, D>(led: &mut A, delay: &mut D, pattern: BlinkPattern) -> Result<(), A::Error>
where
    A: Actuator + ?Sized,
    D: DelayNs + ?Sized,
{
    for _ in 0..pattern.times {
        led.set(true)?;
        delay.delay_ms(pattern.on_ms);
        led.set(false)?;
        delay.delay_ms(pattern.off_ms);
    }
    led.off()
}

/// LED driven by an `embedded-hal` output pin.
///
/// Starts OFF: construction drives the pin to its inactive level.
#[derive(Debug)]
pub struct PinLed<P> {
    pin: P,
    on: bool,
    active_low: bool,
}

impl<P: OutputPin> PinLed<P> {
    /// LED lit when the pin is high.
    pub fn new(pin: P) -> Result<Self, P::Error> {
        Self::with_polarity(pin, false)
    }

    /// LED lit when the pin is low (common for on-board LEDs wired to VCC).
    pub fn active_low(pin: P) -> Result<Self, P::Error> {
        Self::with_polarity(pin, true)
    }

    fn with_polarity(pin: P, active_low: bool) -> Result<Self, P::Error> {
        let mut led = Self {
            pin,
            on: true,
            active_low,
        };
        led.set(false)?;
        Ok(led)
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Actuator for PinLed<P> {
    type Error = P::Error;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        // State only changes once the pin write succeeded
        if on != self.active_low {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }

    fn read(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockClock, MockLed, MockPin, MockPinError};
    use crate::traits::Clock;

    #[test]
    fn pin_led_starts_off() {
        let led = PinLed::new(MockPin::new()).unwrap();
        assert!(!led.read());
        assert_eq!(led.into_inner().level(), Some(false));
    }

    #[test]
    fn pin_led_drives_pin() {
        let mut led = PinLed::new(MockPin::new()).unwrap();
        led.set(true).unwrap();
        assert!(led.read());
        led.toggle().unwrap();
        assert!(!led.read());
        led.set(true).unwrap();
        assert_eq!(led.into_inner().level(), Some(true));
    }

    #[test]
    fn active_low_inverts_level() {
        let mut led = PinLed::active_low(MockPin::new()).unwrap();
        assert!(!led.read());
        led.set(true).unwrap();
        assert!(led.read());
        assert_eq!(led.into_inner().level(), Some(false));
    }

    #[test]
    fn failed_write_keeps_state() {
        let mut led = PinLed::new(MockPin::new()).unwrap();
        led.set(true).unwrap();

        let mut pin = led.into_inner();
        pin.fail_writes(true);
        let mut led = PinLed { pin, on: true, active_low: false };

        assert!(led.set(false).is_err());
        assert!(led.read());
    }

    #[test]
    fn constructor_reports_pin_error() {
        let mut pin = MockPin::new();
        pin.fail_writes(true);
        assert!(matches!(PinLed::new(pin), Err(MockPinError)));

        let mut pin = MockPin::new();
        pin.fail_writes(true);
        assert!(matches!(PinLed::active_low(pin), Err(MockPinError)));
    }

    #[test]
    fn blink_pattern_durations() {
        assert_eq!(STARTUP_PATTERN.duration_ms(), 1200);
        assert_eq!(FAILURE_PATTERN.duration_ms(), 1000);
    }

    #[test]
    fn blink_leaves_led_off_and_takes_pattern_time() {
        let mut led = MockLed::new();
        let mut clock = MockClock::new();

        blink(&mut led, &mut clock, STARTUP_PATTERN).unwrap();

        assert!(!led.read());
        // 3 pulses on/off plus the final off
        assert_eq!(led.writes, 7);
        assert_eq!(led.history.iter().filter(|on| **on).count(), 3);
        assert_eq!(clock.now_ms(), 1200);
    }

    #[test]
    fn blink_zero_times_just_turns_off() {
        let mut led = MockLed::new();
        led.set(true).unwrap();
        let mut clock = MockClock::new();

        let pattern = BlinkPattern {
            times: 0,
            on_ms: 50,
            off_ms: 50,
        };
        blink(&mut led, &mut clock, pattern).unwrap();

        assert!(!led.read());
        assert_eq!(clock.now_ms(), 0);
    }
}

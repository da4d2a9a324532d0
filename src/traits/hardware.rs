//! Hardware abstraction traits for the actuator output and time source.
//!
//! This module defines the core hardware interfaces that allow numtx to
//! work across different platforms (ESP32, desktop mocks, etc.).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Actuator`] | The single digital output (indicator LED) |
//! | [`Clock`] | Monotonic millisecond time source |
//!
//! Blocking delays use [`embedded_hal::delay::DelayNs`] so any HAL delay
//! provider (FreeRTOS delay on ESP32, the mock clock in tests) can drive the
//! polling and blink loops.
//!
//! # Example
//!
//! ```rust
//! use numtx::traits::{Actuator, ActuatorState};
//! use numtx::hal::MockLed;
//!
//! let mut led = MockLed::new();
//! assert_eq!(led.state(), ActuatorState::Off);
//!
//! led.set(true).unwrap();
//! assert!(led.read());
//!
//! led.toggle().unwrap();
//! assert_eq!(led.state(), ActuatorState::Off);
//! ```

/// Logical state of the actuator.
///
/// # Default
///
/// Defaults to [`Off`](Self::Off), the state at process start and after shutdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ActuatorState {
    /// Output driven on.
    On,
    /// Output driven off.
    #[default]
    Off,
}

impl ActuatorState {
    /// Returns the state as shown to users.
    ///
    /// # Examples
    ///
    /// ```
    /// use numtx::ActuatorState;
    ///
    /// assert_eq!(ActuatorState::On.as_str(), "ON");
    /// assert_eq!(ActuatorState::Off.as_str(), "OFF");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActuatorState::On => "ON",
            ActuatorState::Off => "OFF",
        }
    }

    /// Returns `true` for [`On`](Self::On).
    #[inline]
    pub const fn is_on(&self) -> bool {
        matches!(self, ActuatorState::On)
    }
}

impl From<bool> for ActuatorState {
    fn from(on: bool) -> Self {
        if on {
            ActuatorState::On
        } else {
            ActuatorState::Off
        }
    }
}

impl core::fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single digital output owned by the device.
///
/// `read` reports the last state successfully applied; it never touches the
/// hardware, so rendering a page can always observe the current state.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use numtx::traits::Actuator;
///
/// struct Relay { on: bool }
///
/// impl Actuator for Relay {
///     type Error = ();
///
///     fn set(&mut self, on: bool) -> Result<(), ()> {
///         // Drive the GPIO...
///         self.on = on;
///         Ok(())
///     }
///
///     fn read(&self) -> bool {
///         self.on
///     }
/// }
/// ```
pub trait Actuator {
    /// Error type for output operations.
    type Error: core::fmt::Debug;

    /// Drive the output on (`true`) or off (`false`).
    fn set(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Current output state.
    fn read(&self) -> bool;

    /// Invert the output.
    fn toggle(&mut self) -> Result<(), Self::Error> {
        let next = !self.read();
        self.set(next)
    }

    /// Convenience method to force the output off.
    fn off(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    /// Current output state as an [`ActuatorState`].
    fn state(&self) -> ActuatorState {
        ActuatorState::from(self.read())
    }
}

impl<A: Actuator + ?Sized> Actuator for &mut A {
    type Error = A::Error;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        (**self).set(on)
    }

    fn read(&self) -> bool {
        (**self).read()
    }
}

/// Clock trait for time-based operations.
///
/// Returns milliseconds since an arbitrary fixed point (usually boot).
/// Used for activation deadlines and the rotating number.
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

//! Network lifecycle manager: brings the radio up in access-point mode.
//!
//! [`AccessPoint::activate`] applies the configuration and then polls the
//! radio every [`POLL_INTERVAL_MS`] until it reports active or the deadline
//! passes. On failure the radio is switched off again so callers never see a
//! half-configured interface.
//!
//! # Example
//!
//! ```rust
//! use core::time::Duration;
//! use numtx::access_point::AccessPoint;
//! use numtx::config::AccessPointConfig;
//! use numtx::hal::{MockClock, MockRadio};
//!
//! let clock = MockClock::new();
//! let mut delay = clock.clone();
//! let mut ap = AccessPoint::new(MockRadio::new().activates_after_polls(2));
//!
//! let status = ap
//!     .activate(&AccessPointConfig::default(), Duration::from_secs(10), &clock, &mut delay)
//!     .unwrap();
//! assert!(status.active);
//! ```

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::AccessPointConfig;
use crate::error::ActivationError;
use crate::traits::{AccessPointRadio, Clock, InterfaceStatus};

/// Interval between "is it up yet?" checks.
pub const POLL_INTERVAL_MS: u32 = 500;

/// Owns the radio and remembers which network it is serving.
#[derive(Debug)]
pub struct AccessPoint<R> {
    radio: R,
    applied: Option<AccessPointConfig>,
}

impl<R: AccessPointRadio> AccessPoint<R> {
    /// Wrap a radio. Nothing is sent to it until [`activate`](Self::activate).
    pub fn new(radio: R) -> Self {
        Self {
            radio,
            applied: None,
        }
    }

    /// Bring the access point up and return its addresses.
    ///
    /// Calling this again with the same network while the radio is active
    /// returns the current status without touching the radio.
    ///
    /// # Errors
    ///
    /// - [`ActivationError::InvalidConfig`] before the radio is touched
    /// - [`ActivationError::Radio`] if the driver fails while configuring
    /// - [`ActivationError::Timeout`] if the interface stays down past `timeout`
    ///
    /// After `Radio` or `Timeout` the radio has been disabled (best effort).
    pub fn activate<C, D>(
        &mut self,
        config: &AccessPointConfig,
        timeout: Duration,
        clock: &C,
        delay: &mut D,
    ) -> Result<InterfaceStatus, ActivationError<R::Error>>
    where
        C: Clock + ?Sized,
        D: DelayNs + ?Sized,
    {
        config.validate()?;

        if self.is_serving(config) {
            debug!("[AP] '{}' already active, keeping configuration", config.ssid);
            return self.radio.interface_status().map_err(ActivationError::Radio);
        }

        info!(
            "[AP] Starting '{}' on channel {}{}",
            config.ssid,
            config.channel,
            if config.is_open() { " (open)" } else { "" }
        );
        if let Err(e) = self.configure(config) {
            self.abandon();
            return Err(ActivationError::Radio(e));
        }

        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let start = clock.now_ms();
        loop {
            if self.radio.is_active() {
                break;
            }
            let waited_ms = clock.now_ms().saturating_sub(start);
            if waited_ms >= timeout_ms {
                warn!("[AP] Not active after {} ms, giving up", waited_ms);
                self.abandon();
                return Err(ActivationError::Timeout { waited_ms });
            }
            delay.delay_ms(POLL_INTERVAL_MS);
        }

        let status = match self.radio.interface_status() {
            Ok(status) => status,
            Err(e) => {
                self.abandon();
                return Err(ActivationError::Radio(e));
            }
        };
        self.applied = Some(config.clone());

        info!(
            "[AP] Active after {} ms: {}",
            clock.now_ms().saturating_sub(start),
            status
        );
        Ok(status)
    }

    /// Switch the radio off.
    pub fn deactivate(&mut self) -> Result<(), R::Error> {
        self.applied = None;
        self.radio.disable()
    }

    /// Whether the radio is up serving exactly `config`'s network.
    pub fn is_serving(&self, config: &AccessPointConfig) -> bool {
        self.applied
            .as_ref()
            .is_some_and(|applied| applied.same_network(config))
            && self.radio.is_active()
    }

    /// Configuration applied by the last successful activation.
    pub fn applied(&self) -> Option<&AccessPointConfig> {
        self.applied.as_ref()
    }

    /// Borrow the radio.
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Mutably borrow the radio.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    fn configure(&mut self, config: &AccessPointConfig) -> Result<(), R::Error> {
        self.radio.enable()?;
        self.radio.apply(config)
    }

    fn abandon(&mut self) {
        self.applied = None;
        if let Err(e) = self.radio.disable() {
            warn!("[AP] Disabling radio failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockClock, MockRadio};
    use crate::ConfigError;

    fn activate(
        ap: &mut AccessPoint<MockRadio>,
        config: &AccessPointConfig,
        timeout_ms: u64,
        clock: &MockClock,
    ) -> Result<InterfaceStatus, ActivationError<&'static str>> {
        let mut delay = clock.clone();
        ap.activate(config, Duration::from_millis(timeout_ms), clock, &mut delay)
    }

    #[test]
    fn activates_immediately() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new());

        let status = activate(&mut ap, &AccessPointConfig::default(), 10_000, &clock).unwrap();

        assert!(status.active);
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(ap.radio().enable_calls, 1);
        assert_eq!(ap.radio().applied_config.as_ref().unwrap().channel, 11);
        assert!(ap.applied().is_some());
    }

    #[test]
    fn polls_at_fixed_interval() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new().activates_after_polls(4));

        activate(&mut ap, &AccessPointConfig::default(), 10_000, &clock).unwrap();

        // Became active on the 5th check, after 4 sleeps
        assert_eq!(clock.now_ms(), 4 * u64::from(POLL_INTERVAL_MS));
    }

    #[test]
    fn timeout_fails_within_bound() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new().never_activates());

        let err = activate(&mut ap, &AccessPointConfig::default(), 10_000, &clock).unwrap_err();

        assert!(err.is_timeout());
        let elapsed = clock.now_ms();
        assert!((10_000..=10_500).contains(&elapsed), "elapsed {}", elapsed);
    }

    #[test]
    fn timeout_disables_radio() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new().never_activates());

        let _ = activate(&mut ap, &AccessPointConfig::default(), 1_000, &clock);

        assert!(!ap.radio().enabled);
        assert_eq!(ap.radio().disable_calls, 1);
        assert!(ap.applied().is_none());
    }

    #[test]
    fn zero_timeout_checks_once() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new());
        assert!(activate(&mut ap, &AccessPointConfig::default(), 0, &clock).is_ok());

        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new().activates_after_polls(1));
        let err = activate(&mut ap, &AccessPointConfig::default(), 0, &clock).unwrap_err();
        assert!(matches!(err, ActivationError::Timeout { waited_ms: 0 }));
    }

    #[test]
    fn invalid_config_never_touches_radio() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new());

        let config = AccessPointConfig::default().with_channel(13);
        let err = activate(&mut ap, &config, 10_000, &clock).unwrap_err();

        assert!(matches!(
            err,
            ActivationError::InvalidConfig(ConfigError::Channel(13))
        ));
        assert_eq!(ap.radio().enable_calls, 0);
    }

    #[test]
    fn radio_error_disables() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new().failing_apply("bad passphrase"));

        let err = activate(&mut ap, &AccessPointConfig::default(), 10_000, &clock).unwrap_err();

        assert!(matches!(err, ActivationError::Radio("bad passphrase")));
        assert!(!ap.radio().enabled);
    }

    #[test]
    fn idempotent_when_already_active() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new());
        let config = AccessPointConfig::default();

        let first = activate(&mut ap, &config, 10_000, &clock).unwrap();
        let second = activate(&mut ap, &config, 10_000, &clock).unwrap();

        assert_eq!(first, second);
        assert_eq!(ap.radio().enable_calls, 1);
        assert_eq!(ap.radio().apply_calls, 1);
    }

    #[test]
    fn different_network_reconfigures() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new());

        activate(&mut ap, &AccessPointConfig::default(), 10_000, &clock).unwrap();
        activate(
            &mut ap,
            &AccessPointConfig::default().with_channel(1),
            10_000,
            &clock,
        )
        .unwrap();

        assert_eq!(ap.radio().apply_calls, 2);
        assert_eq!(ap.applied().unwrap().channel, 1);
    }

    #[test]
    fn deactivate_forgets_config() {
        let clock = MockClock::new();
        let mut ap = AccessPoint::new(MockRadio::new());
        let config = AccessPointConfig::default();

        activate(&mut ap, &config, 10_000, &clock).unwrap();
        ap.deactivate().unwrap();

        assert!(!ap.is_serving(&config));
        assert!(!ap.radio().enabled);
    }
}

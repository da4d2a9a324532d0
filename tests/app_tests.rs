//! Integration tests for the control loop, from activation to shutdown.

use std::io;

use numtx::hal::{MockClock, MockLed, MockListener, MockRadio};
use numtx::{
    run, AccessPoint, AccessPointConfig, ActivationError, Actuator, Clock, Config, RunError,
    ShutdownHandle,
};

struct Rig {
    clock: MockClock,
    led: MockLed,
    ap: AccessPoint<MockRadio>,
}

impl Rig {
    fn new(radio: MockRadio) -> Self {
        Self {
            clock: MockClock::new(),
            led: MockLed::new(),
            ap: AccessPoint::new(radio),
        }
    }

    fn run_with(
        &mut self,
        config: &Config,
        listener: io::Result<MockListener>,
        shutdown: &ShutdownHandle,
    ) -> Result<numtx::ServeSummary, RunError<&'static str>> {
        let mut delay = self.clock.clone();
        run(
            config,
            &mut self.led,
            &mut self.ap,
            &self.clock,
            &mut delay,
            move |_, _| listener,
            shutdown,
        )
    }

    fn ons(&self) -> usize {
        self.led.history.iter().filter(|on| **on).count()
    }
}

// ============================================================================
// Happy Path
// ============================================================================

#[test]
fn serves_requests_then_leaves_led_off() {
    let mut rig = Rig::new(MockRadio::new().activates_after_polls(3));
    let mut listener = MockListener::new();
    let on = listener.push_request(b"GET /led/on HTTP/1.1\r\n\r\n");
    let page = listener.push_request(b"GET / HTTP/1.1\r\n\r\n");

    let summary = rig
        .run_with(&Config::default(), Ok(listener), &ShutdownHandle::new())
        .unwrap();

    assert_eq!(summary.handled, 2);
    assert!(on.output_text().contains("LED: ON"));
    assert!(page.output_text().contains("LED: ON"));
    assert_eq!(rig.led.history.last(), Some(&false));
    assert!(!rig.led.read());
    assert!(!rig.ap.radio().enabled);
    assert_eq!(rig.ap.radio().disable_calls, 1);
}

#[test]
fn page_shows_configured_names() {
    let mut rig = Rig::new(MockRadio::new());
    let config = Config::default()
        .with_access_point(AccessPointConfig::default().with_ssid("Garage-LED"));
    let mut listener = MockListener::new();
    let probe = listener.push_request(b"GET / HTTP/1.1\r\n\r\n");

    rig.run_with(&config, Ok(listener), &ShutdownHandle::new())
        .unwrap();

    assert!(probe.output_text().contains("Garage-LED"));
    assert_eq!(
        rig.ap.radio().applied_config.as_ref().map(|c| c.ssid.as_str()),
        Some("Garage-LED")
    );
}

#[test]
fn triggered_shutdown_skips_serving() {
    let mut rig = Rig::new(MockRadio::new());
    let mut listener = MockListener::new();
    let probe = listener.push_request(b"GET /led/on HTTP/1.1\r\n\r\n");
    let shutdown = ShutdownHandle::new();
    shutdown.trigger();

    let summary = rig
        .run_with(&Config::default(), Ok(listener), &shutdown)
        .unwrap();

    assert_eq!(summary.handled, 0);
    assert!(probe.output().is_empty());
    // Startup pattern only
    assert_eq!(rig.ons(), 3);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn activation_timeout_blinks_failure() {
    let mut rig = Rig::new(MockRadio::new().never_activates());
    let listener = MockListener::new();

    let err = rig
        .run_with(&Config::default(), Ok(listener), &ShutdownHandle::new())
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Activation(ActivationError::Timeout { waited_ms: 10_000 })
    ));
    assert!(!rig.ap.radio().enabled);
    assert_eq!(rig.ons(), 5);
    assert!(!rig.led.read());
    assert!(rig.clock.now_ms() >= 10_000);
}

#[test]
fn radio_error_is_reported() {
    let mut rig = Rig::new(MockRadio::new().failing_apply("bad channel"));

    let err = rig
        .run_with(
            &Config::default(),
            Ok(MockListener::new()),
            &ShutdownHandle::new(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Activation(ActivationError::Radio("bad channel"))
    ));
    assert!(!rig.ap.radio().enabled);
}

#[test]
fn bind_failure_switches_radio_off() {
    let mut rig = Rig::new(MockRadio::new());

    let err = rig
        .run_with(
            &Config::default(),
            Err(io::Error::new(io::ErrorKind::AddrInUse, "port taken")),
            &ShutdownHandle::new(),
        )
        .unwrap_err();

    match err {
        RunError::Listener { addr, source } => {
            assert_eq!(addr, "192.168.4.1:80".parse().unwrap());
            assert_eq!(source.kind(), io::ErrorKind::AddrInUse);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!rig.ap.radio().enabled);
    // Startup pattern, then the failure pattern
    assert_eq!(rig.ons(), 3 + 5);
    assert!(!rig.led.read());
}

#[test]
fn bind_failure_keeps_listener_error_when_radio_will_not_stop() {
    let mut rig = Rig::new(MockRadio::new().failing_disable("radio busy"));

    let err = rig
        .run_with(
            &Config::default(),
            Err(io::Error::new(io::ErrorKind::AddrInUse, "port taken")),
            &ShutdownHandle::new(),
        )
        .unwrap_err();

    assert!(matches!(err, RunError::Listener { .. }));
    assert_eq!(rig.ap.radio().disable_calls, 1);
    assert!(!rig.led.read());
}

#[test]
fn long_passphrase_is_rejected_before_radio() {
    let mut rig = Rig::new(MockRadio::new());
    let config = Config::default()
        .with_access_point(AccessPointConfig::default().with_password(&"p".repeat(70)));

    let err = rig
        .run_with(&config, Ok(MockListener::new()), &ShutdownHandle::new())
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Config(numtx::ConfigError::PasswordLength(70))
    ));
    assert_eq!(rig.ap.radio().enable_calls, 0);
}

#[test]
fn accept_failure_ends_the_run() {
    let mut rig = Rig::new(MockRadio::new());
    let mut listener = MockListener::new();
    listener.push_request(b"GET /led/on HTTP/1.1\r\n\r\n");
    listener.push_error(io::ErrorKind::PermissionDenied);

    let err = rig
        .run_with(&Config::default(), Ok(listener), &ShutdownHandle::new())
        .unwrap_err();

    assert!(matches!(err, RunError::Serve(_)));
    assert!(!rig.led.read());
    assert!(!rig.ap.radio().enabled);
    // Startup, one request, then the failure pattern
    assert_eq!(rig.ons(), 3 + 1 + 5);
}

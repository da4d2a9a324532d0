//! Control-loop driver: the sequence the firmware entry point runs.
//!
//! 1. Validate the configuration.
//! 2. Bring the access point up (bounded wait).
//! 3. Play the startup pattern on the LED.
//! 4. Bind the listener on the interface address and serve until shutdown.
//! 5. Force the LED off and switch the radio off.
//!
//! Any failure forces the LED off, plays the failure pattern and returns the
//! error; nothing is retried.
//!
//! # Example
//!
//! ```rust
//! use numtx::access_point::AccessPoint;
//! use numtx::app::run;
//! use numtx::config::Config;
//! use numtx::hal::{MockClock, MockLed, MockListener, MockRadio};
//! use numtx::server::ShutdownHandle;
//! use numtx::traits::Actuator;
//!
//! let clock = MockClock::new();
//! let mut delay = clock.clone();
//! let mut led = MockLed::new();
//! let mut ap = AccessPoint::new(MockRadio::new());
//!
//! let summary = run(
//!     &Config::default(),
//!     &mut led,
//!     &mut ap,
//!     &clock,
//!     &mut delay,
//!     |_addr, _backlog| {
//!         let mut listener = MockListener::new();
//!         listener.push_request(b"GET /led/on HTTP/1.1\r\n\r\n");
//!         Ok(listener)
//!     },
//!     &ShutdownHandle::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(summary.handled, 1);
//! assert!(!led.read()); // forced off at shutdown
//! ```

use core::time::Duration;
use std::io;
use std::net::{SocketAddr, SocketAddrV4};

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::access_point::AccessPoint;
use crate::config::Config;
use crate::error::RunError;
use crate::led::{blink, FAILURE_PATTERN, STARTUP_PATTERN};
use crate::router::{LedRouter, PageInfo};
use crate::server::{serve, Listener, ServeSummary, ShutdownHandle};
use crate::traits::{AccessPointRadio, Actuator, Clock};

/// Run the device from power-up to shutdown.
///
/// `bind` creates the listener for the interface address and port; firmware
/// passes [`bind_listener`](crate::server::bind_listener), tests pass a mock.
pub fn run<A, R, C, D, L, B>(
    config: &Config,
    led: A,
    access_point: &mut AccessPoint<R>,
    clock: &C,
    delay: &mut D,
    bind: B,
    shutdown: &ShutdownHandle,
) -> Result<ServeSummary, RunError<R::Error>>
where
    A: Actuator,
    R: AccessPointRadio,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
    L: Listener,
    B: FnOnce(SocketAddr, i32) -> io::Result<L>,
{
    let mut led = led;

    if let Err(e) = config.validate() {
        return Err(fail(&mut led, delay, RunError::Config(e)));
    }

    let timeout = Duration::from_millis(u64::from(config.access_point.activate_timeout_ms));
    let status = match access_point.activate(&config.access_point, timeout, clock, delay) {
        Ok(status) => status,
        Err(e) => return Err(fail(&mut led, delay, RunError::Activation(e))),
    };
    info!("[App] Network '{}' up: {}", config.access_point.ssid, status);

    if let Err(e) = blink(&mut led, delay, STARTUP_PATTERN) {
        warn!("[App] Startup pattern failed: {:?}", e);
    }

    let addr = SocketAddr::V4(SocketAddrV4::new(status.ip, config.server.port));
    let mut listener = match bind(addr, config.server.backlog) {
        Ok(listener) => listener,
        Err(source) => {
            if let Err(e) = access_point.deactivate() {
                warn!("[App] Radio did not switch off: {:?}", e);
            }
            return Err(fail(&mut led, delay, RunError::Listener { addr, source }));
        }
    };
    info!("[App] Listening on http://{}/", addr);

    let mut router = LedRouter::new(led, PageInfo::from_config(config));
    let served = serve(&mut listener, &mut router, &config.server, shutdown);
    drop(listener);

    let mut led = router.into_inner();
    if let Err(e) = access_point.deactivate() {
        warn!("[App] Radio did not switch off: {:?}", e);
    }

    match served {
        Ok(summary) => {
            force_off(&mut led);
            info!(
                "[App] Shut down cleanly ({} handled, {} failed)",
                summary.handled, summary.failed
            );
            Ok(summary)
        }
        Err(e) => Err(fail(&mut led, delay, RunError::Serve(e))),
    }
}

/// Leave the LED off, show the failure pattern and hand the error back.
fn fail<A, D, E>(led: &mut A, delay: &mut D, err: RunError<E>) -> RunError<E>
where
    A: Actuator,
    D: DelayNs + ?Sized,
    E: core::fmt::Debug,
{
    error!("[App] {}", err);
    force_off(led);
    if let Err(e) = blink(led, delay, FAILURE_PATTERN) {
        warn!("[App] Failure pattern failed: {:?}", e);
    }
    err
}

fn force_off<A: Actuator>(led: &mut A) {
    if let Err(e) = led.off() {
        warn!("[App] Could not switch LED off: {:?}", e);
    }
}

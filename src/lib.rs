//! # numtx
//!
//! Number transmitter: a tiny access-point web service that lets any phone
//! switch an LED on a WiFi microcontroller, plus the rotating-number API it
//! was built around.
//!
//! ## Features
//!
//! - **Access point**: brings the radio up with a bounded, polled wait
//! - **Embedded HTTP**: one connection at a time, strict HTTP/1.1 responses
//! - **LED control**: `/led/on` and `/led/off`, page always shows the live state
//! - **Indicator patterns**: startup and failure blinks in place of a display
//! - **Number API** (`web`): rotating 1-9 value and link quality as JSON
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Actuator, clock, radio and signal abstractions
//! - `led` - Pin-backed LED and blink patterns
//! - `access_point` - Access-point activation with timeout
//! - `http` / `router` - Request-line parsing, routing and page rendering
//! - `server` - Blocking accept loop (`std`)
//! - `app` - Startup-to-shutdown driver (`std`)
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use numtx::{hal::MockLed, LedRouter, PageInfo, RequestHandler};
//! use numtx::traits::Actuator;
//!
//! let mut router = LedRouter::new(MockLed::new(), PageInfo::new("PicoW-LED-Control", "numtx"));
//!
//! let response = router.handle(b"GET /led/on HTTP/1.1\r\nHost: 192.168.4.1\r\n\r\n");
//! let text = String::from_utf8(response).unwrap();
//!
//! assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
//! assert!(text.contains("LED: ON"));
//! assert!(router.actuator().read());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Access-point activation with a bounded wait.
pub mod access_point;
/// Error types for every layer.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Minimal HTTP/1.1 request-line parsing and response serialisation.
pub mod http;
/// LED output and indicator patterns.
pub mod led;
/// Rotating 1-9 number source.
pub mod number;
/// Request routing and control page rendering.
pub mod router;
/// RSSI classification.
pub mod signal;
/// Core traits for hardware and network abstraction.
pub mod traits;

/// Shared configuration system for desktop and ESP32.
pub mod config;

/// Control-loop driver (requires `std`).
#[cfg(feature = "std")]
pub mod app;

/// Blocking connection acceptor (requires `std`).
#[cfg(feature = "std")]
pub mod server;

/// Desktop number API (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use access_point::{AccessPoint, POLL_INTERVAL_MS};
pub use error::{ActivationError, ConfigError, RequestError};
pub use http::{parse_request_line, HttpMethod, HttpResponse, RequestLine};
pub use led::{blink, BlinkPattern, PinLed, FAILURE_PATTERN, STARTUP_PATTERN};
pub use number::{NumberSource, RotatingNumber};
pub use router::{LedRouter, PageInfo, RequestHandler, Route};
pub use signal::{SignalQuality, SignalReport};
pub use traits::{
    // Hardware
    AccessPointRadio,
    Actuator,
    ActuatorState,
    Clock,
    // Network
    InterfaceStatus,
    SignalSampler,
};

#[cfg(feature = "std")]
pub use app::run;
#[cfg(feature = "std")]
pub use error::{RunError, ServeError};
#[cfg(feature = "std")]
pub use server::{bind_listener, serve, Listener, ServeSummary, ShutdownHandle};

// Config re-exports
pub use config::{AccessPointConfig, Config, DeviceConfig, ServerConfig, WebConfig};

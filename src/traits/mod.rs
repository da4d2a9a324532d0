//! Trait definitions for hardware and network abstraction.
//!
//! This module defines the core abstractions that allow numtx to:
//! - Run on different hardware (ESP32, desktop mock)
//! - Bring up an access point on different radios
//! - Consume link-quality readings from any source
//!
//! # Submodules
//!
//! - `hardware`: Actuator output and clock
//! - `network`: Access-point radio, interface status, signal sampler

pub mod hardware;
pub mod network;

pub use hardware::*;
pub use network::*;

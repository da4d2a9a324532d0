//! ESP32-C3 SuperMini bindings for the access-point LED controller.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Output**: on-board blue LED (active low)
//! - **Radio**: built-in 2.4 GHz WiFi in soft-AP mode (`wifi` feature)
//!
//! # Pin Assignments
//!
//! See the [`pins`] module.

mod clock;
mod led;

pub use clock::Esp32Clock;
pub use led::{onboard_led, Esp32Led, Esp32LedError};

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32AccessPoint;

/// Pin assignments for SuperMini ESP32-C3.
pub mod pins {
    /// On-board blue LED, lit when the pin is driven low
    pub const ONBOARD_LED: i32 = 8;

    /// Whether [`ONBOARD_LED`] is wired active low
    pub const ONBOARD_LED_ACTIVE_LOW: bool = true;
}

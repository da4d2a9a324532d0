//! On-board LED as an [`Actuator`](crate::traits::Actuator).

use esp_idf_hal::gpio::{AnyOutputPin, GpioError, Output, PinDriver};
use esp_idf_hal::sys::EspError;
use thiserror::Error;

use super::pins;
use crate::led::PinLed;

/// LED on an ESP-IDF output pin driver.
pub type Esp32Led<'d> = PinLed<PinDriver<'d, AnyOutputPin, Output>>;

/// Failure to set up the on-board LED.
#[derive(Debug, Error)]
pub enum Esp32LedError {
    /// The pin could not be configured as an output.
    #[error("cannot configure LED pin: {0}")]
    Driver(#[from] EspError),
    /// The initial "off" write failed.
    #[error("cannot switch LED off: {0:?}")]
    Pin(GpioError),
}

/// Drive `pin` as the on-board LED. The LED is off when this returns.
///
/// ```ignore
/// let peripherals = Peripherals::take()?;
/// let mut led = onboard_led(peripherals.pins.gpio8.into())?;
/// led.set(true)?;
/// ```
pub fn onboard_led<'d>(pin: AnyOutputPin) -> Result<Esp32Led<'d>, Esp32LedError> {
    let driver = PinDriver::output(pin)?;
    let led = if pins::ONBOARD_LED_ACTIVE_LOW {
        PinLed::active_low(driver)
    } else {
        PinLed::new(driver)
    };
    led.map_err(Esp32LedError::Pin)
}

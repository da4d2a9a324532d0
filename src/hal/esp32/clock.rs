//! ESP32 clock implementation using the ESP-IDF timer.

use crate::traits::Clock;

/// ESP32 clock using the hardware timer.
///
/// Millisecond resolution from `esp_timer_get_time()`, which counts
/// microseconds since boot. Used for the activation deadline.
///
/// # Example
///
/// ```ignore
/// use numtx::hal::esp32::Esp32Clock;
/// use numtx::traits::Clock;
///
/// let clock = Esp32Clock::new();
/// let start = clock.now_ms();
/// // ... wait for the access point ...
/// let waited = clock.now_ms() - start;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Esp32Clock;

impl Esp32Clock {
    /// Creates a new ESP32 clock instance.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for Esp32Clock {
    #[inline]
    fn now_ms(&self) -> u64 {
        // Safe: plain read of the monotonic timer, never negative after boot
        let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        (micros / 1000) as u64
    }
}

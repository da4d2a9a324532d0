//! ESP32-C3 SuperMini access-point LED controller.
//!
//! This is the main entry point for the physical hardware. It:
//! - Starts a soft access point (default `PicoW-LED-Control`, channel 11)
//! - Blinks the on-board LED three times once the network is up
//! - Serves the LED control page on port 80, one client at a time
//!
//! Join the network from a phone and open `http://192.168.4.1/`.
//!
//! # Build
//!
//! ```bash
//! AP_SSID=Lab-LED AP_PASSWORD=changeme123 AP_CHANNEL=6 \
//!     cargo build --release --bin esp32_main --features esp32,wifi
//! ```

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};
use numtx::access_point::AccessPoint;
use numtx::hal::esp32::{onboard_led, Esp32AccessPoint, Esp32Clock};
use numtx::server::{bind_listener, ShutdownHandle};
use numtx::{AccessPointConfig, Config, DeviceConfig};

/// Idle tick once the service has stopped
const HALT_INTERVAL_MS: u32 = 1000;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("================================");
    info!("  numtx access-point controller");
    info!("================================");

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = build_config();

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize LED (GPIO8, active low)
    // =========================================================================
    let led = onboard_led(peripherals.pins.gpio8.into())?;
    info!("[OK] LED initialized (GPIO8)");

    // =========================================================================
    // Initialize Radio
    // =========================================================================
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let radio = Esp32AccessPoint::new(peripherals.modem, sysloop, Some(nvs))?;
    let mut access_point = AccessPoint::new(radio);
    info!("[OK] WiFi driver initialized");

    // =========================================================================
    // Run until failure
    // =========================================================================
    let clock = Esp32Clock::new();
    let mut delay = FreeRtos;

    match numtx::run(
        &config,
        led,
        &mut access_point,
        &clock,
        &mut delay,
        bind_listener,
        &ShutdownHandle::new(),
    ) {
        Ok(summary) => info!(
            "Service stopped: {} handled, {} failed",
            summary.handled, summary.failed
        ),
        Err(e) => error!("Service failed: {}", e),
    }

    // Nothing restarts the service; keep the task alive with the LED off
    warn!("Halted, reset the board to restart");
    loop {
        FreeRtos::delay_ms(HALT_INTERVAL_MS);
    }
}

/// Network settings come from the build environment, falling back to defaults.
fn build_config() -> Config {
    let mut access_point = AccessPointConfig::default();
    if let Some(ssid) = option_env!("AP_SSID") {
        access_point = access_point.with_ssid(ssid);
    }
    if let Some(password) = option_env!("AP_PASSWORD") {
        access_point = access_point.with_password(password);
    }
    if let Some(channel) = option_env!("AP_CHANNEL") {
        match channel.parse() {
            Ok(channel) => access_point = access_point.with_channel(channel),
            Err(_) => warn!("Ignoring AP_CHANNEL={:?}, not a number", channel),
        }
    }

    Config::default()
        .with_access_point(access_point)
        .with_device(DeviceConfig::default().with_name("numtx-c3"))
}

//! Soft access point on the ESP32-C3 radio.
//!
//! Implements [`AccessPointRadio`] over `esp-idf-svc`'s [`EspWifi`]. The
//! driver is only started once both `enable` and `apply` have been called, so
//! the radio never broadcasts a default network name.
//!
//! # Example
//!
//! ```ignore
//! use core::time::Duration;
//! use esp_idf_svc::eventloop::EspSystemEventLoop;
//! use esp_idf_svc::nvs::EspDefaultNvsPartition;
//! use numtx::access_point::AccessPoint;
//! use numtx::hal::esp32::Esp32AccessPoint;
//!
//! let radio = Esp32AccessPoint::new(peripherals.modem, EspSystemEventLoop::take()?, Some(EspDefaultNvsPartition::take()?))?;
//! let mut ap = AccessPoint::new(radio);
//! let status = ap.activate(&config.access_point, Duration::from_secs(10), &clock, &mut FreeRtos)?;
//! ```

use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_ARG};
use esp_idf_svc::wifi::{AccessPointConfiguration, AuthMethod, Configuration, EspWifi};
use log::debug;

use crate::config::AccessPointConfig;
use crate::traits::{prefix_to_netmask, AccessPointRadio, InterfaceStatus};

/// ESP32 radio in access-point mode.
pub struct Esp32AccessPoint<'a> {
    wifi: EspWifi<'a>,
    powered: bool,
    configured: bool,
}

impl<'a> Esp32AccessPoint<'a> {
    /// Initialise the WiFi driver. The radio stays off.
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<Self, EspError> {
        let wifi = EspWifi::new(modem, sysloop, nvs)?;
        Ok(Self {
            wifi,
            powered: false,
            configured: false,
        })
    }

    /// Get the underlying WiFi driver for advanced operations.
    pub fn driver(&self) -> &EspWifi<'a> {
        &self.wifi
    }

    fn start_if_ready(&mut self) -> Result<(), EspError> {
        if self.powered && self.configured && !self.wifi.is_started()? {
            debug!("[WiFi] Starting driver");
            self.wifi.start()?;
        }
        Ok(())
    }
}

impl AccessPointRadio for Esp32AccessPoint<'_> {
    type Error = EspError;

    fn enable(&mut self) -> Result<(), EspError> {
        self.powered = true;
        self.start_if_ready()
    }

    fn disable(&mut self) -> Result<(), EspError> {
        self.powered = false;
        if self.wifi.is_started()? {
            debug!("[WiFi] Stopping driver");
            self.wifi.stop()?;
        }
        Ok(())
    }

    fn apply(&mut self, config: &AccessPointConfig) -> Result<(), EspError> {
        let auth_method = if config.is_open() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        self.wifi
            .set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
                ssid: config.ssid.as_str().try_into().map_err(invalid_arg)?,
                password: config.password.as_str().try_into().map_err(invalid_arg)?,
                channel: config.channel,
                auth_method,
                ..Default::default()
            }))?;
        self.configured = true;
        self.start_if_ready()
    }

    fn is_active(&self) -> bool {
        self.wifi.is_started().unwrap_or(false) && self.wifi.ap_netif().is_up().unwrap_or(false)
    }

    fn interface_status(&self) -> Result<InterfaceStatus, EspError> {
        let info = self.wifi.ap_netif().get_ip_info()?;
        Ok(InterfaceStatus {
            active: self.is_active(),
            ip: info.ip,
            netmask: prefix_to_netmask(info.subnet.mask.0),
            gateway: info.subnet.gateway,
            dns: info.dns.unwrap_or(info.ip),
        })
    }
}

fn invalid_arg<T>(_: T) -> EspError {
    EspError::from_infallible::<ESP_ERR_INVALID_ARG>()
}

//! Network abstraction traits for the access-point radio and its collaborators.
//!
//! # Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`AccessPointRadio`] | Wireless interface in access-point mode |
//! | [`SignalSampler`] | Link quality readings (RSSI, dBm) |
//!
//! The radio trait is deliberately low level: it applies configuration and
//! reports whether the interface is up. The bounded wait for activation lives
//! in [`crate::access_point::AccessPoint`], which works with any radio.

use core::fmt;
use core::net::Ipv4Addr;

use crate::config::AccessPointConfig;

/// Wireless radio that can host an access point.
///
/// # Implementation Notes
///
/// - `enable` powers the interface; it may return before the interface is up
/// - `apply` pushes name, passphrase and channel to the driver
/// - `is_active` must be cheap, it is polled every 500 ms during activation
/// - `disable` must leave the radio in a state where `is_active` is `false`
pub trait AccessPointRadio {
    /// Error type for radio operations.
    type Error: fmt::Debug;

    /// Power up the interface in access-point mode.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Power down the interface.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Apply network name, passphrase and channel.
    fn apply(&mut self, config: &AccessPointConfig) -> Result<(), Self::Error>;

    /// Whether the interface reports itself active.
    fn is_active(&self) -> bool;

    /// Addresses currently assigned to the interface.
    fn interface_status(&self) -> Result<InterfaceStatus, Self::Error>;
}

/// Addresses assigned to the access-point interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceStatus {
    /// Whether the interface is up.
    pub active: bool,
    /// Address of the device on its own network.
    pub ip: Ipv4Addr,
    /// Subnet mask.
    pub netmask: Ipv4Addr,
    /// Gateway handed to clients (the device itself in AP mode).
    pub gateway: Ipv4Addr,
    /// DNS server handed to clients.
    pub dns: Ipv4Addr,
}

impl InterfaceStatus {
    /// Status of an interface that is down.
    pub const fn inactive() -> Self {
        Self {
            active: false,
            ip: Ipv4Addr::UNSPECIFIED,
            netmask: Ipv4Addr::UNSPECIFIED,
            gateway: Ipv4Addr::UNSPECIFIED,
            dns: Ipv4Addr::UNSPECIFIED,
        }
    }

    /// Typical soft-AP addressing: `192.168.4.1/24`, device is gateway and DNS.
    pub const fn soft_ap_default() -> Self {
        let ip = Ipv4Addr::new(192, 168, 4, 1);
        Self {
            active: true,
            ip,
            netmask: Ipv4Addr::new(255, 255, 255, 0),
            gateway: ip,
            dns: ip,
        }
    }
}

impl fmt::Display for InterfaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ip {} mask {} gw {} dns {}",
            self.ip, self.netmask, self.gateway, self.dns
        )
    }
}

/// Convert a prefix length (as reported by lwIP/ESP-IDF) into a dotted netmask.
///
/// Lengths above 32 saturate to `255.255.255.255`.
///
/// ```
/// use core::net::Ipv4Addr;
/// use numtx::traits::prefix_to_netmask;
///
/// assert_eq!(prefix_to_netmask(24), Ipv4Addr::new(255, 255, 255, 0));
/// assert_eq!(prefix_to_netmask(0), Ipv4Addr::new(0, 0, 0, 0));
/// ```
pub fn prefix_to_netmask(prefix: u8) -> Ipv4Addr {
    let bits = match prefix {
        0 => 0,
        p if p >= 32 => u32::MAX,
        p => u32::MAX << (32 - u32::from(p)),
    };
    Ipv4Addr::from(bits)
}

/// Source of received-signal-strength readings.
///
/// Returns `None` when no reading is available (radio down, no peer).
pub trait SignalSampler {
    /// Read the current RSSI in dBm.
    fn read_rssi(&mut self) -> Option<i16>;
}

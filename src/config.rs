//! Shared configuration system for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use numtx::config::{AccessPointConfig, Config, ServerConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert!(config.validate().is_ok());
//!
//! // Or customize
//! let config = Config::default()
//!     .with_access_point(AccessPointConfig::default().with_ssid("Lab-AP").with_channel(6))
//!     .with_server(ServerConfig::default().with_port(8080));
//! ```

use heapless::String as HString;

use crate::error::ConfigError;

/// Maximum length of an access-point SSID in bytes (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum length of a WPA2 passphrase in bytes
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum length for short config strings (device names)
pub const MAX_SHORT_STRING: usize = 64;

/// Lowest usable access-point channel
pub const MIN_CHANNEL: u8 = 1;

/// Highest usable access-point channel
pub const MAX_CHANNEL: u8 = 11;

/// Type alias for SSID strings
pub type SsidString = HString<MAX_SSID_LEN>;

/// Type alias for passphrase strings
pub type PasswordString = HString<MAX_PASSWORD_LEN>;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Copy `s` into a heapless string, truncating on a UTF-8 boundary if too long
pub fn bounded_string<const N: usize>(s: &str) -> HString<N> {
    let mut hs = HString::new();
    let take = s.len().min(N);
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    bounded_string(s)
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Access-point radio configuration
    pub access_point: AccessPointConfig,
    /// Embedded control server configuration
    pub server: ServerConfig,
    /// Device identification
    pub device: DeviceConfig,
    /// Desktop number API configuration
    pub web: WebConfig,
}

impl Config {
    /// Set access-point configuration
    pub fn with_access_point(mut self, access_point: AccessPointConfig) -> Self {
        self.access_point = access_point;
        self
    }

    /// Set server configuration
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Check every section that has constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.access_point.validate()?;
        self.server.validate()
    }
}

// ============================================================================
// Access Point Config
// ============================================================================

/// Access-point radio configuration.
///
/// Name, passphrase and channel are applied once at startup. A name or
/// passphrase too long for its buffer is not truncated: the builder keeps the
/// rejected length and [`validate`](Self::validate) fails with it. The
/// passphrase minimum is left to the radio firmware to enforce.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessPointConfig {
    /// Network name (1-32 bytes)
    pub ssid: SsidString,
    /// WPA2 passphrase (empty = open network)
    pub password: PasswordString,
    /// Radio channel (1-11)
    pub channel: u8,
    /// How long to wait for the interface to come up
    pub activate_timeout_ms: u32,
    /// Byte length of a name that did not fit
    #[cfg_attr(feature = "serde", serde(skip))]
    ssid_overflow: Option<usize>,
    /// Byte length of a passphrase that did not fit
    #[cfg_attr(feature = "serde", serde(skip))]
    password_overflow: Option<usize>,
}

impl Default for AccessPointConfig {
    fn default() -> Self {
        Self {
            ssid: bounded_string("PicoW-LED-Control"),
            password: bounded_string("pico12345"),
            channel: MAX_CHANNEL,
            activate_timeout_ms: 10_000,
            ssid_overflow: None,
            password_overflow: None,
        }
    }
}

impl AccessPointConfig {
    /// Set the network name
    ///
    /// A name over 32 bytes is rejected by [`validate`](Self::validate).
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid_overflow = (ssid.len() > MAX_SSID_LEN).then_some(ssid.len());
        self.ssid = bounded_string(ssid);
        self
    }

    /// Set the passphrase
    ///
    /// A passphrase over 64 bytes is rejected by [`validate`](Self::validate).
    pub fn with_password(mut self, password: &str) -> Self {
        self.password_overflow = (password.len() > MAX_PASSWORD_LEN).then_some(password.len());
        self.password = bounded_string(password);
        self
    }

    /// Set the radio channel
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Set the activation timeout
    pub fn with_activate_timeout_ms(mut self, ms: u32) -> Self {
        self.activate_timeout_ms = ms;
        self
    }

    /// Whether the network is open (no passphrase)
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }

    /// Whether `other` describes the same network (timeout is not compared).
    pub fn same_network(&self, other: &Self) -> bool {
        self.ssid == other.ssid && self.password == other.password && self.channel == other.channel
    }

    /// Check name and passphrase lengths and channel range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(len) = self.ssid_overflow {
            return Err(ConfigError::SsidLength(len));
        }
        if self.ssid.is_empty() {
            return Err(ConfigError::SsidLength(0));
        }
        if let Some(len) = self.password_overflow {
            return Err(ConfigError::PasswordLength(len));
        }
        if !(MIN_CHANNEL..=MAX_CHANNEL).contains(&self.channel) {
            return Err(ConfigError::Channel(self.channel));
        }
        Ok(())
    }
}

// ============================================================================
// Server Config
// ============================================================================

/// Embedded control server configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Pending-connection queue depth handed to `listen`
    pub backlog: i32,
    /// Upper bound on the bytes read from one request
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 80,
            backlog: 5,
            max_request_bytes: 1024,
        }
    }
}

impl ServerConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the listen backlog
    pub fn with_backlog(mut self, backlog: i32) -> Self {
        self.backlog = backlog;
        self
    }

    /// Set the request buffer size
    pub fn with_max_request_bytes(mut self, bytes: usize) -> Self {
        self.max_request_bytes = bytes;
        self
    }

    /// Reject a zero-sized request buffer or a non-positive backlog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_request_bytes == 0 {
            return Err(ConfigError::RequestBuffer);
        }
        if self.backlog < 1 {
            return Err(ConfigError::Backlog(self.backlog));
        }
        Ok(())
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name, shown on the control page
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("numtx"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Desktop number API configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// How long each number is shown (milliseconds)
    pub number_interval_ms: u32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_permissive: true,
            number_interval_ms: 1000,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Set the rotation interval
    pub fn with_number_interval_ms(mut self, ms: u32) -> Self {
        self.number_interval_ms = ms;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

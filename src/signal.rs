//! Link-quality classification for RSSI readings.
//!
//! Pure transforms over a dBm value: a quality band, a 0-100 percentage and a
//! blink interval (stronger signal, faster blink).
//!
//! # Example
//!
//! ```rust
//! use numtx::signal::{rssi_to_percentage, SignalQuality};
//!
//! assert_eq!(SignalQuality::classify(-55), SignalQuality::Good);
//! assert_eq!(rssi_to_percentage(-65), 50);
//! ```

use crate::traits::SignalSampler;

/// Quality band for a reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalQuality {
    /// -50 dBm and above.
    Excellent,
    /// -60 to -51 dBm.
    Good,
    /// -70 to -61 dBm.
    Fair,
    /// -80 to -71 dBm.
    Weak,
    /// -90 to -81 dBm.
    VeryWeak,
    /// Below -90 dBm.
    ExtremelyWeak,
}

impl SignalQuality {
    /// Band a reading in dBm.
    pub fn classify(rssi: i16) -> Self {
        match rssi {
            r if r >= -50 => Self::Excellent,
            r if r >= -60 => Self::Good,
            r if r >= -70 => Self::Fair,
            r if r >= -80 => Self::Weak,
            r if r >= -90 => Self::VeryWeak,
            _ => Self::ExtremelyWeak,
        }
    }

    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Weak => "Weak",
            Self::VeryWeak => "Very Weak",
            Self::ExtremelyWeak => "Extremely Weak",
        }
    }

    /// LED blink period for this band.
    pub fn blink_interval_ms(&self) -> u32 {
        match self {
            Self::Excellent => 100,
            Self::Good => 300,
            Self::Fair => 500,
            Self::Weak => 1000,
            Self::VeryWeak | Self::ExtremelyWeak => 2000,
        }
    }
}

impl core::fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map -100..=-30 dBm linearly onto 0..=100 (truncating).
pub fn rssi_to_percentage(rssi: i16) -> u8 {
    match rssi {
        r if r <= -100 => 0,
        r if r >= -30 => 100,
        // 0 < r + 100 < 70, so the result fits in u8
        r => ((i32::from(r) + 100) * 100 / 70) as u8,
    }
}

/// Blink period for a reading.
pub fn blink_interval_ms(rssi: i16) -> u32 {
    SignalQuality::classify(rssi).blink_interval_ms()
}

/// One classified reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalReport {
    /// Raw reading in dBm.
    pub rssi: i16,
    /// Quality band.
    pub quality: SignalQuality,
    /// 0-100 strength.
    pub percentage: u8,
}

impl SignalReport {
    /// Classify a reading.
    pub fn from_rssi(rssi: i16) -> Self {
        Self {
            rssi,
            quality: SignalQuality::classify(rssi),
            percentage: rssi_to_percentage(rssi),
        }
    }

    /// Take one sample and classify it, `None` if nothing was available.
    pub fn sample<S: SignalSampler + ?Sized>(sampler: &mut S) -> Option<Self> {
        sampler.read_rssi().map(Self::from_rssi)
    }
}

//! JSON response types for the number API.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::number::{NumberSource, RotatingNumber, SEQUENCE};
use crate::signal::SignalReport;
use crate::traits::Clock;

/// Service name reported by `/api/status` and `/health`.
pub const SERVICE_NAME: &str = "number-transmitter-api";

/// Local time with microseconds and no offset, e.g. `2025-01-15T10:30:45.123456`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

// ============================================================================
// Response Types
// ============================================================================

/// `GET /api/number`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberResponse {
    /// Current number (1-9)
    pub number: u8,
    /// Local wall-clock time of the reading, ISO 8601
    pub timestamp: String,
    /// Wall-clock time of the reading, seconds since the Unix epoch
    pub unix_timestamp: f64,
    /// Seconds until the number changes
    pub next_change_in: f64,
    /// Position in the sequence (equal to the number)
    pub cycle_position: u8,
    /// Full passes through the sequence so far
    pub total_cycles: u64,
}

impl NumberResponse {
    /// Snapshot of `numbers` at wall-clock time `unix_timestamp`.
    pub fn from_numbers<C: Clock>(numbers: &RotatingNumber<C>, unix_timestamp: f64) -> Self {
        let number = numbers.now();
        Self {
            number,
            timestamp: local_timestamp(unix_timestamp),
            unix_timestamp,
            next_change_in: numbers.next_change_in_ms() as f64 / 1000.0,
            cycle_position: number,
            total_cycles: numbers.total_cycles(),
        }
    }
}

fn local_timestamp(unix_timestamp: f64) -> String {
    let micros = (unix_timestamp * 1_000_000.0).round() as i64;
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::from_timestamp(micros.div_euclid(1_000_000), nanos)
        .map(|utc| {
            utc.with_timezone(&Local)
                .naive_local()
                .format(TIMESTAMP_FORMAT)
                .to_string()
        })
        .unwrap_or_default()
}

/// `GET /api/sequence`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceResponse {
    /// Every number, in order
    pub sequence: Vec<u8>,
    /// Length of the sequence
    pub length: usize,
    /// Seconds each number is shown
    pub interval_seconds: f64,
    /// Human-readable summary
    pub description: String,
}

impl SequenceResponse {
    /// Describe a rotation with the given interval.
    pub fn new(interval_ms: u32) -> Self {
        let interval_seconds = f64::from(interval_ms) / 1000.0;
        Self {
            sequence: SEQUENCE.to_vec(),
            length: SEQUENCE.len(),
            interval_seconds,
            description: if interval_ms == 1000 {
                "Numbers 1-9 rotating every second".into()
            } else {
                format!("Numbers 1-9 rotating every {} seconds", interval_seconds)
            },
        }
    }
}

/// `GET /api/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `"running"`
    pub status: String,
    /// Seconds since the service started, to the millisecond
    pub uptime_seconds: f64,
    /// Current number (1-9)
    pub current_number: u8,
    /// Crate version
    pub api_version: String,
    /// Service name
    pub service: String,
}

impl StatusResponse {
    /// Status for a service up for `uptime_ms`.
    pub fn running(uptime_ms: u64, current_number: u8) -> Self {
        Self {
            status: "running".into(),
            uptime_seconds: uptime_ms as f64 / 1000.0,
            current_number,
            api_version: env!("CARGO_PKG_VERSION").into(),
            service: SERVICE_NAME.into(),
        }
    }
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"`
    pub status: String,
    /// Service name
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".into(),
            service: SERVICE_NAME.into(),
        }
    }
}

/// `GET /api/signal`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalResponse {
    /// Reading in dBm
    pub rssi: i16,
    /// Quality band label
    pub quality: String,
    /// 0-100 strength
    pub percentage: u8,
    /// Suggested LED blink period
    pub blink_interval_ms: u32,
}

impl From<SignalReport> for SignalResponse {
    fn from(report: SignalReport) -> Self {
        Self {
            rssi: report.rssi,
            quality: report.quality.as_str().into(),
            percentage: report.percentage,
            blink_interval_ms: report.quality.blink_interval_ms(),
        }
    }
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error name
    pub error: String,
    /// Explanation
    pub message: String,
}

impl ErrorResponse {
    /// Create an error body
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Unknown endpoint
    pub fn not_found() -> Self {
        Self::new("Not found", "The requested endpoint does not exist")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockClock;
    use crate::signal::SignalReport;

    #[test]
    fn number_snapshot() {
        let clock = MockClock::new();
        let numbers = RotatingNumber::new(clock.clone());
        clock.advance(9_250);

        let resp = NumberResponse::from_numbers(&numbers, 1.5);
        assert_eq!(resp.number, 1);
        assert_eq!(resp.cycle_position, 1);
        assert_eq!(resp.total_cycles, 1);
        assert!((resp.next_change_in - 0.75).abs() < 1e-9);
    }

    #[test]
    fn number_timestamp_is_local_iso() {
        let numbers = RotatingNumber::new(MockClock::new());

        let resp = NumberResponse::from_numbers(&numbers, 1_736_935_845.5);

        let expected = DateTime::from_timestamp(1_736_935_845, 500_000_000)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        let parsed =
            chrono::NaiveDateTime::parse_from_str(&resp.timestamp, "%Y-%m-%dT%H:%M:%S%.f").unwrap();
        assert_eq!(parsed, expected);
        assert!(resp.timestamp.ends_with(".500000"));
    }

    #[test]
    fn sequence_description() {
        let resp = SequenceResponse::new(1000);
        assert_eq!(resp.sequence, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(resp.length, 9);
        assert_eq!(resp.description, "Numbers 1-9 rotating every second");
        assert_eq!(
            SequenceResponse::new(2500).description,
            "Numbers 1-9 rotating every 2.5 seconds"
        );
    }

    #[test]
    fn signal_json_shape() {
        let resp = SignalResponse::from(SignalReport::from_rssi(-85));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["quality"], "Very Weak");
        assert_eq!(json["percentage"], 21);
        assert_eq!(json["blink_interval_ms"], 2000);
    }

    #[test]
    fn not_found_body() {
        let json = serde_json::to_string(&ErrorResponse::not_found()).unwrap();
        assert!(json.contains("\"error\":\"Not found\""));
    }
}

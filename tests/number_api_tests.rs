//! Integration tests for the number API.
//!
//! These drive the axum router directly with `oneshot`, using a clock the
//! test moves by hand.

#![cfg(feature = "web")]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use numtx::hal::MockSignal;
use numtx::services::{
    build_router, ErrorResponse, HealthResponse, NumberResponse, NumberState, SequenceResponse,
    SignalResponse, StatusResponse, WebServerConfig,
};
use numtx::Clock;

/// Thread-safe clock that only moves when told to.
#[derive(Clone, Default)]
struct TestClock(Arc<AtomicU64>);

impl TestClock {
    fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

fn create_test_app(state: NumberState<TestClock>) -> axum::Router {
    build_router(Arc::new(state), &WebServerConfig::default())
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, axum::body::Bytes) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

async fn get_json<T: DeserializeOwned>(app: axum::Router, uri: &str) -> (StatusCode, T) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// Number
// ============================================================================

#[tokio::test]
async fn test_number_follows_clock() {
    let clock = TestClock::default();
    let app = create_test_app(NumberState::new(clock.clone(), 1000));

    clock.set(3_250);
    let (status, json): (_, NumberResponse) = get_json(app.clone(), "/api/number").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.number, 4);
    assert_eq!(json.cycle_position, 4);
    assert_eq!(json.total_cycles, 0);
    assert!((json.next_change_in - 0.75).abs() < 1e-9);
    assert!(json.unix_timestamp > 1_600_000_000.0);
    assert_eq!(json.timestamp.len(), "2025-01-15T10:30:45.123456".len());
    assert_eq!(&json.timestamp[10..11], "T");

    clock.set(9_000);
    let (_, json): (_, NumberResponse) = get_json(app, "/api/number").await;
    assert_eq!(json.number, 1);
    assert_eq!(json.total_cycles, 1);
    assert!((json.next_change_in - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_sequence() {
    let app = create_test_app(NumberState::new(TestClock::default(), 1000));

    let (status, json): (_, SequenceResponse) = get_json(app, "/api/sequence").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.sequence, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(json.length, 9);
    assert_eq!(json.interval_seconds, 1.0);
    assert_eq!(json.description, "Numbers 1-9 rotating every second");
}

#[tokio::test]
async fn test_status() {
    let clock = TestClock::default();
    let app = create_test_app(NumberState::new(clock.clone(), 1000));

    clock.set(12_345);
    let (status, json): (_, StatusResponse) = get_json(app, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.status, "running");
    assert!((json.uptime_seconds - 12.345).abs() < 1e-9);
    assert_eq!(json.current_number, 4);
    assert_eq!(json.api_version, env!("CARGO_PKG_VERSION"));
    assert_eq!(json.service, "number-transmitter-api");
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app(NumberState::new(TestClock::default(), 1000));

    let (status, json): (_, HealthResponse) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.status, "healthy");
}

// ============================================================================
// Signal
// ============================================================================

#[tokio::test]
async fn test_signal_reading() {
    let state = NumberState::new(TestClock::default(), 1000).with_sampler(MockSignal::new(Some(-58)));
    let app = create_test_app(state);

    let (status, json): (_, SignalResponse) = get_json(app, "/api/signal").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.rssi, -58);
    assert_eq!(json.quality, "Good");
    assert_eq!(json.percentage, 60);
    assert_eq!(json.blink_interval_ms, 300);
}

#[tokio::test]
async fn test_signal_unavailable() {
    let app = create_test_app(NumberState::new(TestClock::default(), 1000));

    let (status, json): (_, ErrorResponse) = get_json(app, "/api/signal").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json.error, "No signal");
}

#[tokio::test]
async fn test_signal_sampler_without_reading() {
    let state = NumberState::new(TestClock::default(), 1000).with_sampler(MockSignal::new(None));
    let app = create_test_app(state);

    let (status, _) = get(app, "/api/signal").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Errors and CORS
// ============================================================================

#[tokio::test]
async fn test_unknown_endpoint_is_json_404() {
    let app = create_test_app(NumberState::new(TestClock::default(), 1000));

    let (status, json): (_, ErrorResponse) = get_json(app, "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json.error, "Not found");
}

#[tokio::test]
async fn test_cors_header_when_permissive() {
    let app = create_test_app(NumberState::new(TestClock::default(), 1000));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/number")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_no_cors_header_when_disabled() {
    let state = Arc::new(NumberState::new(TestClock::default(), 1000));
    let app = build_router(state, &WebServerConfig::default().cors(false));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

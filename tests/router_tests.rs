//! Integration tests for request routing and page rendering.
//!
//! These drive `LedRouter` through raw request bytes, the same way the
//! accept loop does.

use numtx::hal::MockLed;
use numtx::{Actuator, LedRouter, PageInfo, RequestHandler};

fn router() -> LedRouter<MockLed> {
    LedRouter::new(MockLed::new(), PageInfo::new("PicoW-LED-Control", "numtx"))
}

fn get(path: &str) -> Vec<u8> {
    format!("GET {} HTTP/1.1\r\nHost: 192.168.4.1\r\n\r\n", path).into_bytes()
}

/// Split a serialised response into its head and body.
fn split(response: &[u8]) -> (String, Vec<u8>) {
    let text = String::from_utf8(response.to_vec()).unwrap();
    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    (head.to_string(), body.as_bytes().to_vec())
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .unwrap()
        .parse()
        .unwrap()
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn on_off_then_unknown_paths() {
    let mut r = router();

    let on = r.handle(&get("/led/on"));
    assert!(on.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(String::from_utf8_lossy(&on).contains("LED: ON"));
    assert!(r.actuator().read());

    let off = r.handle(&get("/led/off"));
    assert!(String::from_utf8_lossy(&off).contains("LED: OFF"));
    assert!(!r.actuator().read());

    let first = r.handle(&get("/foo"));
    let second = r.handle(&get("/foo"));
    assert_eq!(first, second);
    assert_eq!(first, off);
    assert_eq!(r.actuator().writes, 2);
}

#[test]
fn repeated_on_is_idempotent() {
    let mut r = router();

    let first = r.handle(&get("/led/on"));
    let second = r.handle(&get("/led/on"));

    assert_eq!(first, second);
    assert!(r.actuator().read());
    assert_eq!(r.actuator().history, [true, true]);
}

#[test]
fn query_string_is_not_stripped() {
    let mut r = router();

    let resp = r.handle(&get("/led/on?now=1"));

    assert!(resp.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(!r.actuator().read());
    assert_eq!(r.actuator().writes, 0);
}

#[test]
fn method_is_ignored() {
    let mut r = router();

    r.handle(b"POST /led/on HTTP/1.1\r\nContent-Length: 0\r\n\r\n");
    assert!(r.actuator().read());

    r.handle(b"DELETE /led/off HTTP/1.0\r\n\r\n");
    assert!(!r.actuator().read());
}

// ============================================================================
// Framing
// ============================================================================

#[test]
fn content_length_matches_body_for_every_response() {
    let mut r = router();
    let requests: [&[u8]; 6] = [
        b"GET /led/on HTTP/1.1\r\n\r\n",
        b"GET /led/off HTTP/1.1\r\n\r\n",
        b"GET / HTTP/1.1\r\n\r\n",
        b"GET /favicon.ico HTTP/1.1\r\n\r\n",
        b"GARBAGE\r\n\r\n",
        b"\r\n",
    ];

    for request in requests {
        let response = r.handle(request);
        let (head, body) = split(&response);
        assert_eq!(content_length(&head), body.len(), "request {:?}", request);
        assert!(head.contains("Content-Type: text/html"));
        assert!(head.contains("Connection: close"));
    }
}

#[test]
fn length_counts_bytes_not_characters() {
    let mut r = LedRouter::new(MockLed::new(), PageInfo::new("Café-Net", "numtx"));

    let response = r.handle(&get("/"));
    let (head, body) = split(&response);

    assert!(String::from_utf8_lossy(&body).contains("Café-Net"));
    assert_eq!(content_length(&head), body.len());
}

// ============================================================================
// Malformed Requests
// ============================================================================

#[test]
fn malformed_requests_never_touch_the_led() {
    let mut r = router();
    r.handle(&get("/led/on"));

    let malformed: [&[u8]; 5] = [
        b"",
        b"\r\n\r\n",
        b"GET /led/off\r\n\r\n",
        b"GET /led/off HTTP/1.1 extra\r\n\r\n",
        &[0xff, 0xfe, b' ', b'/', b'\r', b'\n'],
    ];

    for request in malformed {
        let response = r.handle(request);
        assert!(
            response.starts_with(b"HTTP/1.1 400 Bad Request\r\n"),
            "request {:?}",
            request
        );
        assert!(String::from_utf8_lossy(&response).contains("LED: ON"));
    }

    assert!(r.actuator().read());
    assert_eq!(r.actuator().writes, 1);
}

#[test]
fn device_error_reports_unchanged_state() {
    let mut r = LedRouter::new(MockLed::new().failing(), PageInfo::new("net", "dev"));

    let response = r.handle(&get("/led/on"));
    let text = String::from_utf8(response).unwrap();

    assert!(text.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(text.contains("LED: OFF"));
    assert!(!r.actuator().read());
}

#[test]
fn page_names_are_escaped() {
    let mut r = LedRouter::new(MockLed::new(), PageInfo::new("<script>", "a&b"));

    let text = String::from_utf8(r.handle(&get("/"))).unwrap();

    assert!(text.contains("&lt;script&gt;"));
    assert!(text.contains("a&amp;b"));
    assert!(!text.contains("<script>"));
}

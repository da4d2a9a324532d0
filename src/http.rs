//! Minimal HTTP/1.1 wire handling for the embedded control server.
//!
//! This is intentionally not a general HTTP implementation: only the request
//! line is parsed, bodies are ignored, and every response closes the
//! connection.
//!
//! # Example
//!
//! ```rust
//! use numtx::http::{parse_request_line, HttpMethod, HttpResponse};
//!
//! let line = parse_request_line(b"GET /led/on HTTP/1.1\r\nHost: 192.168.4.1\r\n\r\n").unwrap();
//! assert_eq!(line.method, HttpMethod::Get);
//! assert_eq!(line.path, "/led/on");
//!
//! let bytes = HttpResponse::html(200, "<p>ok</p>").to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::error::RequestError;

/// HTTP request methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET request.
    Get,
    /// HTTP HEAD request.
    Head,
    /// HTTP POST request.
    Post,
    /// HTTP PUT request.
    Put,
    /// HTTP DELETE request.
    Delete,
    /// Anything else; routing does not depend on the method.
    Other,
}

impl HttpMethod {
    /// Parse a method token (case-sensitive, as HTTP requires).
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            _ => HttpMethod::Other,
        }
    }
}

/// The parsed first line of a request.
///
/// Borrows from the request buffer, so it lives no longer than one
/// accept-loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestLine<'a> {
    /// Parsed method.
    pub method: HttpMethod,
    /// Raw method token, kept for logging.
    pub method_token: &'a str,
    /// Request target, matched verbatim by the router.
    pub path: &'a str,
    /// Protocol version token (e.g. `HTTP/1.1`).
    pub version: &'a str,
}

/// Parse the request line out of a raw request buffer.
///
/// Takes everything before the first `\n`, drops a trailing `\r`, and splits
/// on ASCII whitespace into exactly three tokens. Bytes after the first line
/// are never inspected, so a request truncated by the read limit still parses
/// as long as its first line arrived.
pub fn parse_request_line(buf: &[u8]) -> Result<RequestLine<'_>, RequestError> {
    let first = match buf.iter().position(|&b| b == b'\n') {
        Some(end) => &buf[..end],
        None => buf,
    };
    let first = first.strip_suffix(b"\r").unwrap_or(first);
    let line = core::str::from_utf8(first).map_err(|_| RequestError::NotUtf8)?;

    let mut tokens = line.split_ascii_whitespace();
    let (Some(method), Some(path), Some(version)) = (tokens.next(), tokens.next(), tokens.next())
    else {
        let count = line.split_ascii_whitespace().count();
        return Err(if count == 0 {
            RequestError::Empty
        } else {
            RequestError::TokenCount(count)
        });
    };
    if tokens.next().is_some() {
        return Err(RequestError::TokenCount(
            line.split_ascii_whitespace().count(),
        ));
    }

    Ok(RequestLine {
        method: HttpMethod::from_token(method),
        method_token: method,
        path,
        version,
    })
}

/// Canonical reason phrase for the status codes this server emits.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// An HTTP response, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code (e.g., 200, 400, 500).
    pub status: u16,
    /// Content-Type header value.
    pub content_type: &'static str,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates an HTML response with the given status.
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.into(),
        }
    }

    /// Creates a 200 OK HTML response.
    pub fn ok_html(body: impl Into<String>) -> Self {
        Self::html(200, body)
    }

    /// Serialise status line, headers and body.
    ///
    /// `Content-Length` is the byte length of the body (not its character
    /// count), and every response carries `Connection: close`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = String::with_capacity(96);
        // Writing into a String cannot fail
        let _ = write!(
            head,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );

        let mut out = Vec::with_capacity(head.len() + self.body.len());
        out.extend_from_slice(head.as_bytes());
        out.extend_from_slice(self.body.as_bytes());
        out
    }
}

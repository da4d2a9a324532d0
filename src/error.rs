//! Error types for configuration, activation, request parsing and serving.
//!
//! | Error | Raised by | Effect |
//! |-------|-----------|--------|
//! | [`ConfigError`] | config validation | fatal at startup |
//! | [`ActivationError`] | [`AccessPoint::activate`](crate::access_point::AccessPoint::activate) | fatal at startup, no retry |
//! | [`RequestError`] | [`parse_request_line`](crate::http::parse_request_line) | 400 response, loop continues |
//! | `ServeError` | `server::serve` | fatal, listener closed |
//! | `RunError` | `app::run` | fatal, LED forced off |

use thiserror::Error;

/// Invalid configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// SSID must be 1-32 bytes.
    #[error("access point name must be 1-32 bytes, got {0}")]
    SsidLength(usize),
    /// Passphrase over 64 bytes.
    #[error("access point passphrase must be at most 64 bytes, got {0}")]
    PasswordLength(usize),
    /// Channel outside 1-11.
    #[error("access point channel must be 1-11, got {0}")]
    Channel(u8),
    /// Request buffer of zero bytes.
    #[error("request buffer must hold at least one byte")]
    RequestBuffer,
    /// Listen backlog below one.
    #[error("listen backlog must be at least 1, got {0}")]
    Backlog(i32),
}

/// Failure to bring the access point up.
#[derive(Debug, Error)]
pub enum ActivationError<E: core::fmt::Debug> {
    /// Configuration rejected before touching the radio.
    #[error("invalid access point config: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// Radio driver reported an error.
    #[error("radio error: {0:?}")]
    Radio(E),
    /// Interface never reported active within the timeout.
    #[error("access point not active after {waited_ms} ms")]
    Timeout {
        /// Time spent polling before giving up.
        waited_ms: u64,
    },
}

impl<E: core::fmt::Debug> ActivationError<E> {
    /// Whether this is the timeout case.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Request line that cannot be split into method, path and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestError {
    /// First line is not valid UTF-8.
    #[error("request line is not valid UTF-8")]
    NotUtf8,
    /// Nothing before the first newline.
    #[error("empty request line")]
    Empty,
    /// Wrong number of whitespace-separated tokens.
    #[error("expected 3 tokens in request line, got {0}")]
    TokenCount(usize),
}

/// Fatal failure of the accept loop.
#[cfg(feature = "std")]
#[derive(Debug, Error)]
pub enum ServeError {
    /// `accept` failed with something other than an interrupt.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),
}

/// Fatal failure of the control loop.
#[cfg(feature = "std")]
#[derive(Debug, Error)]
pub enum RunError<E: core::fmt::Debug> {
    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Access point did not come up.
    #[error("access point activation failed: {0}")]
    Activation(ActivationError<E>),
    /// Listening socket could not be created.
    #[error("cannot listen on {addr}: {source}")]
    Listener {
        /// Address the bind was attempted on.
        addr: std::net::SocketAddr,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },
    /// Accept loop failed.
    #[error(transparent)]
    Serve(#[from] ServeError),
}

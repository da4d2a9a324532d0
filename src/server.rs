//! Connection acceptor: a blocking, one-at-a-time accept loop.
//!
//! Each accepted connection is read once (up to
//! [`ServerConfig::max_request_bytes`]), handed to a [`RequestHandler`], answered
//! and dropped. The connection value is owned by a single loop iteration, so it
//! is closed on every path out of that iteration: success, empty read, or an
//! I/O error. Connection errors are logged and counted; only a failing
//! `accept` ends the loop with an error.
//!
//! There is no read timeout on accepted connections. A client that connects
//! and never sends anything stalls the loop until it goes away.
//!
//! # Example
//!
//! ```rust
//! use numtx::config::ServerConfig;
//! use numtx::hal::{MockLed, MockListener};
//! use numtx::router::{LedRouter, PageInfo};
//! use numtx::server::{serve, ShutdownHandle};
//!
//! let mut listener = MockListener::new();
//! let probe = listener.push_request(b"GET /led/on HTTP/1.1\r\n\r\n");
//! let mut router = LedRouter::new(MockLed::new(), PageInfo::new("net", "dev"));
//!
//! let summary = serve(&mut listener, &mut router, &ServerConfig::default(), &ShutdownHandle::new()).unwrap();
//!
//! assert_eq!(summary.handled, 1);
//! assert!(probe.output_text().contains("LED: ON"));
//! assert!(probe.is_closed());
//! ```

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use socket2::{Domain, Protocol, Socket, Type};

use crate::config::ServerConfig;
use crate::error::ServeError;
use crate::router::RequestHandler;

/// Source of inbound connections.
///
/// Implemented for [`TcpListener`]; tests use
/// [`MockListener`](crate::hal::MockListener).
pub trait Listener {
    /// One accepted client connection.
    type Connection: Read + Write;

    /// Block until a client connects.
    fn accept(&mut self) -> io::Result<(Self::Connection, SocketAddr)>;
}

impl Listener for TcpListener {
    type Connection = TcpStream;

    fn accept(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self)
    }
}

impl<L: Listener + ?Sized> Listener for &mut L {
    type Connection = L::Connection;

    fn accept(&mut self) -> io::Result<(Self::Connection, SocketAddr)> {
        (**self).accept()
    }
}

/// Create a listening TCP socket with `SO_REUSEADDR` set.
///
/// Address reuse lets the service rebind its port immediately after a
/// restart, while old connections are still in `TIME_WAIT`.
pub fn bind_listener(addr: SocketAddr, backlog: i32) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;
    Ok(socket.into())
}

/// Cloneable stop flag for [`serve`].
///
/// The flag is checked before each `accept` and again after one returns. A
/// loop blocked inside `accept` only notices once a client connects, so
/// [`trigger_and_wake`](Self::trigger_and_wake) makes that connection itself.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    stop: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Handle that has not been triggered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop.
    pub fn trigger(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Ask the loop to stop and connect to `addr` so a blocked `accept` returns.
    pub fn trigger_and_wake(&self, addr: SocketAddr) {
        self.trigger();
        if let Err(e) = TcpStream::connect(wakeable(addr)) {
            debug!("[Server] Wake-up connect to {} failed: {}", addr, e);
        }
    }

    /// Whether a stop was requested.
    pub fn is_triggered(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Connection counts reported when the loop ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServeSummary {
    /// Connections that got a response (or sent nothing).
    pub handled: u64,
    /// Connections abandoned because of a read or write error.
    pub failed: u64,
}

/// Run the accept loop until shutdown or a fatal `accept` error.
///
/// Returns `Ok` when `shutdown` was triggered or `accept` was interrupted.
pub fn serve<L, H>(
    listener: &mut L,
    handler: &mut H,
    config: &ServerConfig,
    shutdown: &ShutdownHandle,
) -> Result<ServeSummary, ServeError>
where
    L: Listener + ?Sized,
    H: RequestHandler + ?Sized,
{
    let mut summary = ServeSummary::default();
    let mut buf = vec![0u8; config.max_request_bytes];

    while !shutdown.is_triggered() {
        let (mut connection, peer) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                info!("[Server] Accept interrupted, stopping");
                break;
            }
            Err(e) => return Err(ServeError::Accept(e)),
        };
        if shutdown.is_triggered() {
            break;
        }

        match handle_connection(&mut connection, handler, &mut buf) {
            Ok(()) => summary.handled += 1,
            Err(e) => {
                warn!("[Server] Connection from {} dropped: {}", peer, e);
                summary.failed += 1;
            }
        }
        // `connection` is dropped (closed) here on every path
    }

    info!(
        "[Server] Stopped after {} requests ({} failed)",
        summary.handled, summary.failed
    );
    Ok(summary)
}

fn handle_connection<C, H>(connection: &mut C, handler: &mut H, buf: &mut [u8]) -> io::Result<()>
where
    C: Read + Write,
    H: RequestHandler + ?Sized,
{
    let n = connection.read(buf)?;
    if n == 0 {
        debug!("[Server] Client closed without sending a request");
        return Ok(());
    }
    let response = handler.handle(&buf[..n]);
    connection.write_all(&response)?;
    connection.flush()
}

/// A listener bound to the unspecified address is reached through loopback.
fn wakeable(addr: SocketAddr) -> SocketAddr {
    let mut target = addr;
    if target.ip().is_unspecified() {
        match target {
            SocketAddr::V4(ref mut v4) => v4.set_ip(std::net::Ipv4Addr::LOCALHOST),
            SocketAddr::V6(ref mut v6) => v6.set_ip(std::net::Ipv6Addr::LOCALHOST),
        }
    }
    target
}

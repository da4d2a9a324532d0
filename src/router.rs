//! Request handler: routes a raw request to an LED action and renders the page.
//!
//! | Path | Effect | Response |
//! |------|--------|----------|
//! | `/led/on` | LED on | 200, control page |
//! | `/led/off` | LED off | 200, control page |
//! | anything else | none | 200, control page |
//! | malformed request line | none | 400, short error page |
//!
//! Paths are matched verbatim, so `/led/on?x=1` is an unknown path. The page
//! is rendered after the action runs, from the state the actuator reports at
//! that moment.
//!
//! # Example
//!
//! ```rust
//! use numtx::hal::MockLed;
//! use numtx::router::{LedRouter, PageInfo, RequestHandler};
//! use numtx::traits::Actuator;
//!
//! let mut router = LedRouter::new(MockLed::new(), PageInfo::new("PicoW-LED-Control", "numtx"));
//! let response = router.handle(b"GET /led/on HTTP/1.1\r\n\r\n");
//!
//! assert!(response.starts_with(b"HTTP/1.1 200 OK"));
//! assert!(router.actuator().read());
//! ```

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

use log::{error, info, warn};

use crate::config::Config;
use crate::http::{parse_request_line, HttpResponse};
use crate::traits::{Actuator, ActuatorState};

const PAGE_TEMPLATE: &str = include_str!("../www/led.html");

const ON_COLOR: &str = "#38a169";
const OFF_COLOR: &str = "#e53e3e";

/// Anything that turns a raw request buffer into raw response bytes.
///
/// Implemented by [`LedRouter`] and by any `FnMut(&[u8]) -> Vec<u8>` closure.
pub trait RequestHandler {
    /// Produce the complete response for one request.
    fn handle(&mut self, request: &[u8]) -> Vec<u8>;
}

impl<F> RequestHandler for F
where
    F: FnMut(&[u8]) -> Vec<u8>,
{
    fn handle(&mut self, request: &[u8]) -> Vec<u8> {
        self(request)
    }
}

/// What a request path asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// `/led/on`
    LedOn,
    /// `/led/off`
    LedOff,
    /// Any other path: just show the page.
    Page,
}

impl Route {
    /// Exact-match routing on the request target.
    pub fn from_path(path: &str) -> Self {
        match path {
            "/led/on" => Route::LedOn,
            "/led/off" => Route::LedOff,
            _ => Route::Page,
        }
    }

    /// The LED level this route sets, if any.
    pub fn target(&self) -> Option<bool> {
        match self {
            Route::LedOn => Some(true),
            Route::LedOff => Some(false),
            Route::Page => None,
        }
    }
}

/// Static text shown on the control page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageInfo {
    /// Access-point network name.
    pub network_name: String,
    /// Device name.
    pub device_name: String,
}

impl PageInfo {
    /// Page text from explicit names.
    pub fn new(network_name: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            network_name: network_name.into(),
            device_name: device_name.into(),
        }
    }

    /// Page text from the application config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.access_point.ssid.as_str(),
            config.device.name.as_str(),
        )
    }
}

/// Routes requests to the LED it owns.
///
/// Owning the actuator here means every mutation goes through
/// [`respond`](Self::respond), one request at a time.
#[derive(Debug)]
pub struct LedRouter<A> {
    led: A,
    page: PageInfo,
}

impl<A: Actuator> LedRouter<A> {
    /// Create a router owning `led`.
    pub fn new(led: A, page: PageInfo) -> Self {
        Self { led, page }
    }

    /// Parse, act and render. Performs at most one actuator write.
    pub fn respond(&mut self, request: &[u8]) -> HttpResponse {
        let line = match parse_request_line(request) {
            Ok(line) => line,
            Err(e) => {
                warn!("[HTTP] Malformed request: {}", e);
                return HttpResponse::html(400, error_page("Bad request", self.led.state()));
            }
        };
        info!("[HTTP] {} {}", line.method_token, line.path);

        if let Some(on) = Route::from_path(line.path).target() {
            if let Err(e) = self.led.set(on) {
                error!("[LED] Failed to switch {}: {:?}", ActuatorState::from(on), e);
                return HttpResponse::html(500, error_page("Device error", self.led.state()));
            }
            info!("[LED] Turned {}", self.led.state());
        }

        HttpResponse::ok_html(self.render())
    }

    /// Render the control page for the current LED state.
    pub fn render(&self) -> String {
        let state = self.led.state();
        let color = if state.is_on() { ON_COLOR } else { OFF_COLOR };
        let network = escape_html(&self.page.network_name);
        let device = escape_html(&self.page.device_name);
        fill_template(PAGE_TEMPLATE, |key| match key {
            "status" => Some(state.as_str()),
            "color" => Some(color),
            "network" => Some(network.as_str()),
            "device" => Some(device.as_str()),
            _ => None,
        })
    }

    /// Borrow the LED.
    pub fn actuator(&self) -> &A {
        &self.led
    }

    /// Mutably borrow the LED (shutdown uses this to force it off).
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.led
    }

    /// Page text.
    pub fn page(&self) -> &PageInfo {
        &self.page
    }

    /// Give the LED back.
    pub fn into_inner(self) -> A {
        self.led
    }
}

impl<A: Actuator> RequestHandler for LedRouter<A> {
    fn handle(&mut self, request: &[u8]) -> Vec<u8> {
        self.respond(request).to_bytes()
    }
}

fn error_page(message: &str, state: ActuatorState) -> String {
    alloc::format!(
        "<html><body><h1>Error</h1><p>{}</p><p>LED: {}</p></body></html>",
        message, state
    )
}

/// Substitute `{{key}}` placeholders in a single pass.
///
/// Inserted values are never scanned again, so a value that itself contains
/// `{{...}}` is emitted verbatim. Unknown keys are left as they are.
fn fill_template<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        match lookup(&after[..end]) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

//! Desktop run of the full access-point control loop.
//!
//! The radio is simulated (it comes up after two polls) and the LED is a
//! log line, but activation, the startup pattern, the accept loop and the
//! shutdown sequence are the real ones.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_ap            # listens on 127.0.0.1:8080
//! cargo run --example desktop_ap -- 3000    # or pick a port
//! RUST_LOG=debug cargo run --example desktop_ap
//! ```
//!
//! Then open <http://127.0.0.1:8080/led/on>. Press Enter to stop.

use std::cell::Cell;
use std::io::BufRead;
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use env_logger::{Builder, Env};
use log::info;
use numtx::access_point::AccessPoint;
use numtx::hal::{StdDelay, SystemClock};
use numtx::server::{bind_listener, ShutdownHandle};
use numtx::traits::{AccessPointRadio, Actuator, InterfaceStatus};
use numtx::{AccessPointConfig, Config, DeviceConfig, ServerConfig};

/// LED that only exists in the log.
#[derive(Default)]
struct ConsoleLed {
    on: bool,
}

impl Actuator for ConsoleLed {
    type Error = core::convert::Infallible;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        if on != self.on {
            info!("[LED] {}", if on { "●  on" } else { "○  off" });
        }
        self.on = on;
        Ok(())
    }

    fn read(&self) -> bool {
        self.on
    }
}

/// Radio that reports active on its third poll.
#[derive(Default)]
struct SimulatedRadio {
    enabled: bool,
    polls: Cell<u32>,
}

impl AccessPointRadio for SimulatedRadio {
    type Error = core::convert::Infallible;

    fn enable(&mut self) -> Result<(), Self::Error> {
        self.enabled = true;
        self.polls.set(0);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.enabled = false;
        Ok(())
    }

    fn apply(&mut self, config: &AccessPointConfig) -> Result<(), Self::Error> {
        info!("[Sim] Broadcasting '{}' on channel {}", config.ssid, config.channel);
        Ok(())
    }

    fn is_active(&self) -> bool {
        let polls = self.polls.get() + 1;
        self.polls.set(polls);
        self.enabled && polls > 2
    }

    fn interface_status(&self) -> Result<InterfaceStatus, Self::Error> {
        Ok(InterfaceStatus {
            ip: Ipv4Addr::LOCALHOST,
            ..InterfaceStatus::soft_ap_default()
        })
    }
}

fn main() -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let port = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("invalid port {:?}", arg))?,
        None => 8080,
    };

    let config = Config::default()
        .with_server(ServerConfig::default().with_port(port))
        .with_device(DeviceConfig::default().with_name("desktop"));

    let shutdown = ShutdownHandle::new();
    let waker = shutdown.clone();
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
        info!("Stopping...");
        waker.trigger_and_wake(addr);
    });

    let clock = SystemClock::new();
    let mut access_point = AccessPoint::new(SimulatedRadio::default());

    let summary = numtx::run(
        &config,
        ConsoleLed::default(),
        &mut access_point,
        &clock,
        &mut StdDelay,
        bind_listener,
        &shutdown,
    )?;

    info!(
        "Done: {} requests handled, {} failed",
        summary.handled, summary.failed
    );
    Ok(())
}

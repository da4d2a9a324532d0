//! Desktop number API server.
//!
//! Serves the rotating number on `http://0.0.0.0:5000` with permissive CORS.
//! `/api/signal` is backed by a fixed reading so the endpoint can be tried
//! without a radio.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example number_api --features web
//! curl http://localhost:5000/api/number
//! ```

use std::sync::Arc;

use env_logger::{Builder, Env};
use log::info;
use numtx::hal::{MockSignal, SystemClock};
use numtx::services::{run_server, NumberState, WebServerConfig};
use numtx::Config;

fn main() -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::default();
    let state = Arc::new(
        NumberState::new(SystemClock::new(), config.web.number_interval_ms)
            .with_sampler(MockSignal::new(Some(-58))),
    );

    info!("Rotating through 1-9, every {} ms", config.web.number_interval_ms);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_server(state, WebServerConfig::from_config(&config.web)))?;
    Ok(())
}

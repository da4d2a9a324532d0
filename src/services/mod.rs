//! Desktop number API (requires the `web` feature).
//!
//! The API serves the rotating number and link-quality readings as JSON.
//! Every handler shares one `NumberState` through an `Arc`:
//!
//! ```ignore
//! use std::sync::Arc;
//! use numtx::hal::SystemClock;
//! use numtx::services::{build_router, NumberState, WebServerConfig};
//!
//! let state = Arc::new(NumberState::new(SystemClock::new(), 1000));
//! let router = build_router(state, &WebServerConfig::default());
//! ```

pub mod api;
pub mod shared;
pub mod web;

pub use api::*;
pub use shared::*;
pub use web::*;

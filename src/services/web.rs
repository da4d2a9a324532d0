//! Axum-based HTTP server for the number API.
//!
//! Provides REST endpoints for:
//! - GET `/api/number` - Current number with timing details
//! - GET `/api/sequence` - The full sequence and its interval
//! - GET `/api/status` - Uptime and current number
//! - GET `/api/signal` - Classified RSSI reading (503 when unavailable)
//! - GET `/health` - Liveness probe
//!
//! Unknown paths get a JSON 404.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{debug, info};
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::traits::Clock;

use super::api::{
    ErrorResponse, HealthResponse, NumberResponse, SequenceResponse, SignalResponse,
    StatusResponse,
};
use super::shared::NumberState;

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/number - Returns the current number
async fn get_number<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<NumberState<C>>>,
) -> Json<NumberResponse> {
    let resp = NumberResponse::from_numbers(state.numbers(), unix_now());
    debug!("[Web] Returning number {}", resp.number);
    Json(resp)
}

/// GET /api/sequence - Describes the rotation
async fn get_sequence<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<NumberState<C>>>,
) -> Json<SequenceResponse> {
    Json(SequenceResponse::new(state.numbers().interval_ms()))
}

/// GET /api/status - Uptime and current number
async fn get_status<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<NumberState<C>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse::running(
        state.uptime_ms(),
        state.current_number(),
    ))
}

/// GET /api/signal - One classified RSSI sample
async fn get_signal<C: Clock + Send + Sync + 'static>(
    State(state): State<Arc<NumberState<C>>>,
) -> Response {
    match state.sample_signal() {
        Some(report) => Json(SignalResponse::from(report)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(
                "No signal",
                "No RSSI reading is available",
            )),
        )
            .into_response(),
    }
}

/// GET /health - Liveness probe
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found()))
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router<C: Clock + Send + Sync + 'static>(
    state: Arc<NumberState<C>>,
    config: &WebServerConfig,
) -> Router {
    let mut router = Router::new()
        .route("/api/number", get(get_number::<C>))
        .route("/api/sequence", get(get_sequence::<C>))
        .route("/api/status", get(get_status::<C>))
        .route("/api/signal", get(get_signal::<C>))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state);

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server with shared state
///
/// This function blocks until the server is shut down.
pub async fn run_server<C: Clock + Send + Sync + 'static>(
    state: Arc<NumberState<C>>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("[Web] Number API listening on http://{}", config.addr);

    axum::serve(listener, router).await
}

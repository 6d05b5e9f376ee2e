//! WebAPI - REST API Endpoints
//!
//! ## Responsibilities
//!
//! - HTTP API routes
//! - Request validation
//! - Response formatting

mod routes;

pub use routes::create_router;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::models::HealthResponse;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (store_connected, camera_count) = match state.cameras.list_cameras().await {
        Ok(cameras) => (true, cameras.len()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach camera store");
            (false, 0)
        }
    };

    let response = HealthResponse {
        status: if store_connected { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_sec: state.started_at.elapsed().as_secs(),
        store: state.backend.as_str().to_string(),
        store_connected,
        camera_count,
    };

    Json(response)
}

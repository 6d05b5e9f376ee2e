//! API Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::camera_store::{Camera, UpdateCameraRequest};
use crate::models::ApiResponse;
use crate::pages;
use crate::state::AppState;

/// Create the application router (pages + API)
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(super::health_check))
        // Cameras
        .route("/api/cameras/:id", get(get_camera).put(update_camera))
        // Pages
        .merge(pages::page_routes())
        .fallback(not_found)
        .with_state(state)
}

// ========================================
// Camera Handlers
// ========================================

async fn get_camera(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> crate::Result<Json<ApiResponse<Camera>>> {
    let camera = state.cameras.get_camera_by_id(&id).await?;
    Ok(Json(ApiResponse::success(camera)))
}

async fn update_camera(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCameraRequest>,
) -> crate::Result<Json<ApiResponse<Camera>>> {
    let camera = state.cameras.update_camera(&id, req).await?;
    Ok(Json(ApiResponse::success(camera)))
}

async fn not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

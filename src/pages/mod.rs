//! Pages - server-rendered HTML
//!
//! ## Responsibilities
//!
//! - Camera edit page with a streamed (deferred) form region
//! - Edit form submission
//! - Shared HTML components (document, skeleton, edit form)

pub mod components;
mod edit_camera;
pub mod suspense;

pub use components::{CameraEditForm, EditForm};
pub use edit_camera::{CameraForm, EDIT_CAMERA_HEADING, FORM_BOUNDARY_ID};

use axum::{routing::get, Router};

use crate::state::AppState;

/// Path of the edit page for `camera_id`
pub fn edit_path(camera_id: &str) -> String {
    format!("/cameras/{}/edit", camera_id)
}

/// Page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cameras/:id/edit",
            get(edit_camera::edit_camera_page).post(edit_camera::submit_camera_form),
        )
        .route("/cameras/:id/edit/form", get(edit_camera::edit_camera_form))
}

//! Edit Camera page
//!
//! `GET /cameras/:id/edit` looks the camera up and streams the page: the
//! heading and a form skeleton first, the initialized edit form once it has
//! rendered. Any lookup failure ends the request with a bare 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use maud::{html, Markup};
use serde::Deserialize;

use super::components::{self, EditForm};
use super::suspense::Suspense;
use crate::camera_store::{Camera, CameraFamily, UpdateCameraRequest};
use crate::error::{Error, Result};
use crate::state::AppState;

/// Page heading
pub const EDIT_CAMERA_HEADING: &str = "Edit Camera";

/// Boundary element id of the deferred form region
pub const FORM_BOUNDARY_ID: &str = "camera-form";

/// Edit page for a single camera
pub async fn edit_camera_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let camera = match state.cameras.get_camera_by_id(&id).await {
        Ok(camera) => camera,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    let form = state.edit_form.clone();
    let suspense = Suspense::new(
        FORM_BOUNDARY_ID,
        components::camera_form_skeleton(),
        async move { form.render(&id, &camera).await },
    );

    let shell = components::document_open(EDIT_CAMERA_HEADING, page_body(suspense.boundary(), None));
    suspense.into_response(shell, components::document_close())
}

/// Form fragment alone, for clients refreshing the region themselves
pub async fn edit_camera_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.cameras.get_camera_by_id(&id).await {
        Ok(camera) => Html(state.edit_form.render(&id, &camera).await.into_string()).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Form submission
pub async fn submit_camera_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CameraForm>,
) -> Response {
    let camera = match state.cameras.get_camera_by_id(&id).await {
        Ok(camera) => camera,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    match save_form(&state, &id, &form).await {
        Ok(_) => Redirect::to(&super::edit_path(&id)).into_response(),
        Err(Error::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(Error::Validation(message)) => {
            let mut submitted = camera;
            form.apply_to(&mut submitted);

            let form_markup = state.edit_form.render(&id, &submitted).await;
            let region = html! {
                div id=(FORM_BOUNDARY_ID) { (form_markup) }
            };
            let page = components::document(EDIT_CAMERA_HEADING, page_body(region, Some(message.as_str())));

            (StatusCode::UNPROCESSABLE_ENTITY, Html(page.into_string())).into_response()
        }
        Err(e) => {
            tracing::error!(camera_id = %id, error = %e, "Camera update failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn save_form(state: &AppState, id: &str, form: &CameraForm) -> Result<Camera> {
    let req = form.to_update()?;
    state.cameras.update_camera(id, req).await
}

fn page_body(region: Markup, error: Option<&str>) -> Markup {
    html! {
        div.container.mx-auto.px-4.py-8 {
            h1.text-3xl.font-bold.mb-6 { (EDIT_CAMERA_HEADING) }
            @if let Some(message) = error {
                div.mb-6.rounded.border.border-red-300.bg-red-50.px-4.py-3.text-red-700 role="alert" {
                    (message)
                }
            }
            (region)
        }
    }
}

/// Urlencoded body posted by the edit form
///
/// Unchecked checkboxes are not submitted, hence the `Option`s. A blank
/// optional text input clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CameraForm {
    pub name: String,
    pub location: String,
    pub floor: String,
    pub family: String,
    pub manufacturer: String,
    pub model: String,
    pub ip_address: String,
    pub rtsp_main: String,
    pub rtsp_sub: String,
    pub polling_interval_sec: String,
    pub enabled: Option<String>,
    pub polling_enabled: Option<String>,
}

impl CameraForm {
    /// Convert into an update request
    pub fn to_update(&self) -> Result<UpdateCameraRequest> {
        let family = CameraFamily::parse(&self.family)
            .ok_or_else(|| Error::Validation(format!("Unknown camera family {:?}", self.family)))?;

        let polling_interval_sec = self
            .polling_interval_sec
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::Validation("polling_interval_sec must be a whole number".to_string()))?;

        Ok(UpdateCameraRequest {
            name: Some(self.name.clone()),
            location: Some(self.location.trim().to_string()),
            floor: Some(non_blank(&self.floor)),
            rtsp_main: Some(non_blank(&self.rtsp_main)),
            rtsp_sub: Some(non_blank(&self.rtsp_sub)),
            family: Some(family),
            manufacturer: Some(non_blank(&self.manufacturer)),
            model: Some(non_blank(&self.model)),
            ip_address: Some(non_blank(&self.ip_address)),
            enabled: Some(self.enabled.is_some()),
            polling_enabled: Some(self.polling_enabled.is_some()),
            polling_interval_sec: Some(polling_interval_sec),
        })
    }

    /// Copy submitted values onto `camera` for re-rendering a rejected form
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.name = self.name.clone();
        camera.location = self.location.clone();
        camera.floor = non_blank(&self.floor);
        camera.family = self.family.clone();
        camera.manufacturer = non_blank(&self.manufacturer);
        camera.model = non_blank(&self.model);
        camera.ip_address = non_blank(&self.ip_address);
        camera.rtsp_main = non_blank(&self.rtsp_main);
        camera.rtsp_sub = non_blank(&self.rtsp_sub);
        camera.enabled = self.enabled.is_some();
        camera.polling_enabled = self.polling_enabled.is_some();
        if let Ok(interval) = self.polling_interval_sec.trim().parse() {
            camera.polling_interval_sec = interval;
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

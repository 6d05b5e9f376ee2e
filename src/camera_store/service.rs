//! CameraStore Service
//!
//! Business logic layer for camera lookup and editing

use super::repository::CameraRepository;
use super::types::*;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Camera service for business logic
#[derive(Clone)]
pub struct CameraService {
    repo: Arc<dyn CameraRepository>,
}

impl CameraService {
    /// Create new service
    pub fn new(repo: Arc<dyn CameraRepository>) -> Self {
        Self { repo }
    }

    /// List all cameras
    pub async fn list_cameras(&self) -> Result<Vec<Camera>> {
        self.repo.list_cameras().await
    }

    /// Get camera by ID
    ///
    /// Fails with `Validation` for ids outside the id rule and `NotFound`
    /// when no record exists.
    pub async fn get_camera_by_id(&self, camera_id: &str) -> Result<Camera> {
        if !is_valid_camera_id(camera_id) {
            return Err(Error::Validation(format!(
                "Invalid camera_id {:?}",
                camera_id
            )));
        }

        self.repo
            .get_camera(camera_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Camera {} not found", camera_id)))
    }

    /// Update camera
    pub async fn update_camera(&self, camera_id: &str, req: UpdateCameraRequest) -> Result<Camera> {
        // Check existence
        self.get_camera_by_id(camera_id).await?;

        let req = normalize(req);
        validate(&req)?;

        self.repo.update_camera(camera_id, &req).await
    }
}

fn normalize(mut req: UpdateCameraRequest) -> UpdateCameraRequest {
    req.name = req.name.map(|n| n.trim().to_string());
    req
}

fn validate(req: &UpdateCameraRequest) -> Result<()> {
    if let Some(name) = &req.name {
        if name.is_empty() || name.chars().count() > CAMERA_NAME_MAX_LEN {
            return Err(Error::Validation(format!(
                "name must be 1-{} characters",
                CAMERA_NAME_MAX_LEN
            )));
        }
    }

    if let Some(location) = &req.location {
        check_len("location", location, CAMERA_LOCATION_MAX_LEN)?;
    }

    let nullable = [
        ("floor", &req.floor, CAMERA_FLOOR_MAX_LEN),
        ("manufacturer", &req.manufacturer, CAMERA_VENDOR_MAX_LEN),
        ("model", &req.model, CAMERA_VENDOR_MAX_LEN),
        ("ip_address", &req.ip_address, CAMERA_IP_ADDRESS_MAX_LEN),
        ("rtsp_main", &req.rtsp_main, CAMERA_RTSP_URL_MAX_LEN),
        ("rtsp_sub", &req.rtsp_sub, CAMERA_RTSP_URL_MAX_LEN),
    ];
    for (field, value, max) in nullable {
        if let Some(Some(value)) = value {
            check_len(field, value, max)?;
        }
    }

    if let Some(interval) = req.polling_interval_sec {
        if !POLLING_INTERVAL_RANGE.contains(&interval) {
            return Err(Error::Validation(format!(
                "polling_interval_sec must be between {} and {}",
                POLLING_INTERVAL_RANGE.start(),
                POLLING_INTERVAL_RANGE.end()
            )));
        }
    }

    Ok(())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

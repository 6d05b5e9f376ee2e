//! CameraStore Repository
//!
//! Database access layer for cameras

use super::types::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

/// Storage port for camera records
#[async_trait]
pub trait CameraRepository: Send + Sync {
    /// Get camera by ID, `None` when no live record exists
    async fn get_camera(&self, camera_id: &str) -> Result<Option<Camera>>;

    /// List all live cameras ordered by name
    async fn list_cameras(&self) -> Result<Vec<Camera>>;

    /// Apply a partial update and return the stored record
    async fn update_camera(&self, camera_id: &str, req: &UpdateCameraRequest) -> Result<Camera>;
}

/// MySQL-backed camera repository
#[derive(Clone)]
pub struct MySqlCameraRepository {
    pool: MySqlPool,
}

impl MySqlCameraRepository {
    /// Create new repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Camera SELECT columns
    const CAMERA_COLUMNS: &'static str = r#"
        camera_id, name, location, floor,
        rtsp_main, rtsp_sub, family, manufacturer, model, ip_address,
        enabled, polling_enabled, polling_interval_sec,
        created_at, updated_at
    "#;

    async fn fetch_camera(&self, camera_id: &str) -> Result<Option<Camera>> {
        let query = format!(
            "SELECT {} FROM cameras WHERE camera_id = ? AND deleted_at IS NULL",
            Self::CAMERA_COLUMNS
        );
        let camera = sqlx::query_as::<_, Camera>(&query)
            .bind(camera_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(camera)
    }
}

#[async_trait]
impl CameraRepository for MySqlCameraRepository {
    async fn get_camera(&self, camera_id: &str) -> Result<Option<Camera>> {
        self.fetch_camera(camera_id).await.map_err(|e| {
            tracing::warn!(camera_id = %camera_id, error = %e, "Camera lookup failed");
            e
        })
    }

    async fn list_cameras(&self) -> Result<Vec<Camera>> {
        let query = format!(
            "SELECT {} FROM cameras WHERE deleted_at IS NULL ORDER BY name, camera_id",
            Self::CAMERA_COLUMNS
        );
        let cameras = sqlx::query_as::<_, Camera>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(cameras)
    }

    async fn update_camera(&self, camera_id: &str, req: &UpdateCameraRequest) -> Result<Camera> {
        let now = chrono::Utc::now();

        let mut set_clauses = vec!["updated_at = ?"];

        if req.name.is_some() { set_clauses.push("name = ?"); }
        if req.location.is_some() { set_clauses.push("location = ?"); }
        if req.floor.is_some() { set_clauses.push("floor = ?"); }
        if req.rtsp_main.is_some() { set_clauses.push("rtsp_main = ?"); }
        if req.rtsp_sub.is_some() { set_clauses.push("rtsp_sub = ?"); }
        if req.family.is_some() { set_clauses.push("family = ?"); }
        if req.manufacturer.is_some() { set_clauses.push("manufacturer = ?"); }
        if req.model.is_some() { set_clauses.push("model = ?"); }
        if req.ip_address.is_some() { set_clauses.push("ip_address = ?"); }
        if req.enabled.is_some() { set_clauses.push("enabled = ?"); }
        if req.polling_enabled.is_some() { set_clauses.push("polling_enabled = ?"); }
        if req.polling_interval_sec.is_some() { set_clauses.push("polling_interval_sec = ?"); }

        if set_clauses.len() > 1 {
            let query = format!(
                "UPDATE cameras SET {} WHERE camera_id = ? AND deleted_at IS NULL",
                set_clauses.join(", ")
            );

            // Bind in same order as set_clauses; `Some(None)` binds NULL
            let mut q = sqlx::query(&query).bind(now);
            if let Some(ref v) = req.name { q = q.bind(v); }
            if let Some(ref v) = req.location { q = q.bind(v); }
            if let Some(ref v) = req.floor { q = q.bind(v.as_deref()); }
            if let Some(ref v) = req.rtsp_main { q = q.bind(v.as_deref()); }
            if let Some(ref v) = req.rtsp_sub { q = q.bind(v.as_deref()); }
            if let Some(v) = req.family { q = q.bind(v.as_str()); }
            if let Some(ref v) = req.manufacturer { q = q.bind(v.as_deref()); }
            if let Some(ref v) = req.model { q = q.bind(v.as_deref()); }
            if let Some(ref v) = req.ip_address { q = q.bind(v.as_deref()); }
            if let Some(v) = req.enabled { q = q.bind(v); }
            if let Some(v) = req.polling_enabled { q = q.bind(v); }
            if let Some(v) = req.polling_interval_sec { q = q.bind(v); }

            q.bind(camera_id).execute(&self.pool).await?;

            tracing::info!(camera_id = %camera_id, fields = set_clauses.len() - 1, "Camera updated");
        }

        self.fetch_camera(camera_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Camera {} not found", camera_id)))
    }
}

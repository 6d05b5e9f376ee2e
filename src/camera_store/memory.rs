//! In-memory camera repository
//!
//! Used when no DATABASE_URL is configured, and by tests.

use super::repository::CameraRepository;
use super::types::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// Camera repository backed by a HashMap
#[derive(Default)]
pub struct MemoryCameraRepository {
    cameras: RwLock<HashMap<String, Camera>>,
}

impl MemoryCameraRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository holding the given cameras (later duplicates win)
    pub fn with_cameras(cameras: impl IntoIterator<Item = Camera>) -> Self {
        let map = cameras
            .into_iter()
            .map(|c| (c.camera_id.clone(), c))
            .collect();
        Self {
            cameras: RwLock::new(map),
        }
    }

    /// Load a JSON array of cameras
    pub async fn from_seed_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let cameras: Vec<Camera> = serde_json::from_str(&raw)?;

        if let Some(bad) = cameras.iter().find(|c| !is_valid_camera_id(&c.camera_id)) {
            return Err(Error::Config(format!(
                "Seed file {} contains invalid camera_id {:?}",
                path.display(),
                bad.camera_id
            )));
        }

        tracing::info!(path = %path.display(), count = cameras.len(), "Loaded camera seed file");

        Ok(Self::with_cameras(cameras))
    }
}

#[async_trait]
impl CameraRepository for MemoryCameraRepository {
    async fn get_camera(&self, camera_id: &str) -> Result<Option<Camera>> {
        Ok(self.cameras.read().await.get(camera_id).cloned())
    }

    async fn list_cameras(&self) -> Result<Vec<Camera>> {
        let mut cameras: Vec<Camera> = self.cameras.read().await.values().cloned().collect();
        cameras.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.camera_id.cmp(&b.camera_id)));
        Ok(cameras)
    }

    async fn update_camera(&self, camera_id: &str, req: &UpdateCameraRequest) -> Result<Camera> {
        let mut cameras = self.cameras.write().await;
        let camera = cameras
            .get_mut(camera_id)
            .ok_or_else(|| Error::NotFound(format!("Camera {} not found", camera_id)))?;

        camera.apply(req);
        camera.updated_at = chrono::Utc::now();

        Ok(camera.clone())
    }
}

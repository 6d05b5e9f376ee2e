//! Application state
//!
//! Holds all shared components and state

use crate::camera_store::{CameraRepository, CameraService};
use crate::pages::{CameraEditForm, EditForm};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database URL; cameras are kept in memory when unset
    pub database_url: Option<String>,
    /// Max MySQL pool connections
    pub db_max_connections: u32,
    /// JSON file seeding the in-memory store
    pub camera_seed_file: Option<PathBuf>,
    /// Server port
    pub port: u16,
    /// Server host
    pub host: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),
            camera_seed_file: std::env::var("CAMERA_SEED_FILE").ok().map(PathBuf::from),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}

/// Storage backend in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MySql,
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Memory => "memory",
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Camera lookup and editing
    pub cameras: CameraService,
    /// Edit form component rendered into the edit page
    pub edit_form: Arc<dyn EditForm>,
    /// Storage backend behind `cameras`
    pub backend: StoreBackend,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// State with the default edit form
    pub fn new(config: AppConfig, repo: Arc<dyn CameraRepository>, backend: StoreBackend) -> Self {
        Self {
            config,
            cameras: CameraService::new(repo),
            edit_form: Arc::new(CameraEditForm),
            backend,
            started_at: Instant::now(),
        }
    }

    /// Replace the edit form component
    pub fn with_edit_form(mut self, edit_form: Arc<dyn EditForm>) -> Self {
        self.edit_form = edit_form;
        self
    }
}

//! CameraStore - camera records for the console
//!
//! ## Responsibilities
//!
//! - Camera lookup by ID (the edit page's data source)
//! - Partial updates submitted from the edit form
//! - Storage behind the `CameraRepository` port (MySQL or in-memory)

mod memory;
mod repository;
mod service;
mod types;

pub use memory::MemoryCameraRepository;
pub use repository::{CameraRepository, MySqlCameraRepository};
pub use service::CameraService;
pub use types::*;

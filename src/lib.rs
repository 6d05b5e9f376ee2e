//! Camera Console Library
//!
//! Server-rendered camera management pages.
//!
//! ## Architecture
//!
//! 1. CameraStore - camera records behind a repository port (MySQL / memory)
//! 2. Pages - edit page with a streamed form region, form submission
//! 3. WebAPI - JSON endpoints and health check
//!
//! ## Request flow
//!
//! `GET /cameras/:id/edit` looks the camera up through `CameraService`.
//! Found: the shell (heading + skeleton) is flushed, then the edit form.
//! Any lookup failure: bare 404.

pub mod camera_store;
pub mod error;
pub mod models;
pub mod pages;
pub mod state;
pub mod web_api;

pub use error::{Error, Result};
pub use state::AppState;

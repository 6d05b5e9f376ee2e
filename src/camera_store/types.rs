//! CameraStore data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum camera_id length accepted by lookups
pub const CAMERA_ID_MAX_LEN: usize = 64;

/// Maximum camera name length
pub const CAMERA_NAME_MAX_LEN: usize = 128;

/// Column limits of the `cameras` table (characters)
pub const CAMERA_LOCATION_MAX_LEN: usize = 255;
pub const CAMERA_FLOOR_MAX_LEN: usize = 32;
pub const CAMERA_VENDOR_MAX_LEN: usize = 128;
pub const CAMERA_IP_ADDRESS_MAX_LEN: usize = 45;
pub const CAMERA_RTSP_URL_MAX_LEN: usize = 512;

/// Accepted polling interval range (seconds)
pub const POLLING_INTERVAL_RANGE: std::ops::RangeInclusive<i32> = 5..=3600;

/// Camera entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Camera {
    pub camera_id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub floor: Option<String>,
    pub rtsp_main: Option<String>,
    pub rtsp_sub: Option<String>,
    /// Stored as VARCHAR in MySQL, converted to/from CameraFamily
    #[serde(default = "default_family")]
    pub family: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub ip_address: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub polling_enabled: bool,
    #[serde(default = "default_polling_interval")]
    pub polling_interval_sec: i32,
    // Seed files may omit timestamps
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_family() -> String {
    CameraFamily::Unknown.as_str().to_string()
}

fn default_true() -> bool {
    true
}

fn default_polling_interval() -> i32 {
    60
}

impl Camera {
    /// Camera with default policy values, used for seeding and tests
    pub fn new(camera_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            camera_id: camera_id.into(),
            name: name.into(),
            location: String::new(),
            floor: None,
            rtsp_main: None,
            rtsp_sub: None,
            family: default_family(),
            manufacturer: None,
            model: None,
            ip_address: None,
            enabled: true,
            polling_enabled: true,
            polling_interval_sec: default_polling_interval(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update; absent fields stay unchanged
    pub fn apply(&mut self, req: &UpdateCameraRequest) {
        if let Some(name) = &req.name {
            self.name = name.clone();
        }
        if let Some(location) = &req.location {
            self.location = location.clone();
        }
        if let Some(floor) = &req.floor {
            self.floor = floor.clone();
        }
        if let Some(rtsp_main) = &req.rtsp_main {
            self.rtsp_main = rtsp_main.clone();
        }
        if let Some(rtsp_sub) = &req.rtsp_sub {
            self.rtsp_sub = rtsp_sub.clone();
        }
        if let Some(family) = req.family {
            self.family = family.as_str().to_string();
        }
        if let Some(manufacturer) = &req.manufacturer {
            self.manufacturer = manufacturer.clone();
        }
        if let Some(model) = &req.model {
            self.model = model.clone();
        }
        if let Some(ip_address) = &req.ip_address {
            self.ip_address = ip_address.clone();
        }
        if let Some(enabled) = req.enabled {
            self.enabled = enabled;
        }
        if let Some(polling_enabled) = req.polling_enabled {
            self.polling_enabled = polling_enabled;
        }
        if let Some(interval) = req.polling_interval_sec {
            self.polling_interval_sec = interval;
        }
    }
}

/// Camera family
///
/// Decoded from API bodies and form posts; stored as its `as_str` value in
/// the VARCHAR `family` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CameraFamily {
    Tapo,
    Vigi,
    Nest,
    Axis,
    Hikvision,
    Dahua,
    Other,
    Unknown,
}

impl CameraFamily {
    pub const ALL: [CameraFamily; 8] = [
        Self::Tapo,
        Self::Vigi,
        Self::Nest,
        Self::Axis,
        Self::Hikvision,
        Self::Dahua,
        Self::Other,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tapo => "tapo",
            Self::Vigi => "vigi",
            Self::Nest => "nest",
            Self::Axis => "axis",
            Self::Hikvision => "hikvision",
            Self::Dahua => "dahua",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }

    /// Display label for select options
    pub fn label(self) -> &'static str {
        match self {
            Self::Tapo => "TP-Link Tapo",
            Self::Vigi => "TP-Link VIGI",
            Self::Nest => "Google Nest",
            Self::Axis => "Axis",
            Self::Hikvision => "Hikvision",
            Self::Dahua => "Dahua",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a family name, `None` for unknown strings
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

/// Camera update request
///
/// Nullable columns use `Option<Option<_>>`: absent leaves the value
/// unchanged, `Some(None)` (JSON `null`) clears it.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateCameraRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub floor: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub rtsp_main: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub rtsp_sub: Option<Option<String>>,
    pub family: Option<CameraFamily>,
    #[serde(default, deserialize_with = "nullable")]
    pub manufacturer: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub model: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub ip_address: Option<Option<String>>,
    pub enabled: Option<bool>,
    pub polling_enabled: Option<bool>,
    pub polling_interval_sec: Option<i32>,
}

// A present field, `null` included, becomes `Some`
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Whether `camera_id` follows the id rule: 1-64 chars of `[A-Za-z0-9_-]`
pub fn is_valid_camera_id(camera_id: &str) -> bool {
    !camera_id.is_empty()
        && camera_id.len() <= CAMERA_ID_MAX_LEN
        && camera_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

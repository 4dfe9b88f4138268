// UniFi Protect API response types
//
// Models for the NVR's private JSON API. Fields use `#[serde(default)]`
// liberally because field presence varies across Protect firmware versions;
// everything undocumented lands in `extra`.

use serde::{Deserialize, Serialize};

// ── Recording mode ───────────────────────────────────────────────────

/// Camera recording behavior, as carried in `recordingSettings.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RecordingMode {
    Never,
    Motion,
    Always,
    SmartDetect,
}

// ── Camera ───────────────────────────────────────────────────────────

/// Recording configuration nested inside a camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSettings {
    pub mode: RecordingMode,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Status-light configuration nested inside a camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedSettings {
    pub is_enabled: bool,
    #[serde(default)]
    pub blink_rate: i64,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Camera object from the bootstrap payload or `cameras/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mac: Option<String>,
    /// Connection state as reported by the NVR (e.g. "CONNECTED").
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub recording_settings: Option<RecordingSettings>,
    #[serde(default)]
    pub led_settings: Option<LedSettings>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Camera {
    /// The camera's current recording mode, if the NVR reported one.
    pub fn recording_mode(&self) -> Option<RecordingMode> {
        self.recording_settings.as_ref().map(|r| r.mode)
    }
}

// ── Bootstrap ────────────────────────────────────────────────────────

/// Full NVR state snapshot from `GET {prefix}/bootstrap`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootstrap {
    #[serde(default)]
    pub cameras: Vec<Camera>,
    #[serde(default)]
    pub nvr: Option<NvrInfo>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// NVR identity block inside the bootstrap payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvrInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

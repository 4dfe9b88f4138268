// ── Camera node ──
//
// One node per physical camera. The node mirrors the camera's recording
// mode as a hub ordinal and translates SET_RECORDING selectors into two
// NVR calls (recording mode, then status light). The mirror is only
// refreshed on explicit query, so it can go stale between queries.

use protect_api::{ProtectSession, RecordingMode, TransportConfig};
use tracing::{debug, warn};

use crate::config::ConfigHandle;
use crate::error::CoreError;
use crate::hub::{HubLink, driver};

/// Hub ordinal for a recording mode (1-4).
pub fn mode_ordinal(mode: RecordingMode) -> i64 {
    match mode {
        RecordingMode::Never => 1,
        RecordingMode::Motion => 2,
        RecordingMode::Always => 3,
        RecordingMode::SmartDetect => 4,
    }
}

/// Translate a hub selector into a recording mode and status-light flag.
///
/// The light is off only for `never`. Selectors outside 1-4 are rejected
/// rather than silently ignored.
pub fn selector_to_mode(value: &str) -> Result<(RecordingMode, bool), CoreError> {
    let mode = match value.trim() {
        "1" => RecordingMode::Never,
        "2" => RecordingMode::Motion,
        "3" => RecordingMode::Always,
        "4" => RecordingMode::SmartDetect,
        other => {
            return Err(CoreError::UnknownSelector {
                value: other.to_owned(),
            });
        }
    };
    Ok((mode, mode != RecordingMode::Never))
}

/// One hub node mirroring one physical camera.
pub struct CameraNode {
    address: String,
    name: String,
    camera_id: String,
    config: ConfigHandle,
    transport: TransportConfig,
    /// Refresh on every frequent poll tick.
    pub active_poll: bool,
    reported_mode: Option<i64>,
}

impl CameraNode {
    pub fn new(
        address: String,
        name: String,
        camera_id: String,
        config: ConfigHandle,
        transport: TransportConfig,
    ) -> Self {
        Self {
            address,
            name,
            camera_id,
            config,
            transport,
            active_poll: true,
            reported_mode: None,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    /// Last ordinal pushed to the hub; stale between queries.
    pub fn reported_mode(&self) -> Option<i64> {
        self.reported_mode
    }

    /// Fetch the live camera record and report its recording mode.
    ///
    /// On any remote failure the previously reported value is left
    /// untouched -- stale beats cleared.
    pub async fn query(&mut self, hub: &mut dyn HubLink) -> Result<(), CoreError> {
        let Some(config) = self.config.current() else {
            return Err(CoreError::NotConfigured);
        };

        let session = ProtectSession::open(
            config.base_url()?,
            &config.userid,
            &config.password,
            &self.transport,
        )
        .await?;
        let result = session.camera(&self.camera_id).await;
        session.close();

        let camera = result?.ok_or_else(|| CoreError::CameraGone {
            id: self.camera_id.clone(),
        })?;

        let Some(mode) = camera.recording_mode() else {
            warn!(camera = %self.name, "camera reported no recording settings");
            return Ok(());
        };

        let ordinal = mode_ordinal(mode);
        hub.set_driver(&self.address, driver::RECORDING, ordinal);
        self.reported_mode = Some(ordinal);
        debug!(camera = %self.name, %mode, ordinal, "reported recording mode");
        Ok(())
    }

    /// Apply a SET_RECORDING command: push the new mode and the matching
    /// status-light state in one session, two sequential calls.
    ///
    /// Local state is not touched; the next query picks up the change.
    pub async fn set_recording_mode(&self, value: &str) -> Result<(), CoreError> {
        let (mode, light) = selector_to_mode(value)?;

        let Some(config) = self.config.current() else {
            return Err(CoreError::NotConfigured);
        };

        let session = ProtectSession::open(
            config.base_url()?,
            &config.userid,
            &config.password,
            &self.transport,
        )
        .await?;
        let result = async {
            session.set_recording_mode(&self.camera_id, mode).await?;
            session.set_status_light(&self.camera_id, light).await
        }
        .await;
        session.close();
        result?;

        debug!(camera = %self.name, %mode, light, "recording mode updated");
        Ok(())
    }
}

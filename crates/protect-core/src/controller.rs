// ── Controller node ──
//
// Owns the hub-delivered connection parameters, discovers cameras, relays
// poll ticks, and dispatches node commands. The event loop hands over one
// event at a time and each handler runs to completion, so no two remote
// operations ever overlap.

use std::collections::HashMap;

use protect_api::{ProtectSession, TransportConfig};
use tracing::{debug, info, warn};

use crate::address::{clean_name, stable_address};
use crate::camera::CameraNode;
use crate::config::{ConfigHandle, NvrConfig};
use crate::error::CoreError;
use crate::event::{HubEvent, NodeCommand};
use crate::hub::{HubLink, NodeDef, NodeKind, driver, heartbeat};

/// Stable hub address of the controller node itself.
pub const CONTROLLER_ADDRESS: &str = "controller";
/// Display name of the controller node.
pub const CONTROLLER_NAME: &str = "UnifiProtect";

/// The parent node: configuration, discovery, polling, dispatch.
pub struct ControllerNode {
    config: ConfigHandle,
    transport: TransportConfig,
    cameras: Vec<CameraNode>,
    /// Two-state heartbeat, toggled on every infrequent tick.
    hb_on: bool,
}

impl ControllerNode {
    pub fn new(transport: TransportConfig) -> Self {
        Self {
            config: ConfigHandle::new(),
            transport,
            cameras: Vec::new(),
            hb_on: false,
        }
    }

    /// Registered camera nodes, in discovery order.
    pub fn cameras(&self) -> &[CameraNode] {
        &self.cameras
    }

    /// Register the controller node and report initial liveness.
    pub fn start(&self, hub: &mut dyn HubLink) {
        info!("starting UniFi Protect node server");
        if !hub.has_node(CONTROLLER_ADDRESS) {
            hub.add_node(NodeDef {
                address: CONTROLLER_ADDRESS.into(),
                name: CONTROLLER_NAME.into(),
                kind: NodeKind::Controller,
            });
        }
        hub.set_driver(CONTROLLER_ADDRESS, driver::STATUS, 0);
    }

    /// Route one hub event to its handler.
    pub async fn handle(
        &mut self,
        event: HubEvent,
        hub: &mut dyn HubLink,
    ) -> Result<(), CoreError> {
        match event {
            HubEvent::Config { params } => self.configure(&params, hub).await,
            HubEvent::ShortPoll => {
                self.short_poll(hub).await;
                Ok(())
            }
            HubEvent::LongPoll => {
                self.long_poll(hub);
                Ok(())
            }
            HubEvent::Command { address, command } => self.dispatch(&address, command, hub).await,
        }
    }

    /// Validate hub-delivered parameters and, when valid, run discovery.
    ///
    /// On a validation failure the controller stays inert until the hub
    /// re-delivers usable parameters; no NVR call is made.
    pub async fn configure(
        &mut self,
        params: &HashMap<String, String>,
        hub: &mut dyn HubLink,
    ) -> Result<(), CoreError> {
        let config = NvrConfig::from_params(params)?;
        info!(host = %config.host, port = %config.port, "configuration accepted");
        self.config.replace(config);
        self.discover(hub).await
    }

    /// Discover cameras and register one child node per camera.
    ///
    /// Idempotent: a camera whose stable address is already registered is
    /// skipped. Zero cameras is not an error. A remote failure leaves the
    /// registry untouched -- registration only starts after the full fetch
    /// succeeds.
    pub async fn discover(&mut self, hub: &mut dyn HubLink) -> Result<(), CoreError> {
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
        let result = session.bootstrap().await;
        session.close();
        let bootstrap = result?;

        info!(cameras = bootstrap.cameras.len(), "discovery fetched camera set");

        for camera in bootstrap.cameras {
            let name = clean_name(&camera.name);
            let address = stable_address(&camera.name);
            if hub.has_node(&address) {
                debug!(%address, camera = %name, "node already registered");
                continue;
            }
            hub.add_node(NodeDef {
                address: address.clone(),
                name: name.clone(),
                kind: NodeKind::Camera,
            });
            self.cameras.push(CameraNode::new(
                address,
                name,
                camera.id,
                self.config.clone(),
                self.transport.clone(),
            ));
        }
        Ok(())
    }

    /// Frequent tick: report liveness and refresh actively polled cameras.
    ///
    /// Per-camera failures are logged and skipped; the tick never fails.
    pub async fn short_poll(&mut self, hub: &mut dyn HubLink) {
        hub.set_driver(CONTROLLER_ADDRESS, driver::STATUS, 1);
        for camera in &mut self.cameras {
            if !camera.active_poll {
                continue;
            }
            if let Err(e) = camera.query(hub).await {
                warn!(camera = %camera.name(), error = %e, "poll refresh failed");
            }
        }
    }

    /// Infrequent tick: emit the alternating heartbeat pulse.
    pub fn long_poll(&mut self, hub: &mut dyn HubLink) {
        let pulse = if self.hb_on { heartbeat::OFF } else { heartbeat::ON };
        debug!(pulse, "heartbeat");
        hub.report_command(CONTROLLER_ADDRESS, pulse);
        self.hb_on = !self.hb_on;
    }

    /// Relay a report-current-state request to every registered unit.
    pub async fn query(&mut self, hub: &mut dyn HubLink) {
        hub.set_driver(CONTROLLER_ADDRESS, driver::STATUS, 1);
        for camera in &mut self.cameras {
            if let Err(e) = camera.query(hub).await {
                warn!(camera = %camera.name(), error = %e, "query failed");
            }
        }
    }

    /// Dispatch a node command by address.
    async fn dispatch(
        &mut self,
        address: &str,
        command: NodeCommand,
        hub: &mut dyn HubLink,
    ) -> Result<(), CoreError> {
        if address == CONTROLLER_ADDRESS {
            return match command {
                NodeCommand::Query => {
                    self.query(hub).await;
                    Ok(())
                }
                NodeCommand::Discover => self.discover(hub).await,
                NodeCommand::SetRecording { .. } => Err(CoreError::UnknownCommand {
                    command: "SET_RECORDING".into(),
                }),
            };
        }

        let Some(camera) = self.cameras.iter_mut().find(|c| c.address() == address) else {
            return Err(CoreError::NodeNotFound {
                address: address.to_owned(),
            });
        };

        match command {
            NodeCommand::Query => camera.query(hub).await,
            NodeCommand::SetRecording { value } => camera.set_recording_mode(&value).await,
            NodeCommand::Discover => Err(CoreError::UnknownCommand {
                command: "DISCOVER".into(),
            }),
        }
    }
}

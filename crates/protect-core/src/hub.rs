// ── Hub boundary ──
//
// The hub framework owns the node registry and the driver/command surface.
// This trait is the whole contract: the daemon implements it over the hub
// wire protocol, tests implement it in memory.

/// Node flavor, mapped to the hub's node-definition id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Controller,
    Camera,
}

impl NodeKind {
    /// Hub-side node definition id.
    pub fn id(self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Camera => "UNIFI_CAM",
        }
    }
}

/// A node registration request.
#[derive(Debug, Clone)]
pub struct NodeDef {
    pub address: String,
    pub name: String,
    pub kind: NodeKind,
}

/// Driver names reported to the hub.
pub mod driver {
    /// Controller liveness: 0 until started, 1 afterwards.
    pub const STATUS: &str = "ST";
    /// Camera recording-mode ordinal (1-4).
    pub const RECORDING: &str = "GV2";
}

/// Heartbeat pulse commands, alternated on every infrequent poll tick.
pub mod heartbeat {
    pub const ON: &str = "DON";
    pub const OFF: &str = "DOF";
}

/// Surface the hub framework exposes to nodes.
pub trait HubLink {
    /// True when a node is already registered at `address`.
    fn has_node(&self, address: &str) -> bool;

    /// Register a node. The hub skips registration when the address
    /// already exists.
    fn add_node(&mut self, node: NodeDef);

    /// Report a driver value for a node.
    fn set_driver(&mut self, address: &str, driver: &str, value: i64);

    /// Report a command pulse from a node (heartbeat).
    fn report_command(&mut self, address: &str, command: &str);
}

// protect-core: node-server logic between the hub framework and protect-api.

pub mod address;
pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod hub;

// ── Primary re-exports ──────────────────────────────────────────────
pub use camera::CameraNode;
pub use config::{ConfigHandle, NvrConfig};
pub use controller::ControllerNode;
pub use error::CoreError;
pub use event::{HubEvent, NodeCommand};
pub use hub::{HubLink, NodeDef, NodeKind};

// protect-api: Async Rust client for the UniFi Protect NVR private API.

pub mod error;
pub mod models;
pub mod session;
pub mod transport;

pub use error::Error;
pub use models::{Bootstrap, Camera, LedSettings, RecordingMode, RecordingSettings};
pub use session::{NvrPlatform, ProtectSession};
pub use transport::TransportConfig;

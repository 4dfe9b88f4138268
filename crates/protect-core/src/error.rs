// ── Core error types ──
//
// Node-facing errors. Remote failures are wrapped so the event loop logs
// one message per abandoned operation; nothing here ever aborts the
// process.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Controller is not configured -- waiting for hub parameters")]
    NotConfigured,

    #[error("No node registered at address {address}")]
    NodeNotFound { address: String },

    #[error("Camera {id} is no longer present on the NVR")]
    CameraGone { id: String },

    #[error("Unrecognized recording selector: {value} (expected 1-4)")]
    UnknownSelector { value: String },

    #[error("Command {command} is not supported by this node")]
    UnknownCommand { command: String },

    #[error("NVR error: {0}")]
    Nvr(#[from] protect_api::Error),
}

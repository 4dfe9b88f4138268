use thiserror::Error;

/// Top-level error type for the `protect-api` crate.
///
/// Covers every failure mode of a Protect session: authentication,
/// transport, and the NVR API itself. `protect-core` maps these into
/// node-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session has expired (cookie expired or token revoked).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success response from the Protect API.
    #[error("Protect API error (HTTP {status}): {message}")]
    Nvr { message: String, status: u16 },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the session is no longer
    /// authenticated.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Nvr { status: 404, .. } => true,
            _ => false,
        }
    }
}

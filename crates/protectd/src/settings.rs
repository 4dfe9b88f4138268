//! Daemon-owned settings: transport tuning only. Connection credentials
//! always come from the hub's custom configuration, never from this file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use protect_api::TransportConfig;

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Verify the NVR's TLS certificate. Protect consoles are usually
    /// self-signed, so this defaults to off.
    #[serde(default)]
    pub verify_tls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            verify_tls: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Settings {
    /// Resolve the default settings path via platform conventions.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "protect-bridge", "protectd")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Load settings from file + `PROTECTD_`-prefixed environment.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);

        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PROTECTD_"))
            .extract()
    }

    /// Transport configuration for NVR sessions.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            verify_tls: self.verify_tls,
            timeout: Duration::from_secs(self.timeout),
            cookie_jar: None,
        }
    }
}

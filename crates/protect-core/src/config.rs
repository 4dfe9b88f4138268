// ── Hub-supplied connection configuration ──
//
// The hub delivers connection parameters as a flat string map. They are
// validated once here and then shared read-only: camera nodes receive a
// `ConfigHandle` at construction instead of reaching back into the
// controller.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Custom-parameter keys recognized in hub configuration.
pub const PARAM_HOST: &str = "unifi_host";
pub const PARAM_PORT: &str = "unifi_port";
pub const PARAM_USERID: &str = "unifi_userid";
pub const PARAM_PASSWORD: &str = "unifi_password";

const DEFAULT_PORT: &str = "8443";

/// Validated NVR connection parameters.
///
/// Immutable for the life of a session; the hub may replace the whole set
/// by re-delivering configuration.
#[derive(Debug, Clone)]
pub struct NvrConfig {
    pub host: String,
    pub port: String,
    pub userid: String,
    pub password: SecretString,
}

impl NvrConfig {
    /// Build from the hub's custom-parameter map.
    ///
    /// `unifi_host`, `unifi_userid`, and `unifi_password` must be present
    /// and non-empty; `unifi_port` defaults to 8443.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, CoreError> {
        let host = param(params, PARAM_HOST, "");
        let port = param(params, PARAM_PORT, DEFAULT_PORT);
        let userid = param(params, PARAM_USERID, "");
        let password = param(params, PARAM_PASSWORD, "");

        if host.is_empty() || userid.is_empty() || password.is_empty() {
            return Err(CoreError::Config {
                message: format!(
                    "'{PARAM_HOST}', '{PARAM_USERID}' and '{PARAM_PASSWORD}' must be set in custom configuration"
                ),
            });
        }

        Ok(Self {
            host,
            port,
            userid,
            password: SecretString::from(password),
        })
    }

    /// NVR base URL.
    ///
    /// `https://{host}:{port}`; a host carrying an explicit scheme is
    /// honored as-is.
    pub fn base_url(&self) -> Result<Url, CoreError> {
        let raw = if self.host.contains("://") {
            format!("{}:{}", self.host, self.port)
        } else {
            format!("https://{}:{}", self.host, self.port)
        };
        raw.parse().map_err(|_| CoreError::Config {
            message: format!("invalid NVR address: {raw}"),
        })
    }
}

fn param(params: &HashMap<String, String>, key: &str, default: &str) -> String {
    params
        .get(key)
        .map_or_else(|| default.to_owned(), |v| v.trim().to_owned())
}

// ── Shared handle ────────────────────────────────────────────────────

/// Shared read-only view of the current configuration.
///
/// The controller replaces the config wholesale when the hub re-delivers
/// parameters; camera nodes observe the replacement on their next
/// operation. Cloning the handle is cheap.
#[derive(Clone, Default)]
pub struct ConfigHandle {
    inner: Arc<ArcSwapOption<NvrConfig>>,
}

impl ConfigHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active configuration, if the hub has delivered a valid one.
    pub fn current(&self) -> Option<Arc<NvrConfig>> {
        self.inner.load_full()
    }

    /// Replace the configuration wholesale.
    pub fn replace(&self, config: NvrConfig) {
        self.inner.store(Some(Arc::new(config)));
    }
}

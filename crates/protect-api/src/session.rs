// Protect NVR session
//
// One authenticated HTTP session against a UniFi Protect NVR. Sessions are
// short-lived by design: open, perform one or two calls, close. The caller
// owns the lifetime and must call `close()` on every exit path.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Bootstrap, Camera, RecordingMode};
use crate::transport::TransportConfig;

// ── Platform ─────────────────────────────────────────────────────────

/// Which flavor of Protect host we are talking to.
///
/// UniFi OS consoles proxy Protect under `/proxy/protect/api` and use
/// cookie-based auth at `/api/auth/login`. CloudKey Gen2 firmware before
/// UniFi OS serves Protect directly under `/api` and returns a bearer
/// token from `/api/auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvrPlatform {
    UnifiOs,
    CloudKey,
}

impl NvrPlatform {
    /// Path prefix for Protect API endpoints.
    pub fn api_prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/protect/api",
            Self::CloudKey => "/api",
        }
    }

    /// Login endpoint path.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::CloudKey => "/api/auth",
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// An authenticated session against a Protect NVR.
///
/// Holds the HTTP client (session cookie in its jar), the CSRF token
/// captured at login (UniFi OS) or the bearer token (CloudKey), and the
/// detected platform.
pub struct ProtectSession {
    http: reqwest::Client,
    base_url: Url,
    platform: NvrPlatform,
    csrf_token: Option<String>,
    bearer_token: Option<String>,
}

impl ProtectSession {
    /// Detect the platform, authenticate, and return a live session.
    pub async fn open(
        base_url: Url,
        username: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;

        let platform = Self::detect_platform(&http, &base_url).await?;
        debug!(?platform, "detected NVR platform");

        let mut session = Self {
            http,
            base_url,
            platform,
            csrf_token: None,
            bearer_token: None,
        };
        session.login(username, password).await?;
        Ok(session)
    }

    /// The detected NVR platform.
    pub fn platform(&self) -> NvrPlatform {
        self.platform
    }

    /// The NVR base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Close the session.
    ///
    /// Protect has no logout endpoint for short-lived sessions; dropping
    /// the client releases the connection pool. Kept explicit so callers
    /// mark the end of an operation on both success and failure paths.
    pub fn close(self) {
        debug!("session closed");
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Probe the NVR root: UniFi OS consoles advertise an `x-csrf-token`
    /// header on every response; CloudKey firmware does not.
    async fn detect_platform(
        http: &reqwest::Client,
        base_url: &Url,
    ) -> Result<NvrPlatform, Error> {
        debug!("probing {}", base_url);
        let resp = http
            .get(base_url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        if resp.headers().contains_key("x-csrf-token") {
            Ok(NvrPlatform::UnifiOs)
        } else {
            Ok(NvrPlatform::CloudKey)
        }
    }

    /// Authenticate with the NVR using username/password.
    ///
    /// On UniFi OS the session cookie lands in the jar and the CSRF token
    /// is captured for mutating requests. On CloudKey the `Authorization`
    /// response header carries a bearer token used on every request.
    async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self
            .base_url
            .join(self.platform.login_path())
            .map_err(Error::InvalidUrl)?;

        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        if let Some(token) = resp
            .headers()
            .get("x-csrf-token")
            .and_then(|v| v.to_str().ok())
        {
            self.csrf_token = Some(token.to_owned());
        }

        if let Some(token) = resp
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
        {
            self.bearer_token = Some(format!("Bearer {token}"));
        }

        debug!("login successful");
        Ok(())
    }

    // ── URL and request helpers ──────────────────────────────────────

    /// Build a full URL for a Protect API path, applying the
    /// platform-specific prefix.
    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.platform.api_prefix(),
            path
        );
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    /// Send a GET request and parse the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        let resp = Self::check_status(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Send a PATCH request with a JSON body, discarding the response body.
    async fn patch(&self, url: Url, body: &serde_json::Value) -> Result<(), Error> {
        debug!("PATCH {}", url);

        let mut req = self.authorized(self.http.patch(url)).json(body);
        // UniFi OS rejects mutating requests without the CSRF token.
        if let Some(ref token) = self.csrf_token {
            req = req.header("x-csrf-token", token);
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Attach the bearer token on CloudKey sessions.
    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer_token {
            Some(ref token) => req.header("authorization", token),
            None => req,
        }
    }

    /// Map non-success statuses to errors, returning the response otherwise.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Nvr {
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
                status: status.as_u16(),
            });
        }

        Ok(resp)
    }

    // ── Protect endpoints ────────────────────────────────────────────

    /// Fetch the full NVR state snapshot, including every camera.
    ///
    /// `GET {prefix}/bootstrap`
    pub async fn bootstrap(&self) -> Result<Bootstrap, Error> {
        let url = self.api_url("bootstrap")?;
        self.get(url).await
    }

    /// Fetch one camera by NVR id. Returns `None` when the id is gone.
    ///
    /// `GET {prefix}/cameras/{id}`
    pub async fn camera(&self, id: &str) -> Result<Option<Camera>, Error> {
        let url = self.api_url(&format!("cameras/{id}"))?;
        match self.get(url).await {
            Ok(camera) => Ok(Some(camera)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Change a camera's recording mode.
    ///
    /// `PATCH {prefix}/cameras/{id}` with `{"recordingSettings": {"mode": ...}}`
    pub async fn set_recording_mode(&self, id: &str, mode: RecordingMode) -> Result<(), Error> {
        let url = self.api_url(&format!("cameras/{id}"))?;
        debug!(id, %mode, "setting recording mode");
        self.patch(url, &json!({ "recordingSettings": { "mode": mode } }))
            .await
    }

    /// Toggle a camera's status-light LED.
    ///
    /// `PATCH {prefix}/cameras/{id}` with `{"ledSettings": {"isEnabled": ...}}`
    pub async fn set_status_light(&self, id: &str, enabled: bool) -> Result<(), Error> {
        let url = self.api_url(&format!("cameras/{id}"))?;
        debug!(id, enabled, "setting status light");
        self.patch(
            url,
            &json!({ "ledSettings": { "isEnabled": enabled, "blinkRate": 0 } }),
        )
        .await
    }
}
